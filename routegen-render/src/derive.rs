// Derivation rules shared by the job builders

use serde_json::Value;

/// Format an integer second count as a Go duration string.
pub fn seconds(n: i64) -> String {
    format!("{n}s")
}

/// Duration fields accept a bare integer second count or an already
/// suffixed string; both normalize to the string form.
pub fn duration(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_i64().map(seconds),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

pub fn kb_to_bytes(kb: i64) -> i64 {
    kb * 1024
}

/// Minimum trimmed length for a CA bundle entry to survive filtering.
/// Anything shorter is a truncated or placeholder value, not a
/// certificate.
const MIN_CERT_LEN: usize = 50;

/// Whether a CA bundle entry is worth keeping.
pub fn usable_cert(entry: &Value) -> Option<&str> {
    entry.as_str().filter(|s| s.trim().len() >= MIN_CERT_LEN)
}

/// Join certificate blocks, dropping blanks, with the job's separator.
pub fn join_cert_blocks<'a, I>(blocks: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    blocks
        .into_iter()
        .filter(|b| !b.trim().is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
