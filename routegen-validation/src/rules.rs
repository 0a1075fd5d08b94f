// Declarative per-field rule tables

use serde_json::Value;

use crate::validators::{
    Address, CertArray, Enumerated, ExpectedOneOf, IntRange, MinValue, NonNegative,
    SingleStringBlock, TimestampFormat, TlsPem,
};
use crate::ValidationError;

/// One validation rule, applied to a value when it is present.
pub enum Rule {
    Enumerated {
        allowed: &'static [&'static str],
        display: &'static str,
    },
    ExpectedOneOf {
        allowed: &'static [&'static str],
        display: &'static str,
    },
    TimestampFormat,
    IntRange {
        min: i64,
        max: i64,
    },
    NonNegative,
    MinValue(i64),
    SingleStringBlock,
    CertArray,
    Address,
    TlsPem,
}

impl Rule {
    /// Apply the rule. `field` is the name used in the error message.
    ///
    /// Scalar rules ignore values of the wrong JSON type; the builders
    /// coerce types before emission and a type mismatch surfaces there.
    pub fn check(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        match self {
            Rule::Enumerated { allowed, display } => match value.as_str() {
                Some(s) => Enumerated {
                    allowed: *allowed,
                    display: *display,
                }
                .validate(s, field),
                None => Ok(()),
            },
            Rule::ExpectedOneOf { allowed, display } => match value.as_str() {
                Some(s) => ExpectedOneOf {
                    allowed: *allowed,
                    display: *display,
                }
                .validate(s, field),
                None => Ok(()),
            },
            Rule::TimestampFormat => match value.as_str() {
                Some(s) => TimestampFormat::validate(s, field),
                None => Ok(()),
            },
            Rule::IntRange { min, max } => match value.as_i64() {
                Some(n) => IntRange {
                    min: *min,
                    max: *max,
                }
                .validate(n, field),
                None => Ok(()),
            },
            Rule::NonNegative => match value.as_i64() {
                Some(n) => NonNegative::validate(n, field),
                None => Ok(()),
            },
            Rule::MinValue(min) => match value.as_i64() {
                Some(n) => MinValue(*min).validate(n, field),
                None => Ok(()),
            },
            Rule::SingleStringBlock => SingleStringBlock::validate(value, field),
            Rule::CertArray => CertArray::validate(value, field),
            Rule::Address => match value.as_str() {
                Some(s) => Address::validate(s, field),
                None => Ok(()),
            },
            Rule::TlsPem => TlsPem::validate(value),
        }
    }
}

/// A rule bound to one dotted property path. The path doubles as the field
/// name in error messages.
pub struct FieldRule {
    pub path: &'static str,
    pub rule: Rule,
}

impl FieldRule {
    pub const fn new(path: &'static str, rule: Rule) -> Self {
        Self { path, rule }
    }
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.split('.') {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    if node.is_null() { None } else { Some(node) }
}

/// Check every table entry against a property tree, stopping at the first
/// violation. Absent paths are skipped; required-ness is resolved earlier.
pub fn check_all(root: &Value, rules: &[FieldRule]) -> Result<(), ValidationError> {
    for entry in rules {
        if let Some(value) = lookup(root, entry.path) {
            entry.rule.check(value, entry.path)?;
        }
    }
    Ok(())
}

pub const TLS_VERSIONS: &[&str] = &["TLSv1.0", "TLSv1.1", "TLSv1.2", "TLSv1.3"];
pub const MAX_TLS_VERSIONS: &[&str] = &["TLSv1.2", "TLSv1.3"];

/// Scalar field rules for the proxy job.
pub const GOROUTER_RULES: &[FieldRule] = &[
    FieldRule::new(
        "router.client_cert_validation",
        Rule::Enumerated {
            allowed: &["none", "off", "request", "require"],
            display: "\"none\", \"request\", or \"require\"",
        },
    ),
    FieldRule::new(
        "router.min_tls_version",
        Rule::Enumerated {
            allowed: TLS_VERSIONS,
            display: "\"TLSv1.0\", \"TLSv1.1\", \"TLSv1.2\" or \"TLSv1.3\"",
        },
    ),
    FieldRule::new(
        "router.max_tls_version",
        Rule::Enumerated {
            allowed: MAX_TLS_VERSIONS,
            display: "\"TLSv1.2\" or \"TLSv1.3\"",
        },
    ),
    FieldRule::new("router.max_header_kb", Rule::IntRange { min: 1, max: 1024 }),
    FieldRule::new("router.backends.max_attempts", Rule::NonNegative),
    FieldRule::new("router.route_services.max_attempts", Rule::MinValue(1)),
    FieldRule::new("router.logging.format.timestamp", Rule::TimestampFormat),
    FieldRule::new("router.debug_address", Rule::Address),
    FieldRule::new("router.ca_certs", Rule::CertArray),
    FieldRule::new("router.tls_pem", Rule::TlsPem),
];

/// Scalar field rules for the routing API job.
pub const ROUTING_API_RULES: &[FieldRule] = &[
    FieldRule::new(
        "routing_api.enabled_api_endpoints",
        Rule::ExpectedOneOf {
            allowed: &["mtls", "both"],
            display: "'mtls' or 'both'",
        },
    ),
    FieldRule::new("routing_api.debug_address", Rule::Address),
];

/// Scalar field rules for the TCP router job.
pub const TCP_ROUTER_RULES: &[FieldRule] =
    &[FieldRule::new("tcp_router.debug_address", Rule::Address)];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_all_skips_absent_and_null_paths() {
        let props = json!({ "router": { "max_header_kb": null } });
        assert!(check_all(&props, GOROUTER_RULES).is_ok());
    }

    #[test]
    fn test_check_all_stops_at_first_violation() {
        let props = json!({
            "router": {
                "max_header_kb": 2048,
                "backends": { "max_attempts": -1 }
            }
        });
        let err = check_all(&props, GOROUTER_RULES).unwrap_err();
        assert_eq!(err.to_string(), "Invalid router.max_header_kb: must be between 1 and 1024");
    }

    #[test]
    fn test_gorouter_tls_version_messages() {
        let props = json!({ "router": { "min_tls_version": "TLSv2.7" } });
        let err = check_all(&props, GOROUTER_RULES).unwrap_err();
        assert_eq!(
            err.to_string(),
            "router.min_tls_version must be \"TLSv1.0\", \"TLSv1.1\", \"TLSv1.2\" or \"TLSv1.3\""
        );

        let props = json!({ "router": { "max_tls_version": "TLSv1.1" } });
        let err = check_all(&props, GOROUTER_RULES).unwrap_err();
        assert_eq!(err.to_string(), "router.max_tls_version must be \"TLSv1.2\" or \"TLSv1.3\"");
    }

    #[test]
    fn test_routing_api_endpoint_enum() {
        let props = json!({ "routing_api": { "enabled_api_endpoints": "junk" } });
        let err = check_all(&props, ROUTING_API_RULES).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected routing_api.enabled_api_endpoints to be one of 'mtls' or 'both' but got 'junk'"
        );
    }

    #[test]
    fn test_tcp_router_debug_address() {
        let props = json!({ "tcp_router": { "debug_address": "127.0.0.01:17002" } });
        let err = check_all(&props, TCP_ROUTER_RULES).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid tcp_router.debug_address: IP octets must not contain leading zeros"
        );
    }
}
