// Built-in validators

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::cert;
use crate::ValidationError;

static HOST_PORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<host>[^:]*)(?::(?P<port>\d+))?$").unwrap());

static IPV4_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").unwrap());

/// Whether a value counts as provided for pairing and conditional rules.
/// Null and blank strings count as absent.
pub fn provided(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Validates membership in a closed enum set.
///
/// `allowed` may accept more inputs than `display` advertises when a
/// legacy alias is tolerated on input but not documented.
pub struct Enumerated {
    pub allowed: &'static [&'static str],
    pub display: &'static str,
}

impl Enumerated {
    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if self.allowed.contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::NotInEnum {
                field: field.to_string(),
                allowed: self.display.to_string(),
            })
        }
    }
}

/// Enum membership reported in the `expected ... but got ...` phrasing.
pub struct ExpectedOneOf {
    pub allowed: &'static [&'static str],
    pub display: &'static str,
}

impl ExpectedOneOf {
    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if self.allowed.contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::ExpectedOneOf {
                field: field.to_string(),
                allowed: self.display.to_string(),
                got: value.to_string(),
            })
        }
    }
}

/// Validates the log timestamp format enum.
pub struct TimestampFormat;

impl TimestampFormat {
    pub const ALLOWED: &'static [&'static str] = &["rfc3339", "deprecated", "unix-epoch"];

    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if Self::ALLOWED.contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::TimestampFormat {
                field: field.to_string(),
                value: value.to_string(),
            })
        }
    }
}

/// Validates an inclusive integer range.
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub fn validate(&self, value: i64, field: &str) -> Result<(), ValidationError> {
        if value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(ValidationError::Invalid {
                field: field.to_string(),
                reason: format!("must be between {} and {}", self.min, self.max),
            })
        }
    }
}

/// Validates a non-negative integer. Zero is legal and means unlimited.
pub struct NonNegative;

impl NonNegative {
    pub fn validate(value: i64, field: &str) -> Result<(), ValidationError> {
        if value < 0 {
            Err(ValidationError::Negative {
                field: field.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

/// Validates a minimum integer value.
pub struct MinValue(pub i64);

impl MinValue {
    pub fn validate(&self, value: i64, field: &str) -> Result<(), ValidationError> {
        if value < self.0 {
            Err(ValidationError::BelowMinimum {
                field: field.to_string(),
                min: self.0,
            })
        } else {
            Ok(())
        }
    }
}

/// Validates that a certificate field holds one string block, not a list.
pub struct SingleStringBlock;

impl SingleStringBlock {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        if value.is_string() {
            Ok(())
        } else {
            Err(ValidationError::NotSingleStringBlock {
                field: field.to_string(),
            })
        }
    }
}

/// Validates that a CA bundle field is an array of strings.
///
/// Entry contents are not inspected here; blank and truncated entries are
/// filtered later rather than rejected.
pub struct CertArray;

impl CertArray {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        let err = || ValidationError::NotCertArray {
            field: field.to_string(),
        };
        let entries = value.as_array().ok_or_else(err)?;
        for entry in entries {
            if !matches!(entry, Value::Null | Value::String(_)) {
                return Err(err());
            }
        }
        Ok(())
    }
}

/// Validates a `host` or `host:port` address.
pub struct Address;

impl Address {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        let captures =
            HOST_PORT_REGEX
                .captures(value)
                .ok_or_else(|| ValidationError::Invalid {
                    field: field.to_string(),
                    reason: "must be an address in host:port form".to_string(),
                })?;

        let host = captures.name("host").map_or("", |m| m.as_str());
        if IPV4_REGEX.is_match(host) {
            for octet in host.split('.') {
                if octet.len() > 1 && octet.starts_with('0') {
                    return Err(ValidationError::Invalid {
                        field: field.to_string(),
                        reason: "IP octets must not contain leading zeros".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Validates the TLS keypair list served by the proxy.
///
/// Any shape problem (non-list, non-map entry, missing half) fails with one
/// fixed message. Certificate problems are positional: each `cert_chain`
/// must parse as PEM X.509 and its leaf must carry a subjectAltName.
pub struct TlsPem;

impl TlsPem {
    pub fn validate(value: &Value) -> Result<(), ValidationError> {
        let entries = value.as_array().ok_or(ValidationError::TlsPemShape)?;
        for (index, entry) in entries.iter().enumerate() {
            let map = entry.as_object().ok_or(ValidationError::TlsPemShape)?;
            let cert_chain = map
                .get("cert_chain")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .ok_or(ValidationError::TlsPemShape)?;
            map.get("private_key")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .ok_or(ValidationError::TlsPemShape)?;

            let certs = cert::certificates(cert_chain);
            if certs.is_empty() {
                return Err(ValidationError::UnparseableCertificate { index });
            }
            if !cert::has_subject_alt_name(&certs[0]) {
                return Err(ValidationError::MissingSubjectAltName { index });
            }
        }
        Ok(())
    }
}

/// Validates that a cert/key pair is provided atomically.
pub struct PairedSecret;

impl PairedSecret {
    pub fn validate(
        cert_chain: Option<&Value>,
        private_key: Option<&Value>,
        pair: &str,
    ) -> Result<(), ValidationError> {
        if provided(cert_chain) != provided(private_key) {
            Err(ValidationError::IncompleteKeyPair {
                pair: pair.to_string(),
            })
        } else {
            Ok(())
        }
    }
}
