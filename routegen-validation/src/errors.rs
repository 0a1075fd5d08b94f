// Validation errors

use thiserror::Error;

/// A present value violated its rule.
///
/// `Display` output is the operator-facing error surface, so the message
/// texts are load-bearing and stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is outside a closed enum set.
    #[error("{field} must be {allowed}")]
    NotInEnum { field: String, allowed: String },

    /// Enum violation in the `expected ... but got ...` phrasing.
    #[error("expected {field} to be one of {allowed} but got '{got}'")]
    ExpectedOneOf {
        field: String,
        allowed: String,
        got: String,
    },

    /// Unknown log timestamp format.
    #[error("'{value}' is not a valid timestamp format for the property '{field}'. Valid options are: 'rfc3339', 'deprecated', and 'unix-epoch'.")]
    TimestampFormat { field: String, value: String },

    /// Catch-all for values that are syntactically wrong for the field.
    #[error("Invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("{field} cannot be negative")]
    Negative { field: String },

    #[error("{field} must maintain a minimum value of {min}")]
    BelowMinimum { field: String, min: i64 },

    /// A single-certificate field was given a collection.
    #[error("{field} must be provided as a single string block")]
    NotSingleStringBlock { field: String },

    /// A multi-certificate field was not an array of strings.
    #[error("{field} must be provided as an array of strings containing one or more certificates in PEM encoding")]
    NotCertArray { field: String },

    /// Any malformed tls_pem entry fails the whole list with one fixed
    /// message, no index.
    #[error("must provide cert_chain and private_key with tls_pem")]
    TlsPemShape,

    #[error("tls_pem[{index}].cert_chain must contain a PEM-encoded certificate")]
    UnparseableCertificate { index: usize },

    #[error("tls_pem[{index}].cert_chain must include a subjectAltName extension")]
    MissingSubjectAltName { index: usize },

    /// One half of a cert/key pair without the other.
    #[error("{pair}.cert_chain and {pair}.private_key must be both provided or not at all")]
    IncompleteKeyPair { pair: String },

    /// A flag that only makes sense when another block is configured.
    #[error("{field} should not be set without configuring {dependency}")]
    MissingDependency { field: String, dependency: String },

    #[error("expected {field} when {condition}")]
    ConditionallyRequired { field: String, condition: String },

    #[error("expected {field} to be {expected} when {condition}")]
    ConditionalValue {
        field: String,
        expected: String,
        condition: String,
    },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
