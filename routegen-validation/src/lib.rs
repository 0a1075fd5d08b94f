//! Per-field validation rules for routing job settings
//!
//! Rules are declarative: each job carries a table of `(path, rule)`
//! entries evaluated in one pass, plus a handful of structural validators
//! for shapes a table cannot express (keypair lists, paired secrets,
//! conditional requirements). Error `Display` texts are the operator
//! surface and are matched verbatim by the job test suites.
//!
//! # Examples
//!
//! ```
//! use routegen_validation::{check_all, GOROUTER_RULES};
//! use serde_json::json;
//!
//! let props = json!({ "router": { "max_header_kb": 128 } });
//! assert!(check_all(&props, GOROUTER_RULES).is_ok());
//!
//! let props = json!({ "router": { "max_header_kb": 2048 } });
//! let err = check_all(&props, GOROUTER_RULES).unwrap_err();
//! assert_eq!(err.to_string(), "Invalid router.max_header_kb: must be between 1 and 1024");
//! ```

pub mod cert;
mod errors;
mod rules;
mod validators;

pub use errors::{Result, ValidationError};
pub use rules::{
    check_all, FieldRule, Rule, GOROUTER_RULES, MAX_TLS_VERSIONS, ROUTING_API_RULES,
    TCP_ROUTER_RULES, TLS_VERSIONS,
};
pub use validators::{
    provided, Address, CertArray, Enumerated, ExpectedOneOf, IntRange, MinValue, NonNegative,
    PairedSecret, SingleStringBlock, TimestampFormat, TlsPem,
};
