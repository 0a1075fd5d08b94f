// Routegen - settings document rendering for routing deployments
//
// This library resolves deployment properties and consumed links into
// validated per-job configuration documents and secret files.

// Re-export the manifest model and resolution chain
pub use routegen_manifest::*;

// Re-export field validation
pub use routegen_validation::{
    check_all, provided, Address, CertArray, Enumerated, ExpectedOneOf, FieldRule, IntRange,
    MinValue, NonNegative, PairedSecret, Rule, SingleStringBlock, TimestampFormat, TlsPem,
    ValidationError, GOROUTER_RULES, MAX_TLS_VERSIONS, ROUTING_API_RULES, TCP_ROUTER_RULES,
    TLS_VERSIONS,
};

// Re-export rendering
pub use routegen_render::{jobs, Artifact, InstanceInfo, RenderError, RenderedJob};
