// Error types for manifest loading and resolution

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A required value was absent from properties, links, and defaults.
    #[error("{description} not found in properties nor in \"{namespace}\" link. This value can be specified using the \"{property}\" property.")]
    MissingConfiguration {
        description: String,
        property: String,
        namespace: String,
    },

    /// The legacy NATS link is in use while the fail-if-legacy flag is set.
    /// The message is a fixed operator-facing text.
    #[error("{0}")]
    Deprecated(String),

    /// The manifest fragment could not be parsed.
    #[error("failed to parse manifest: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
