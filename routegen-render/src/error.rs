// Render errors

use thiserror::Error;

use routegen_manifest::ResolveError;
use routegen_validation::ValidationError;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to serialize settings document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to serialize settings document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
