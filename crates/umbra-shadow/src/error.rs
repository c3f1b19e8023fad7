//! Shadow error types

use thiserror::Error;

use crate::render::ShaderVariant;

/// Errors surfaced to the host.
///
/// Only construction and recompilation fail; per-frame rendering has no error
/// path once the pipeline is ready.
#[derive(Debug, Error)]
pub enum ShadowError {
    #[error("{variant} shader failed to parse: {message}")]
    ShaderParse { variant: ShaderVariant, message: String },

    #[error("{variant} shader failed validation: {message}")]
    ShaderValidation { variant: ShaderVariant, message: String },

    #[error("shadow pipeline was already destroyed")]
    PipelineDestroyed,

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("unknown light type: {0}")]
    InvalidLightType(String),
}

/// Result type for shadow operations
pub type ShadowResult<T> = Result<T, ShadowError>;
