//! Error types for capability resolution and invocation.

use safar_core::error::SafarError;

/// Errors from capability handler lookup and execution.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("No capability registered under name: {0}")]
    Unknown(String),
    #[error("Argument validation failed: {0}")]
    InvalidArgs(String),
    #[error("Capability handler failed: {0}")]
    Failed(String),
}

impl From<CapabilityError> for SafarError {
    fn from(err: CapabilityError) -> Self {
        SafarError::Capability(err.to_string())
    }
}
