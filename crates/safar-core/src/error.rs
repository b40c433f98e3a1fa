use thiserror::Error;

/// Top-level error type for the Safar system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for SafarError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SafarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capability error: {0}")]
    Capability(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SafarError {
    fn from(err: toml::de::Error) -> Self {
        SafarError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SafarError {
    fn from(err: toml::ser::Error) -> Self {
        SafarError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SafarError {
    fn from(err: serde_json::Error) -> Self {
        SafarError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Safar operations.
pub type Result<T> = std::result::Result<T, SafarError>;
