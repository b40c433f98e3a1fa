//! Error types for the turn orchestration core.

use safar_core::error::SafarError;

/// Errors from the assistant pipeline.
///
/// Only `MissingBookingDetails` ever reaches the transport layer as a
/// rejection; the orchestrator maps everything else to a degraded but
/// well-formed reply.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("booking details are required")]
    MissingBookingDetails,
    #[error("audio decode failed: {0}")]
    AudioDecode(String),
    #[error("gateway error: {0}")]
    Gateway(String),
    #[error("no JSON payload found in model output")]
    ExtractionFailed,
}

impl From<AssistantError> for SafarError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::MissingBookingDetails => {
                SafarError::Api("booking details are required".to_string())
            }
            AssistantError::AudioDecode(msg) => SafarError::Audio(msg),
            AssistantError::Gateway(msg) => SafarError::Gateway(msg),
            AssistantError::ExtractionFailed => {
                SafarError::Extraction("no JSON payload found in model output".to_string())
            }
        }
    }
}
