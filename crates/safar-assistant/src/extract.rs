//! Structured-reply extraction from raw model text.
//!
//! The completion engine is asked for a JSON envelope but only loosely
//! honors that, so extraction runs a deterministic three-stage cascade,
//! first success wins:
//!
//! 1. parse the entire text as JSON;
//! 2. parse the interior of the first fenced code block (``` or ```json);
//! 3. parse the greedy span from the first `{` to the last `}`.
//!
//! A parsed object missing optional fields is accepted as-is. If every
//! stage fails the caller degrades to a plain-text reply; extraction
//! never raises past the orchestrator.

use regex::Regex;
use serde::Deserialize;

use safar_core::types::BookingPatch;

use crate::error::AssistantError;

/// The structured payload pulled out of one model turn.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedReply {
    #[serde(default)]
    pub narration: String,
    #[serde(
        default,
        rename = "updatedBookingDetails",
        alias = "updated_booking_details"
    )]
    pub updated_booking_details: Option<BookingPatch>,
    #[serde(default, rename = "bookingComplete", alias = "booking_complete")]
    pub booking_complete: bool,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub confirmation_code: Option<String>,
}

/// Three-stage lenient JSON envelope parser.
pub struct ResponseExtractor {
    fenced_block: Regex,
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseExtractor {
    pub fn new() -> Self {
        Self {
            // Interior of the first triple-backtick block, optionally
            // tagged `json`.
            fenced_block: Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```")
                .expect("fenced block pattern is valid"),
        }
    }

    /// Run the cascade over raw model text.
    pub fn extract(&self, raw: &str) -> Result<ExtractedReply, AssistantError> {
        if let Ok(reply) = serde_json::from_str::<ExtractedReply>(raw) {
            tracing::debug!("Extraction succeeded via direct parse");
            return Ok(reply);
        }

        if let Some(captures) = self.fenced_block.captures(raw) {
            if let Ok(reply) = serde_json::from_str::<ExtractedReply>(&captures[1]) {
                tracing::debug!("Extraction succeeded via fenced block");
                return Ok(reply);
            }
        }

        if let Some(span) = outer_brace_span(raw) {
            if let Ok(reply) = serde_json::from_str::<ExtractedReply>(span) {
                tracing::debug!("Extraction succeeded via brace span");
                return Ok(reply);
            }
        }

        tracing::debug!(len = raw.len(), "All extraction stages failed");
        Err(AssistantError::ExtractionFailed)
    }
}

/// The substring from the first `{` through the last `}`, if both exist
/// in order.
fn outer_brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
