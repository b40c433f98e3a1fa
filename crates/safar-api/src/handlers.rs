//! Route handler functions for all API endpoints.
//!
//! Each handler extracts its JSON body via axum extractors, drives the
//! orchestrator, and returns a JSON response. The turn endpoint accepts
//! the camelCase field names the voice frontend sends.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};

use safar_assistant::AssistantError;
use safar_core::error::SafarError;
use safar_core::types::{AssistantReply, BookingSnapshot, TurnRequest};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

/// Body of `POST /assistant/turn`.
///
/// `bookingDetails` is required: the frontend always echoes the full
/// accumulated state, even when every field is still null.
#[derive(Debug, Deserialize)]
pub struct TurnBody {
    #[serde(default, rename = "audioBase64", alias = "audio_base64")]
    pub audio_base64: Option<String>,
    #[serde(default, rename = "bookingDetails", alias = "booking_details")]
    pub booking_details: Option<BookingSnapshot>,
    #[serde(default, rename = "chatId", alias = "chat_id")]
    pub chat_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /assistant/turn - run one turn of the booking conversation.
pub async fn turn(
    State(state): State<AppState>,
    Json(body): Json<TurnBody>,
) -> Result<Json<AssistantReply>, ApiError> {
    let booking_details = body.booking_details.ok_or_else(|| {
        ApiError::from(SafarError::from(AssistantError::MissingBookingDetails))
    })?;

    let reply = state
        .orchestrator
        .handle_turn(TurnRequest {
            audio_base64: body.audio_base64,
            booking_details,
            chat_id: body.chat_id,
        })
        .await;

    Ok(Json(reply))
}

/// GET /health - liveness and uptime.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

/// GET / - minimal index page.
pub async fn index() -> impl IntoResponse {
    Html("<h1>Safar booking assistant</h1><p>POST /assistant/turn</p>")
}
