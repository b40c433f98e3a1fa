//! Turn orchestration.
//!
//! `TurnOrchestrator::handle_turn` is the sole entry point of the core:
//! it decodes inbound audio, resolves the session, sends the per-turn
//! message, services at most one function-call round-trip, extracts the
//! structured reply, and merges the booking update. Every failure mode
//! maps to a well-formed reply; the method itself never fails.

use std::sync::Arc;

use safar_core::config::AssistantConfig;
use safar_core::types::{AssistantReply, BookingSnapshot, TurnRequest};

use crate::audio::AudioClip;
use crate::dispatch::FunctionDispatcher;
use crate::extract::ResponseExtractor;
use crate::gateway::{ModelGateway, ModelTurn, TurnContent};
use crate::prompt::PromptBuilder;
use crate::session::SessionStore;

/// Coordinates one full turn of the booking conversation.
pub struct TurnOrchestrator {
    gateway: Arc<dyn ModelGateway>,
    sessions: SessionStore,
    dispatcher: FunctionDispatcher,
    extractor: ResponseExtractor,
    prompt: PromptBuilder,
    config: AssistantConfig,
}

impl TurnOrchestrator {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        dispatcher: FunctionDispatcher,
        config: AssistantConfig,
    ) -> Self {
        Self {
            gateway,
            sessions: SessionStore::new(config.session_ttl_minutes),
            dispatcher,
            extractor: ResponseExtractor::new(),
            prompt: PromptBuilder::new(),
            config,
        }
    }

    /// Process one inbound turn.
    ///
    /// Always returns a reply: degraded paths (audio decode failure,
    /// gateway errors, unparseable model output) produce the fixed
    /// fallback or a truncated plain-text narration rather than an error.
    pub async fn handle_turn(&self, request: TurnRequest) -> AssistantReply {
        tracing::info!(
            chat_id = ?request.chat_id,
            has_audio = request.audio_base64.is_some(),
            "Handling turn"
        );

        let audio = match self.decode_audio(&request) {
            Ok(audio) => audio,
            Err(reply) => return reply,
        };

        let resolved = match self
            .sessions
            .get_or_create(
                request.chat_id.as_deref(),
                self.gateway.as_ref(),
                &self.prompt.system_instruction(),
            )
            .await
        {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve session");
                return AssistantReply::fallback(request.chat_id.clone(), request.booking_details);
            }
        };

        let chat_id = resolved.chat_id.clone();
        let message =
            self.prompt
                .turn_message(&request.booking_details, resolved.is_new, audio.is_some());

        // The entry lock serializes concurrent turns on the same chat id.
        let mut entry = resolved.entry.lock().await;

        let first = match entry
            .handle
            .send_turn(TurnContent::User { message, audio })
            .await
        {
            Ok(turn) => turn,
            Err(e) => {
                tracing::error!(chat_id = %chat_id, error = %e, "Model turn failed");
                return AssistantReply::fallback(Some(chat_id), request.booking_details);
            }
        };

        let final_turn = if first.function_calls.is_empty() {
            first
        } else {
            tracing::info!(
                chat_id = %chat_id,
                count = first.function_calls.len(),
                "Model requested function calls"
            );
            let outcomes = self.dispatcher.dispatch(first.function_calls).await;
            match entry
                .handle
                .send_turn(TurnContent::FunctionResults(outcomes))
                .await
            {
                Ok(turn) => {
                    // One round-trip per turn; further requests wait for
                    // the next inbound turn.
                    if !turn.function_calls.is_empty() {
                        tracing::debug!(
                            chat_id = %chat_id,
                            count = turn.function_calls.len(),
                            "Ignoring function calls in follow-up response"
                        );
                    }
                    turn
                }
                Err(e) => {
                    tracing::error!(chat_id = %chat_id, error = %e, "Follow-up turn failed");
                    return AssistantReply::fallback(Some(chat_id), request.booking_details);
                }
            }
        };
        drop(entry);

        self.finalize(chat_id, request.booking_details, &final_turn)
    }

    /// Decode the optional audio clip, enforcing the size cap.
    fn decode_audio(&self, request: &TurnRequest) -> Result<Option<AudioClip>, AssistantReply> {
        let Some(raw) = request.audio_base64.as_deref() else {
            return Ok(None);
        };

        match AudioClip::from_base64(raw) {
            Ok(clip) if clip.data.len() > self.config.max_audio_bytes => {
                tracing::warn!(
                    bytes = clip.data.len(),
                    limit = self.config.max_audio_bytes,
                    "Audio clip exceeds size limit"
                );
                Err(AssistantReply::fallback(
                    request.chat_id.clone(),
                    request.booking_details.clone(),
                ))
            }
            Ok(clip) => Ok(Some(clip)),
            Err(e) => {
                tracing::warn!(error = %e, "Audio decode failed");
                Err(AssistantReply::fallback(
                    request.chat_id.clone(),
                    request.booking_details.clone(),
                ))
            }
        }
    }

    /// Turn raw model text into the outbound reply.
    fn finalize(
        &self,
        chat_id: String,
        booking: BookingSnapshot,
        turn: &ModelTurn,
    ) -> AssistantReply {
        match self.extractor.extract(&turn.text) {
            Ok(extracted) => {
                let updated = match &extracted.updated_booking_details {
                    Some(patch) => booking.merge(patch),
                    None => booking,
                };
                let booking_successful = extracted.booking_id.is_some().then_some(true);
                let confirmation_code = if extracted.booking_id.is_some() {
                    extracted.confirmation_code
                } else {
                    None
                };
                AssistantReply {
                    narration: extracted.narration,
                    updated_booking_details: updated,
                    booking_complete: extracted.booking_complete,
                    chat_id: Some(chat_id),
                    booking_successful,
                    booking_id: extracted.booking_id,
                    confirmation_code,
                }
            }
            Err(_) => {
                tracing::warn!(chat_id = %chat_id, "Extraction failed, using plain-text narration");
                AssistantReply {
                    narration: truncate_chars(&turn.text, self.config.narration_fallback_chars),
                    updated_booking_details: booking,
                    booking_complete: false,
                    chat_id: Some(chat_id),
                    booking_successful: None,
                    booking_id: None,
                    confirmation_code: None,
                }
            }
        }
    }
}

/// First `max` characters of `text`, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
