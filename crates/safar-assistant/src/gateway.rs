//! Model gateway abstraction.
//!
//! The orchestrator never talks to a concrete completion engine; it sees
//! two operations: start a session with a system instruction, and send
//! turn content to a session, getting back narration text and/or a list
//! of requested function calls. Failures are not caught here; they
//! propagate to the orchestrator, which owns the degraded paths.

use async_trait::async_trait;

use safar_core::types::{FunctionCallOutcome, FunctionCallRequest};

use crate::audio::AudioClip;
use crate::error::AssistantError;

/// What one model response carried: free text (possibly a JSON envelope)
/// and zero or more requested function calls.
#[derive(Debug, Clone, Default)]
pub struct ModelTurn {
    pub text: String,
    pub function_calls: Vec<FunctionCallRequest>,
}

/// Content for one `send_turn` call.
#[derive(Debug)]
pub enum TurnContent {
    /// The per-turn user message, with an optional inline audio clip.
    User {
        message: String,
        audio: Option<AudioClip>,
    },
    /// Results of the capability calls the model requested, one per
    /// request and in request order.
    FunctionResults(Vec<FunctionCallOutcome>),
}

/// One ongoing multi-turn exchange with the completion engine.
///
/// The handle is opaque to the core: it lives only for the process
/// lifetime, is owned exclusively by the session store entry that created
/// it, and is never serialized.
#[async_trait]
pub trait ModelSession: Send {
    async fn send_turn(&mut self, content: TurnContent) -> Result<ModelTurn, AssistantError>;
}

/// Opaque handle to a model session.
pub type SessionHandle = Box<dyn ModelSession>;

/// Factory for model sessions.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Open a session seeded with the system instruction.
    async fn start_session(
        &self,
        system_instruction: &str,
    ) -> Result<SessionHandle, AssistantError>;
}
