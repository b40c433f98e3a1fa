//! Turn orchestration core for the Safar booking assistant.
//!
//! Turns one inbound request (audio/text plus the booking state so far)
//! into a coordinated exchange with a generative completion engine:
//! session continuity, per-turn prompt construction, a bounded
//! function-call round-trip, and tolerant extraction of a structured
//! result from loosely formatted model output.

pub mod audio;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod orchestrator;
pub mod prompt;
pub mod session;

pub use audio::AudioClip;
pub use dispatch::FunctionDispatcher;
pub use error::AssistantError;
pub use extract::{ExtractedReply, ResponseExtractor};
pub use gateway::{ModelGateway, ModelSession, ModelTurn, SessionHandle, TurnContent};
pub use orchestrator::TurnOrchestrator;
pub use prompt::PromptBuilder;
pub use session::{ResolvedSession, SessionStore};
