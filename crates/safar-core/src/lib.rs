//! Safar core crate - shared types, errors, and configuration.
//!
//! Holds the booking domain value types exchanged between the transport
//! layer, the turn orchestrator, and the model gateway, plus the top-level
//! error enum and the TOML configuration loader.

pub mod config;
pub mod error;
pub mod types;

pub use config::SafarConfig;
pub use error::{Result, SafarError};
pub use types::{
    AssistantReply, BookingPatch, BookingSnapshot, FunctionCallOutcome, FunctionCallRequest,
    FunctionOutcome, TurnRequest,
};
