//! Gemini REST backend for the model gateway.
//!
//! Implements the `ModelGateway`/`ModelSession` traits on top of the
//! `generateContent` endpoint. Sessions are stateless on the wire: each
//! turn replays the accumulated content history, so conversational
//! memory lives entirely in this crate.

pub mod client;
pub mod wire;

pub use client::{GeminiGateway, GeminiSession};
