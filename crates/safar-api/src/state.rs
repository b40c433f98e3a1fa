//! Application state shared across all route handlers.
//!
//! AppState holds the turn orchestrator and server metadata. It is passed
//! to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use safar_assistant::TurnOrchestrator;

/// Shared application state.
///
/// The orchestrator is internally synchronized, so handlers clone the
/// state freely across tasks.
#[derive(Clone)]
pub struct AppState {
    /// The turn orchestration core.
    pub orchestrator: Arc<TurnOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(orchestrator: TurnOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            start_time: Instant::now(),
        }
    }
}
