//! Safar API crate - axum HTTP server and route handlers.
//!
//! Exposes the booking assistant over REST: one turn endpoint that the
//! voice frontend polls with audio and accumulated booking state, plus
//! health and index routes.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
