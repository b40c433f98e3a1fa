//! Capability registry for the booking assistant.
//!
//! Defines the async `Capability` trait, the name-keyed registry the
//! function dispatcher resolves against, and the four booking-domain
//! handlers backed by an in-memory inter-city coach timetable.

pub mod error;
pub mod handler;
pub mod registry;
pub mod timetable;

pub use error::CapabilityError;
pub use registry::{Capability, CapabilityRegistry, FunctionDeclaration};
pub use timetable::{Departure, Reservation, Timetable};
