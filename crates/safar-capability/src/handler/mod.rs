//! Booking capability handlers.
//!
//! One file per capability, each implementing the `Capability` trait
//! against the shared in-memory timetable.

pub mod buses;
pub mod reservation;
pub mod seat_check;
pub mod seats;

pub use buses::AvailableBusesHandler;
pub use reservation::ReservationHandler;
pub use seat_check::SeatAvailabilityHandler;
pub use seats::AvailableSeatsHandler;

use serde_json::Value;

use crate::error::CapabilityError;

/// Extract a required string argument, rejecting absent or empty values.
pub(crate) fn required_str<'a>(
    args: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Result<&'a str, CapabilityError> {
    match args.get(key).and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CapabilityError::InvalidArgs(format!(
            "{} is required",
            key
        ))),
    }
}

/// Extract an optional string argument; absent and null are both `None`.
pub(crate) fn optional_str<'a>(
    args: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.trim().is_empty())
}
