//! `check_seat_availability` capability.
//!
//! Answers whether one specific seat is still open on a dated departure.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::CapabilityError;
use crate::handler::required_str;
use crate::registry::{Capability, FunctionDeclaration};
use crate::timetable::Timetable;

/// Handler for single-seat availability checks.
pub struct SeatAvailabilityHandler {
    timetable: Arc<Timetable>,
}

impl SeatAvailabilityHandler {
    pub fn new(timetable: Arc<Timetable>) -> Self {
        Self { timetable }
    }
}

#[async_trait]
impl Capability for SeatAvailabilityHandler {
    fn name(&self) -> &'static str {
        "check_seat_availability"
    }

    fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name().to_string(),
            description: "Check whether one specific seat is still open on a dated \
                          departure."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "starting_point": { "type": "string" },
                    "destination": { "type": "string" },
                    "date": { "type": "string", "description": "YYYY-MM-DD" },
                    "departure_time": { "type": "string", "description": "HH:MM" },
                    "seat_number": { "type": "string", "description": "Seat id, e.g. 4C" }
                },
                "required": [
                    "starting_point",
                    "destination",
                    "date",
                    "departure_time",
                    "seat_number"
                ]
            }),
        }
    }

    async fn invoke(
        &self,
        args: &serde_json::Map<String, Value>,
    ) -> Result<Value, CapabilityError> {
        let starting_point = required_str(args, "starting_point")?;
        let destination = required_str(args, "destination")?;
        let date = required_str(args, "date")?;
        let departure_time = required_str(args, "departure_time")?;
        let seat_number = required_str(args, "seat_number")?;

        let available = self.timetable.seat_available(
            starting_point,
            destination,
            date,
            departure_time,
            seat_number,
        );
        tracing::info!(seat_number = %seat_number, available, "Seat check");

        Ok(json!({
            "seat_number": seat_number.to_uppercase(),
            "available": available,
            "valid_seat": Timetable::is_valid_seat(seat_number),
        }))
    }
}
