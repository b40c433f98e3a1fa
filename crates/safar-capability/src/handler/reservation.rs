//! `make_reservation` capability.
//!
//! Creates a reservation once every booking field has been collected,
//! returning the booking id and confirmation code the assistant reads
//! back to the customer.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::CapabilityError;
use crate::handler::required_str;
use crate::registry::{Capability, FunctionDeclaration};
use crate::timetable::Timetable;

/// Handler for reservation creation.
pub struct ReservationHandler {
    timetable: Arc<Timetable>,
}

impl ReservationHandler {
    pub fn new(timetable: Arc<Timetable>) -> Self {
        Self { timetable }
    }
}

#[async_trait]
impl Capability for ReservationHandler {
    fn name(&self) -> &'static str {
        "make_reservation"
    }

    fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name().to_string(),
            description: "Reserve a seat once all booking details are confirmed. Returns \
                          a booking id and confirmation code."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "starting_point": { "type": "string" },
                    "destination": { "type": "string" },
                    "date": { "type": "string", "description": "YYYY-MM-DD" },
                    "departure_time": { "type": "string", "description": "HH:MM" },
                    "seat_number": { "type": "string" },
                    "customer_name": { "type": "string" },
                    "phone_number": { "type": "string" }
                },
                "required": [
                    "starting_point",
                    "destination",
                    "date",
                    "departure_time",
                    "seat_number",
                    "customer_name",
                    "phone_number"
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
        let customer_name = required_str(args, "customer_name")?;
        let phone_number = required_str(args, "phone_number")?;

        let reservation = self.timetable.reserve(
            starting_point,
            destination,
            date,
            departure_time,
            seat_number,
            customer_name,
        )?;

        tracing::info!(
            booking_id = %reservation.booking_id,
            seat_number = %reservation.seat_number,
            "Reservation created"
        );

        Ok(json!({
            "success": true,
            "booking_id": reservation.booking_id,
            "confirmation_code": reservation.confirmation_code,
            "seat_number": reservation.seat_number,
            "customer_name": customer_name,
            "phone_number": phone_number,
            "message": format!(
                "Seat {} reserved from {} to {} on {} at {}",
                reservation.seat_number, starting_point, destination, date, departure_time
            ),
        }))
    }
}
