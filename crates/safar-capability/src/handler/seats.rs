//! `check_available_seats` capability.
//!
//! Lists open seats for a dated departure.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::CapabilityError;
use crate::handler::{optional_str, required_str};
use crate::registry::{Capability, FunctionDeclaration};
use crate::timetable::Timetable;

/// Handler for seat-inventory lookups.
pub struct AvailableSeatsHandler {
    timetable: Arc<Timetable>,
}

impl AvailableSeatsHandler {
    pub fn new(timetable: Arc<Timetable>) -> Self {
        Self { timetable }
    }
}

#[async_trait]
impl Capability for AvailableSeatsHandler {
    fn name(&self) -> &'static str {
        "check_available_seats"
    }

    fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name().to_string(),
            description: "List the open seats for a departure on a given date. If no \
                          departure time is given, the first scheduled departure is used."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "starting_point": { "type": "string" },
                    "destination": { "type": "string" },
                    "date": {
                        "type": "string",
                        "description": "Travel date in YYYY-MM-DD format"
                    },
                    "departure_time": {
                        "type": "string",
                        "description": "Departure time in 24-hour HH:MM format"
                    }
                },
                "required": ["starting_point", "destination", "date"]
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

        // Fall back to the first scheduled departure when the caller has not
        // settled on a time yet.
        let departure_time = match optional_str(args, "departure_time") {
            Some(time) => time.to_string(),
            None => self
                .timetable
                .find_departures(starting_point, destination)
                .first()
                .map(|d| d.departure_time.clone())
                .ok_or_else(|| {
                    CapabilityError::InvalidArgs(format!(
                        "no scheduled departures from {} to {}",
                        starting_point, destination
                    ))
                })?,
        };

        let seats =
            self.timetable
                .available_seats(starting_point, destination, date, &departure_time);
        tracing::info!(
            starting_point = %starting_point,
            destination = %destination,
            date = %date,
            departure_time = %departure_time,
            open = seats.len(),
            "Seat availability lookup"
        );

        Ok(json!({
            "departure_time": departure_time,
            "date": date,
            "available_seats": seats,
            "count": seats.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_lists_all_seats_when_unreserved() {
        let handler = AvailableSeatsHandler::new(Arc::new(Timetable::new()));
        let result = handler
            .invoke(&args(json!({
                "starting_point": "Lahore",
                "destination": "Karachi",
                "date": "2025-03-20",
                "departure_time": "08:00"
            })))
            .await
            .unwrap();
        assert_eq!(result["count"], json!(40));
        assert_eq!(result["departure_time"], json!("08:00"));
    }

    #[tokio::test]
    async fn test_defaults_to_first_scheduled_departure() {
        let handler = AvailableSeatsHandler::new(Arc::new(Timetable::new()));
        let result = handler
            .invoke(&args(json!({
                "starting_point": "Lahore",
                "destination": "Karachi",
                "date": "2025-03-20"
            })))
            .await
            .unwrap();
        assert_eq!(result["departure_time"], json!("08:00"));
    }

    #[tokio::test]
    async fn test_no_departures_and_no_time_rejected() {
        let handler = AvailableSeatsHandler::new(Arc::new(Timetable::new()));
        let err = handler
            .invoke(&args(json!({
                "starting_point": "Quetta",
                "destination": "Peshawar",
                "date": "2025-03-20"
            })))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArgs(_)));
    }

    #[tokio::test]
    async fn test_reserved_seat_not_listed() {
        let timetable = Arc::new(Timetable::new());
        timetable
            .reserve("Lahore", "Karachi", "2025-03-20", "08:00", "2B", "Ayesha Khan")
            .unwrap();
        let handler = AvailableSeatsHandler::new(timetable);
        let result = handler
            .invoke(&args(json!({
                "starting_point": "Lahore",
                "destination": "Karachi",
                "date": "2025-03-20",
                "departure_time": "08:00"
            })))
            .await
            .unwrap();
        assert_eq!(result["count"], json!(39));
        let seats = result["available_seats"].as_array().unwrap();
        assert!(!seats.contains(&json!("2B")));
    }

    #[tokio::test]
    async fn test_missing_date_rejected() {
        let handler = AvailableSeatsHandler::new(Arc::new(Timetable::new()));
        let err = handler
            .invoke(&args(json!({
                "starting_point": "Lahore",
                "destination": "Karachi"
            })))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("date is required"));
    }
}
