//! `check_available_buses` capability.
//!
//! Looks up scheduled departures between two cities, with fares and
//! journey times, so the model never invents route data.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::CapabilityError;
use crate::handler::required_str;
use crate::registry::{Capability, FunctionDeclaration};
use crate::timetable::Timetable;

/// Handler for route/departure lookups.
pub struct AvailableBusesHandler {
    timetable: Arc<Timetable>,
}

impl AvailableBusesHandler {
    pub fn new(timetable: Arc<Timetable>) -> Self {
        Self { timetable }
    }
}

#[async_trait]
impl Capability for AvailableBusesHandler {
    fn name(&self) -> &'static str {
        "check_available_buses"
    }

    fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name().to_string(),
            description: "List scheduled coach departures between two cities, including \
                          departure and arrival times and fares in PKR."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "starting_point": {
                        "type": "string",
                        "description": "Departure city, e.g. Lahore"
                    },
                    "destination": {
                        "type": "string",
                        "description": "Arrival city, e.g. Karachi"
                    }
                },
                "required": ["starting_point", "destination"]
            }),
        }
    }

    async fn invoke(
        &self,
        args: &serde_json::Map<String, Value>,
    ) -> Result<Value, CapabilityError> {
        let starting_point = required_str(args, "starting_point")?;
        let destination = required_str(args, "destination")?;

        for city in [starting_point, destination] {
            if !self.timetable.knows_city(city) {
                return Err(CapabilityError::InvalidArgs(format!(
                    "{} is not a city on the network",
                    city
                )));
            }
        }

        let departures = self.timetable.find_departures(starting_point, destination);
        tracing::info!(
            starting_point = %starting_point,
            destination = %destination,
            count = departures.len(),
            "Bus availability lookup"
        );

        Ok(json!({
            "starting_point": starting_point,
            "destination": destination,
            "buses": departures,
            "count": departures.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> AvailableBusesHandler {
        AvailableBusesHandler::new(Arc::new(Timetable::new()))
    }

    fn args(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_known_route_returns_buses() {
        let result = handler()
            .invoke(&args(json!({
                "starting_point": "Lahore",
                "destination": "Karachi"
            })))
            .await
            .unwrap();
        assert_eq!(result["count"], json!(2));
        let buses = result["buses"].as_array().unwrap();
        assert!(buses.iter().all(|b| b["fare_pkr"].is_number()));
    }

    #[tokio::test]
    async fn test_route_with_no_service_returns_empty_list() {
        let result = handler()
            .invoke(&args(json!({
                "starting_point": "Quetta",
                "destination": "Peshawar"
            })))
            .await
            .unwrap();
        assert_eq!(result["count"], json!(0));
        assert!(result["buses"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_city_rejected() {
        let err = handler()
            .invoke(&args(json!({
                "starting_point": "Kabul",
                "destination": "Lahore"
            })))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArgs(_)));
    }

    #[tokio::test]
    async fn test_missing_destination_rejected() {
        let err = handler()
            .invoke(&args(json!({"starting_point": "Lahore"})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("destination is required"));
    }

    #[test]
    fn test_declaration_shape() {
        let declaration = handler().declaration();
        assert_eq!(declaration.name, "check_available_buses");
        assert_eq!(
            declaration.parameters["required"],
            json!(["starting_point", "destination"])
        );
    }
}
