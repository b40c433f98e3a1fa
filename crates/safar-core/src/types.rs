//! Core value types for the booking assistant.
//!
//! Defines the booking snapshot and its merge semantics, the inbound turn
//! request, the assistant reply returned to the transport layer, and the
//! function-call request/outcome pair exchanged with the model gateway.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize a field into `Some(inner)` whenever the field is present,
/// so explicit `null` becomes `Some(None)` rather than `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// =============================================================================
// BookingSnapshot
// =============================================================================

/// The full set of booking fields known so far, each nullable.
///
/// A snapshot is an immutable value: merging a patch produces a new
/// snapshot, never mutates one in place. All seven fields serialize as
/// explicit `null` when absent so consumers can always enumerate the
/// complete field set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSnapshot {
    pub starting_point: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub seat_number: Option<String>,
    pub customer_name: Option<String>,
    pub phone_number: Option<String>,
    pub departure_time: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
}

impl BookingSnapshot {
    /// Produce a new snapshot by applying a partial update on top of this one.
    ///
    /// A field *present* in the patch (even if explicitly null) replaces the
    /// corresponding field here; a field *absent* from the patch keeps its
    /// prior value, including prior nulls. `confirmed` follows the same rule.
    /// Completeness is never inferred from field population.
    pub fn merge(&self, patch: &BookingPatch) -> BookingSnapshot {
        BookingSnapshot {
            starting_point: patch
                .starting_point
                .clone()
                .unwrap_or_else(|| self.starting_point.clone()),
            destination: patch
                .destination
                .clone()
                .unwrap_or_else(|| self.destination.clone()),
            date: patch.date.clone().unwrap_or_else(|| self.date.clone()),
            seat_number: patch
                .seat_number
                .clone()
                .unwrap_or_else(|| self.seat_number.clone()),
            customer_name: patch
                .customer_name
                .clone()
                .unwrap_or_else(|| self.customer_name.clone()),
            phone_number: patch
                .phone_number
                .clone()
                .unwrap_or_else(|| self.phone_number.clone()),
            departure_time: patch
                .departure_time
                .clone()
                .unwrap_or_else(|| self.departure_time.clone()),
            confirmed: patch.confirmed.unwrap_or(self.confirmed),
        }
    }

    /// Whether the five core route/contact fields plus seat and time are all set.
    pub fn is_fully_specified(&self) -> bool {
        self.starting_point.is_some()
            && self.destination.is_some()
            && self.date.is_some()
            && self.seat_number.is_some()
            && self.customer_name.is_some()
            && self.phone_number.is_some()
            && self.departure_time.is_some()
    }
}

// =============================================================================
// BookingPatch
// =============================================================================

/// A partial booking update as emitted by the model.
///
/// The double `Option` distinguishes a field that is absent from the patch
/// (outer `None`, keep the prior value) from a field explicitly set to null
/// (outer `Some(None)`, clear the prior value).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPatch {
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub starting_point: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub destination: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
}

// =============================================================================
// Turn request / assistant reply
// =============================================================================

/// One inbound turn, as handed to the orchestrator by the transport layer.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnRequest {
    /// Optional base64-encoded audio clip, possibly with a data-URL prefix.
    pub audio_base64: Option<String>,
    /// The booking state accumulated so far.
    pub booking_details: BookingSnapshot,
    /// Conversation identifier; `None` on the first interaction.
    pub chat_id: Option<String>,
}

/// The sole result of the orchestration core, serialized directly as the
/// response body. Wire field names match the original frontend contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub narration: String,
    #[serde(rename = "updatedBookingDetails")]
    pub updated_booking_details: BookingSnapshot,
    #[serde(rename = "bookingComplete")]
    pub booking_complete: bool,
    #[serde(rename = "chatId")]
    pub chat_id: Option<String>,
    #[serde(
        rename = "bookingSuccessful",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub booking_successful: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<String>,
}

impl AssistantReply {
    /// The fixed degraded reply used when the turn cannot be completed.
    pub fn fallback(chat_id: Option<String>, booking: BookingSnapshot) -> Self {
        AssistantReply {
            narration: "I'm sorry, I encountered an error processing your request. \
                        Please try again."
                .to_string(),
            updated_booking_details: booking,
            booking_complete: false,
            chat_id,
            booking_successful: None,
            booking_id: None,
            confirmation_code: None,
        }
    }
}

// =============================================================================
// Function call protocol
// =============================================================================

/// A function invocation requested by the model. Never constructed by the
/// core; only decoded from gateway responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallRequest {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Map<String, Value>,
}

/// Result of one capability invocation, success or error.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionOutcome {
    /// Structured value returned by the capability handler.
    Success(Value),
    /// Failure description; dispatch never drops a failed call.
    Error(String),
}

/// Outcome of one requested function call, tagged with the function name so
/// the model can correlate it with its request.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallOutcome {
    pub name: String,
    pub outcome: FunctionOutcome,
}

impl FunctionCallOutcome {
    pub fn success(name: impl Into<String>, value: Value) -> Self {
        FunctionCallOutcome {
            name: name.into(),
            outcome: FunctionOutcome::Success(value),
        }
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        FunctionCallOutcome {
            name: name.into(),
            outcome: FunctionOutcome::Error(message.into()),
        }
    }

    /// The JSON payload sent back to the model for this outcome.
    pub fn response_value(&self) -> Value {
        match &self.outcome {
            FunctionOutcome::Success(value) => value.clone(),
            FunctionOutcome::Error(message) => serde_json::json!({ "error": message }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, FunctionOutcome::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_snapshot() -> BookingSnapshot {
        BookingSnapshot {
            starting_point: Some("Lahore".to_string()),
            destination: Some("Karachi".to_string()),
            date: Some("2025-03-20".to_string()),
            seat_number: Some("A4".to_string()),
            customer_name: Some("Ayesha Khan".to_string()),
            phone_number: Some("0301-1234567".to_string()),
            departure_time: Some("14:30".to_string()),
            confirmed: true,
        }
    }

    // ---- Merge semantics ----

    #[test]
    fn test_merge_empty_patch_preserves_everything() {
        let prev = full_snapshot();
        let merged = prev.merge(&BookingPatch::default());
        assert_eq!(merged, prev);
    }

    #[test]
    fn test_merge_present_field_replaces() {
        let prev = full_snapshot();
        let patch = BookingPatch {
            destination: Some(Some("Multan".to_string())),
            ..BookingPatch::default()
        };
        let merged = prev.merge(&patch);
        assert_eq!(merged.destination.as_deref(), Some("Multan"));
        assert_eq!(merged.starting_point.as_deref(), Some("Lahore"));
    }

    #[test]
    fn test_merge_explicit_null_clears_field() {
        let prev = full_snapshot();
        let patch = BookingPatch {
            seat_number: Some(None),
            ..BookingPatch::default()
        };
        let merged = prev.merge(&patch);
        assert!(merged.seat_number.is_none());
        assert_eq!(merged.customer_name.as_deref(), Some("Ayesha Khan"));
    }

    #[test]
    fn test_merge_absent_field_keeps_prior_null() {
        let prev = BookingSnapshot::default();
        let patch = BookingPatch {
            starting_point: Some(Some("Islamabad".to_string())),
            ..BookingPatch::default()
        };
        let merged = prev.merge(&patch);
        assert_eq!(merged.starting_point.as_deref(), Some("Islamabad"));
        assert!(merged.destination.is_none());
        assert!(merged.date.is_none());
        assert!(!merged.confirmed);
    }

    #[test]
    fn test_merge_confirmed_is_independent() {
        let prev = full_snapshot();
        let patch = BookingPatch {
            confirmed: Some(false),
            ..BookingPatch::default()
        };
        let merged = prev.merge(&patch);
        assert!(!merged.confirmed);
        // All seven fields still set; completeness never inferred.
        assert!(merged.is_fully_specified());
    }

    #[test]
    fn test_merge_does_not_mutate_previous() {
        let prev = full_snapshot();
        let patch = BookingPatch {
            date: Some(Some("2025-04-01".to_string())),
            ..BookingPatch::default()
        };
        let _ = prev.merge(&patch);
        assert_eq!(prev.date.as_deref(), Some("2025-03-20"));
    }

    // ---- Patch deserialization ----

    #[test]
    fn test_patch_absent_vs_null_vs_value() {
        let patch: BookingPatch = serde_json::from_value(json!({
            "starting_point": "Lahore",
            "seat_number": null
        }))
        .unwrap();
        assert_eq!(patch.starting_point, Some(Some("Lahore".to_string())));
        assert_eq!(patch.seat_number, Some(None));
        assert_eq!(patch.destination, None);
    }

    // ---- Snapshot serialization ----

    #[test]
    fn test_snapshot_serializes_all_fields_as_null() {
        let value = serde_json::to_value(BookingSnapshot::default()).unwrap();
        let obj = value.as_object().unwrap();
        for field in [
            "starting_point",
            "destination",
            "date",
            "seat_number",
            "customer_name",
            "phone_number",
            "departure_time",
        ] {
            assert!(obj.contains_key(field), "missing field {}", field);
            assert!(obj[field].is_null(), "field {} should be null", field);
        }
        assert_eq!(obj["confirmed"], json!(false));
    }

    #[test]
    fn test_snapshot_deserialize_missing_confirmed_defaults_false() {
        let snapshot: BookingSnapshot = serde_json::from_value(json!({
            "starting_point": "Quetta",
            "destination": null,
            "date": null,
            "seat_number": null,
            "customer_name": null,
            "phone_number": null,
            "departure_time": null
        }))
        .unwrap();
        assert!(!snapshot.confirmed);
        assert_eq!(snapshot.starting_point.as_deref(), Some("Quetta"));
    }

    #[test]
    fn test_is_fully_specified() {
        assert!(full_snapshot().is_fully_specified());
        let mut partial = full_snapshot();
        partial.phone_number = None;
        assert!(!partial.is_fully_specified());
        // `confirmed` plays no part in completeness.
        let mut unconfirmed = full_snapshot();
        unconfirmed.confirmed = false;
        assert!(unconfirmed.is_fully_specified());
    }

    // ---- AssistantReply wire format ----

    #[test]
    fn test_reply_wire_field_names() {
        let reply = AssistantReply {
            narration: "Here are your options".to_string(),
            updated_booking_details: BookingSnapshot::default(),
            booking_complete: false,
            chat_id: Some("abc".to_string()),
            booking_successful: Some(true),
            booking_id: Some("B1".to_string()),
            confirmation_code: Some("C1".to_string()),
        };
        let value = serde_json::to_value(&reply).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("updatedBookingDetails"));
        assert!(obj.contains_key("bookingComplete"));
        assert!(obj.contains_key("chatId"));
        assert_eq!(obj["bookingSuccessful"], json!(true));
        assert_eq!(obj["booking_id"], json!("B1"));
        assert_eq!(obj["confirmation_code"], json!("C1"));
    }

    #[test]
    fn test_reply_optional_fields_omitted_when_absent() {
        let reply = AssistantReply::fallback(None, BookingSnapshot::default());
        let value = serde_json::to_value(&reply).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("bookingSuccessful"));
        assert!(!obj.contains_key("booking_id"));
        assert!(!obj.contains_key("confirmation_code"));
        assert!(obj["chatId"].is_null());
    }

    #[test]
    fn test_fallback_preserves_incoming_booking() {
        let booking = full_snapshot();
        let reply = AssistantReply::fallback(Some("chat-1".to_string()), booking.clone());
        assert_eq!(reply.updated_booking_details, booking);
        assert!(!reply.booking_complete);
        assert!(reply.narration.contains("encountered an error"));
        assert_eq!(reply.chat_id.as_deref(), Some("chat-1"));
    }

    // ---- Function call protocol ----

    #[test]
    fn test_function_call_request_default_args() {
        let call: FunctionCallRequest =
            serde_json::from_value(json!({ "name": "check_available_buses" })).unwrap();
        assert_eq!(call.name, "check_available_buses");
        assert!(call.args.is_empty());
    }

    #[test]
    fn test_outcome_success_response_value() {
        let outcome = FunctionCallOutcome::success("check_available_seats", json!({"seats": 12}));
        assert!(!outcome.is_error());
        assert_eq!(outcome.response_value(), json!({"seats": 12}));
    }

    #[test]
    fn test_outcome_error_response_value() {
        let outcome =
            FunctionCallOutcome::error("make_reservation", "Failed to execute make_reservation");
        assert!(outcome.is_error());
        assert_eq!(
            outcome.response_value(),
            json!({"error": "Failed to execute make_reservation"})
        );
    }
}
