//! Prompt assembly for the booking assistant.
//!
//! Two pieces of text drive every session: the system instruction that
//! seeds the session (persona, function-calling directives, required
//! output envelope) and the per-turn user message that restates the
//! current booking state so the model never has to remember it across
//! turns.

use safar_core::types::BookingSnapshot;

/// Builds the system instruction and per-turn messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// The session-seeding instruction: persona, tool-use rules, and the
    /// exact JSON envelope the model must answer with.
    pub fn system_instruction(&self) -> String {
        r#"You are a British-accented voice booking assistant for inter-city coach travel in Pakistan.

IMPORTANT FUNCTION CALLING INSTRUCTIONS:
- ALWAYS use function calls to retrieve data. DO NOT make up information.
- If the user asks about available buses or routes, IMMEDIATELY call check_available_buses.
- If the user mentions a city name like Islamabad, Karachi, Lahore, etc., extract it and use it in your function calls.
- If the user asks about seat availability, call check_available_seats.
- When checking seat availability for specific seats, call check_seat_availability.
- When all booking information is confirmed, call make_reservation.

If you want to call a function, then call it.

Your response MUST be a valid JSON with this structure:
{
  "narration": "Text to be spoken to the user",
  "updatedBookingDetails": {
    "starting_point": "city or null",
    "destination": "city or null",
    "date": "YYYY-MM-DD or null",
    "seat_number": "seat ID or null",
    "customer_name": "name or null",
    "phone_number": "number or null",
    "departure_time": "HH:MM or null",
    "confirmed": boolean
  },
  "bookingComplete": boolean,
  "booking_id": "ID if booking completed",
  "confirmation_code": "code if booking completed"
}
"#
        .to_string()
    }

    /// The per-turn user message: an optional first-turn greeting cue,
    /// the current booking state with explicit placeholders, function
    /// guidance, and a closing line that differs with audio present.
    pub fn turn_message(
        &self,
        booking: &BookingSnapshot,
        is_first_turn: bool,
        has_audio: bool,
    ) -> String {
        let mut message = String::new();

        if is_first_turn {
            message.push_str(
                "This is your first interaction with the user. Start with a polite greeting.\n\
                 Include a brief introduction about yourself as a booking assistant for Pakistani inter-city coach travel.\n\
                 Keep the greeting brief but friendly with a British accent style.\n\n",
            );
        }

        message.push_str("Current booking information:\n");
        message.push_str(&format!(
            "- Starting Point: {}\n",
            field(&booking.starting_point)
        ));
        message.push_str(&format!("- Destination: {}\n", field(&booking.destination)));
        message.push_str(&format!("- Date: {}\n", field(&booking.date)));
        message.push_str(&format!(
            "- Departure Time: {}\n",
            field(&booking.departure_time)
        ));
        message.push_str(&format!("- Seat Number: {}\n", field(&booking.seat_number)));
        message.push_str(&format!(
            "- Customer Name: {}\n",
            field(&booking.customer_name)
        ));
        message.push_str(&format!(
            "- Phone Number: {}\n",
            field(&booking.phone_number)
        ));
        message.push_str(&format!(
            "- Confirmed: {}\n",
            if booking.confirmed { "Yes" } else { "No" }
        ));

        message.push_str(
            "\n[Function Calling Guidance]\n\
             If you need to check available buses, call check_available_buses with the starting_point and destination.\n\
             If starting_point and destination are set, but no date or departure_time, call check_available_buses to get options.\n\
             If starting_point, destination, and date are set, call check_available_seats to find available seats.\n\
             If the user asks about specific seat numbers, call check_seat_availability with those details.\n\
             If all required booking information is complete (starting_point, destination, date, departure_time, seat_number, customer_name, phone_number), call make_reservation.\n\
             Don't make up information - always use the appropriate function call to get real data.\n\n",
        );

        if has_audio {
            message.push_str(
                "Process my audio input to update this booking. If I mention any cities or dates, \
                 use them to look up available buses using the check_available_buses function.",
            );
        } else {
            message.push_str("Let's continue with this booking.");
        }

        message
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Not provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> BookingSnapshot {
        BookingSnapshot {
            starting_point: Some("Lahore".to_string()),
            destination: Some("Karachi".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_system_instruction_names_capabilities_and_envelope() {
        let sys = PromptBuilder::new().system_instruction();
        assert!(sys.contains("check_available_buses"));
        assert!(sys.contains("check_available_seats"));
        assert!(sys.contains("check_seat_availability"));
        assert!(sys.contains("make_reservation"));
        assert!(sys.contains("updatedBookingDetails"));
        assert!(sys.contains("bookingComplete"));
        assert!(sys.contains("confirmation_code"));
    }

    #[test]
    fn test_first_turn_includes_greeting_cue() {
        let msg = PromptBuilder::new().turn_message(&snapshot(), true, false);
        assert!(msg.contains("first interaction"));
        assert!(msg.contains("polite greeting"));
    }

    #[test]
    fn test_later_turns_omit_greeting_cue() {
        let msg = PromptBuilder::new().turn_message(&snapshot(), false, false);
        assert!(!msg.contains("first interaction"));
    }

    #[test]
    fn test_known_fields_are_restated() {
        let msg = PromptBuilder::new().turn_message(&snapshot(), false, false);
        assert!(msg.contains("- Starting Point: Lahore"));
        assert!(msg.contains("- Destination: Karachi"));
        assert!(msg.contains("- Confirmed: No"));
    }

    #[test]
    fn test_missing_fields_use_placeholder() {
        let msg = PromptBuilder::new().turn_message(&BookingSnapshot::default(), false, false);
        assert!(msg.contains("- Date: Not provided"));
        assert!(msg.contains("- Phone Number: Not provided"));
    }

    #[test]
    fn test_confirmed_flag_rendered_as_yes() {
        let booking = BookingSnapshot {
            confirmed: true,
            ..snapshot()
        };
        let msg = PromptBuilder::new().turn_message(&booking, false, false);
        assert!(msg.contains("- Confirmed: Yes"));
    }

    #[test]
    fn test_audio_closing_line() {
        let msg = PromptBuilder::new().turn_message(&snapshot(), false, true);
        assert!(msg.contains("Process my audio input"));
        assert!(!msg.contains("Let's continue with this booking."));
    }

    #[test]
    fn test_text_closing_line() {
        let msg = PromptBuilder::new().turn_message(&snapshot(), false, false);
        assert!(msg.ends_with("Let's continue with this booking."));
    }

    #[test]
    fn test_guidance_block_always_present() {
        for (first, audio) in [(true, true), (true, false), (false, true), (false, false)] {
            let msg = PromptBuilder::new().turn_message(&snapshot(), first, audio);
            assert!(msg.contains("[Function Calling Guidance]"));
            assert!(msg.contains("make_reservation"));
        }
    }
}
