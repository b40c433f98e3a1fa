//! In-memory inter-city coach timetable and seat inventory.
//!
//! Backs the booking capabilities with deterministic demo data: a fixed
//! daily schedule between major Pakistani cities and a 40-seat coach
//! layout per departure. Reservations are held for the process lifetime.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use uuid::Uuid;

use crate::error::CapabilityError;

/// Cities served by the timetable.
pub const CITIES: &[&str] = &[
    "Karachi",
    "Lahore",
    "Islamabad",
    "Peshawar",
    "Multan",
    "Faisalabad",
    "Quetta",
    "Rawalpindi",
];

/// Seat rows per coach.
const SEAT_ROWS: u8 = 10;
/// Seat columns per coach.
const SEAT_COLUMNS: &[char] = &['A', 'B', 'C', 'D'];

/// One scheduled departure, repeated daily.
#[derive(Debug, Clone, Serialize)]
pub struct Departure {
    pub service: String,
    pub starting_point: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub fare_pkr: u32,
}

/// A confirmed seat reservation.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub booking_id: String,
    pub confirmation_code: String,
    pub seat_number: String,
    pub customer_name: String,
}

/// Key identifying one seat on one dated departure.
type SeatKey = (String, String, String, String, String);

/// Daily schedule plus the per-seat reservation ledger.
pub struct Timetable {
    departures: Vec<Departure>,
    reserved: Mutex<HashMap<SeatKey, Reservation>>,
}

impl Default for Timetable {
    fn default() -> Self {
        Self::new()
    }
}

impl Timetable {
    /// Build the fixed demo schedule.
    pub fn new() -> Self {
        let departures = vec![
            departure("Daewoo Express", "Lahore", "Karachi", "08:00", "26:00", 7500),
            departure("Faisal Movers", "Lahore", "Karachi", "14:30", "32:30", 6800),
            departure("Daewoo Express", "Lahore", "Islamabad", "07:00", "11:30", 2400),
            departure("Skyways", "Lahore", "Islamabad", "16:00", "20:45", 2100),
            departure("Faisal Movers", "Karachi", "Lahore", "09:00", "27:00", 7500),
            departure("Daewoo Express", "Karachi", "Multan", "10:30", "22:00", 5200),
            departure("Daewoo Express", "Islamabad", "Peshawar", "08:15", "10:45", 1500),
            departure("Skyways", "Islamabad", "Lahore", "18:00", "22:30", 2400),
            departure("Faisal Movers", "Multan", "Quetta", "06:00", "18:00", 5600),
            departure("Daewoo Express", "Rawalpindi", "Faisalabad", "12:00", "17:00", 2000),
        ];
        Self {
            departures,
            reserved: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a city is on the network (case-insensitive).
    pub fn knows_city(&self, city: &str) -> bool {
        CITIES.iter().any(|c| c.eq_ignore_ascii_case(city))
    }

    /// All daily departures between two cities, in schedule order.
    pub fn find_departures(&self, starting_point: &str, destination: &str) -> Vec<Departure> {
        self.departures
            .iter()
            .filter(|d| {
                d.starting_point.eq_ignore_ascii_case(starting_point)
                    && d.destination.eq_ignore_ascii_case(destination)
            })
            .cloned()
            .collect()
    }

    /// Every seat id in the coach layout, row-major.
    pub fn seat_layout() -> Vec<String> {
        let mut seats = Vec::with_capacity(usize::from(SEAT_ROWS) * SEAT_COLUMNS.len());
        for row in 1..=SEAT_ROWS {
            for column in SEAT_COLUMNS {
                seats.push(format!("{}{}", row, column));
            }
        }
        seats
    }

    /// Whether a seat id exists in the coach layout.
    pub fn is_valid_seat(seat_number: &str) -> bool {
        Self::seat_layout()
            .iter()
            .any(|s| s.eq_ignore_ascii_case(seat_number))
    }

    /// Open seats for one dated departure.
    pub fn available_seats(
        &self,
        starting_point: &str,
        destination: &str,
        date: &str,
        departure_time: &str,
    ) -> Vec<String> {
        let reserved = self.reserved.lock().expect("reservation lock poisoned");
        Self::seat_layout()
            .into_iter()
            .filter(|seat| {
                !reserved.contains_key(&seat_key(
                    starting_point,
                    destination,
                    date,
                    departure_time,
                    seat,
                ))
            })
            .collect()
    }

    /// Whether a specific seat is still open on a dated departure.
    pub fn seat_available(
        &self,
        starting_point: &str,
        destination: &str,
        date: &str,
        departure_time: &str,
        seat_number: &str,
    ) -> bool {
        if !Self::is_valid_seat(seat_number) {
            return false;
        }
        let reserved = self.reserved.lock().expect("reservation lock poisoned");
        !reserved.contains_key(&seat_key(
            starting_point,
            destination,
            date,
            departure_time,
            seat_number,
        ))
    }

    /// Reserve a seat, producing a booking id and confirmation code.
    ///
    /// Fails if the seat id is not in the layout or is already taken for
    /// that dated departure.
    pub fn reserve(
        &self,
        starting_point: &str,
        destination: &str,
        date: &str,
        departure_time: &str,
        seat_number: &str,
        customer_name: &str,
    ) -> Result<Reservation, CapabilityError> {
        if !Self::is_valid_seat(seat_number) {
            return Err(CapabilityError::InvalidArgs(format!(
                "seat {} does not exist in the coach layout",
                seat_number
            )));
        }

        let key = seat_key(
            starting_point,
            destination,
            date,
            departure_time,
            seat_number,
        );
        let mut reserved = self.reserved.lock().expect("reservation lock poisoned");
        if reserved.contains_key(&key) {
            return Err(CapabilityError::Failed(format!(
                "seat {} is already reserved on this departure",
                seat_number
            )));
        }

        let id = Uuid::new_v4().simple().to_string();
        let reservation = Reservation {
            booking_id: format!("BK-{}", &id[..8].to_uppercase()),
            confirmation_code: id[8..14].to_uppercase(),
            seat_number: seat_number.to_uppercase(),
            customer_name: customer_name.to_string(),
        };
        reserved.insert(key, reservation.clone());
        Ok(reservation)
    }
}

fn departure(
    service: &str,
    starting_point: &str,
    destination: &str,
    departure_time: &str,
    arrival_time: &str,
    fare_pkr: u32,
) -> Departure {
    Departure {
        service: service.to_string(),
        starting_point: starting_point.to_string(),
        destination: destination.to_string(),
        departure_time: departure_time.to_string(),
        arrival_time: arrival_time.to_string(),
        fare_pkr,
    }
}

fn seat_key(
    starting_point: &str,
    destination: &str,
    date: &str,
    departure_time: &str,
    seat_number: &str,
) -> SeatKey {
    (
        starting_point.to_lowercase(),
        destination.to_lowercase(),
        date.to_string(),
        departure_time.to_string(),
        seat_number.to_uppercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Schedule lookups ----

    #[test]
    fn test_find_departures_known_route() {
        let timetable = Timetable::new();
        let routes = timetable.find_departures("Lahore", "Karachi");
        assert_eq!(routes.len(), 2);
        assert!(routes.iter().all(|r| r.starting_point == "Lahore"));
    }

    #[test]
    fn test_find_departures_case_insensitive() {
        let timetable = Timetable::new();
        let routes = timetable.find_departures("lahore", "KARACHI");
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn test_find_departures_unknown_route() {
        let timetable = Timetable::new();
        assert!(timetable.find_departures("Quetta", "Peshawar").is_empty());
    }

    #[test]
    fn test_knows_city() {
        let timetable = Timetable::new();
        assert!(timetable.knows_city("Lahore"));
        assert!(timetable.knows_city("multan"));
        assert!(!timetable.knows_city("Kabul"));
    }

    // ---- Seat layout ----

    #[test]
    fn test_seat_layout_size() {
        assert_eq!(Timetable::seat_layout().len(), 40);
    }

    #[test]
    fn test_is_valid_seat() {
        assert!(Timetable::is_valid_seat("1A"));
        assert!(Timetable::is_valid_seat("10d"));
        assert!(!Timetable::is_valid_seat("11A"));
        assert!(!Timetable::is_valid_seat("1E"));
        assert!(!Timetable::is_valid_seat(""));
    }

    // ---- Availability and reservation ----

    #[test]
    fn test_all_seats_open_initially() {
        let timetable = Timetable::new();
        let seats = timetable.available_seats("Lahore", "Karachi", "2025-03-20", "08:00");
        assert_eq!(seats.len(), 40);
        assert!(timetable.seat_available("Lahore", "Karachi", "2025-03-20", "08:00", "4C"));
    }

    #[test]
    fn test_reserve_removes_seat() {
        let timetable = Timetable::new();
        let reservation = timetable
            .reserve("Lahore", "Karachi", "2025-03-20", "08:00", "4C", "Ayesha Khan")
            .unwrap();
        assert!(reservation.booking_id.starts_with("BK-"));
        assert_eq!(reservation.confirmation_code.len(), 6);
        assert_eq!(reservation.seat_number, "4C");

        assert!(!timetable.seat_available("Lahore", "Karachi", "2025-03-20", "08:00", "4C"));
        let seats = timetable.available_seats("Lahore", "Karachi", "2025-03-20", "08:00");
        assert_eq!(seats.len(), 39);
        assert!(!seats.contains(&"4C".to_string()));
    }

    #[test]
    fn test_double_reserve_fails() {
        let timetable = Timetable::new();
        timetable
            .reserve("Lahore", "Karachi", "2025-03-20", "08:00", "4C", "Ayesha Khan")
            .unwrap();
        let err = timetable
            .reserve("Lahore", "Karachi", "2025-03-20", "08:00", "4c", "Bilal Ahmed")
            .unwrap_err();
        assert!(matches!(err, CapabilityError::Failed(_)));
    }

    #[test]
    fn test_same_seat_different_date_is_independent() {
        let timetable = Timetable::new();
        timetable
            .reserve("Lahore", "Karachi", "2025-03-20", "08:00", "4C", "Ayesha Khan")
            .unwrap();
        assert!(timetable.seat_available("Lahore", "Karachi", "2025-03-21", "08:00", "4C"));
        assert!(timetable.seat_available("Lahore", "Karachi", "2025-03-20", "14:30", "4C"));
    }

    #[test]
    fn test_reserve_invalid_seat_rejected() {
        let timetable = Timetable::new();
        let err = timetable
            .reserve("Lahore", "Karachi", "2025-03-20", "08:00", "99Z", "Ayesha Khan")
            .unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArgs(_)));
    }

    #[test]
    fn test_distinct_reservations_get_distinct_ids() {
        let timetable = Timetable::new();
        let first = timetable
            .reserve("Lahore", "Karachi", "2025-03-20", "08:00", "1A", "A")
            .unwrap();
        let second = timetable
            .reserve("Lahore", "Karachi", "2025-03-20", "08:00", "1B", "B")
            .unwrap();
        assert_ne!(first.booking_id, second.booking_id);
        assert_ne!(first.confirmation_code, second.confirmation_code);
    }
}
