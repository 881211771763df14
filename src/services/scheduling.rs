use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::availability::time_from_minutes;
use crate::models::{BookedInterval, BusinessHours, BusinessWindow, ValidatedBooking};

#[derive(Debug)]
pub enum SchedulingError {
    OutsideBusinessHours { hours: String },
    Conflict,
    Lookup(anyhow::Error),
}

impl std::fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingError::OutsideBusinessHours { hours } => {
                write!(f, "That time is outside our business hours ({hours})")
            }
            SchedulingError::Conflict => {
                write!(
                    f,
                    "Sorry, that time slot is already booked. Please pick a different time."
                )
            }
            SchedulingError::Lookup(e) => write!(f, "failed to load bookings: {e}"),
        }
    }
}

fn overlaps(start: u32, end: u32, booking: &BookedInterval) -> bool {
    start < booking.end() && end > booking.start()
}

/// Start times, in ascending order, at which an appointment of
/// `duration_minutes` fits inside the window without touching any booking.
pub fn compute_available_slots(
    window: &BusinessWindow,
    duration_minutes: u32,
    bookings: &[BookedInterval],
) -> Vec<NaiveTime> {
    if !window.fits_duration(duration_minutes) || window.step == 0 {
        return vec![];
    }

    let mut slots = vec![];
    let mut start = window.open;
    while start < window.close {
        let end = match start.checked_add(duration_minutes) {
            Some(end) if end <= window.close => end,
            _ => break,
        };
        if !bookings.iter().any(|b| overlaps(start, end, b)) {
            if let Some(t) = time_from_minutes(start) {
                slots.push(t);
            }
        }
        start = start.saturating_add(window.step);
    }
    slots
}

/// Like [`compute_available_slots`], but yields nothing on closed days.
pub fn slots_for_date(
    hours: &BusinessHours,
    date: NaiveDate,
    duration_minutes: u32,
    bookings: &[BookedInterval],
) -> Vec<NaiveTime> {
    if !hours.is_open_on(date) {
        return vec![];
    }
    compute_available_slots(&hours.window, duration_minutes, bookings)
}

pub fn is_slot_free(
    window: &BusinessWindow,
    start_time: NaiveTime,
    duration_minutes: u32,
    bookings: &[BookedInterval],
) -> bool {
    let requested = BookedInterval {
        start_time,
        duration_minutes,
    };
    let (start, end) = (requested.start(), requested.end());
    start >= window.open
        && end <= window.close
        && duration_minutes > 0
        && !bookings.iter().any(|b| overlaps(start, end, b))
}

/// Checks a requested booking against the window and the bookings already
/// stored for its date. Callers hold the connection across this check and the
/// insert that follows it.
pub fn validate_booking_time(
    conn: &Connection,
    booking: &ValidatedBooking,
    hours: &BusinessHours,
) -> Result<(), SchedulingError> {
    let existing = queries::get_intervals_for_date(conn, &booking.date)
        .map_err(SchedulingError::Lookup)?;

    let requested = booking.interval();
    let (start, end) = (requested.start(), requested.end());
    if !hours.is_open_on(booking.date) || start < hours.window.open || end > hours.window.close {
        return Err(SchedulingError::OutsideBusinessHours {
            hours: hours.to_human_readable(),
        });
    }

    if !is_slot_free(
        &hours.window,
        booking.start_time,
        booking.duration_minutes,
        &existing,
    ) {
        return Err(SchedulingError::Conflict);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::availability::{format_minutes, minutes_of_day, parse_time};

    fn t(s: &str) -> NaiveTime {
        parse_time(s).unwrap()
    }

    fn booked(start: &str, duration_minutes: u32) -> BookedInterval {
        BookedInterval {
            start_time: t(start),
            duration_minutes,
        }
    }

    fn fmt(slots: &[NaiveTime]) -> Vec<String> {
        slots.iter().map(|s| s.format("%H:%M").to_string()).collect()
    }

    fn window() -> BusinessWindow {
        BusinessWindow::default()
    }

    #[test]
    fn test_zero_duration_yields_nothing() {
        assert!(compute_available_slots(&window(), 0, &[]).is_empty());
    }

    #[test]
    fn test_empty_day_every_step_until_close_minus_duration() {
        for duration in [30, 60, 90, 120, 180, 660] {
            let slots = compute_available_slots(&window(), duration, &[]);
            let expected: Vec<String> = (0..)
                .map(|i| 420 + i * 30)
                .take_while(|m| m + duration <= 1080)
                .map(format_minutes)
                .collect();
            assert_eq!(fmt(&slots), expected, "duration {duration}");
        }
    }

    #[test]
    fn test_duration_longer_than_window() {
        assert!(compute_available_slots(&window(), 661, &[]).is_empty());
        assert!(compute_available_slots(&window(), u32::MAX, &[]).is_empty());
        assert!(compute_available_slots(&window(), u32::MAX, &[booked("09:00", u32::MAX)]).is_empty());
    }

    #[test]
    fn test_huge_existing_booking_blocks_rest_of_day() {
        let slots = fmt(&compute_available_slots(&window(), 60, &[booked("12:00", u32::MAX)]));
        assert_eq!(slots.last().map(String::as_str), Some("11:00"));
    }

    #[test]
    fn test_existing_booking_excludes_overlapping_starts() {
        let slots = fmt(&compute_available_slots(&window(), 60, &[booked("09:00", 60)]));
        assert!(!slots.contains(&"09:00".to_string()));
        assert!(!slots.contains(&"09:30".to_string()));
        assert!(slots.contains(&"08:30".to_string()));
        assert!(slots.contains(&"10:00".to_string()));
    }

    #[test]
    fn test_two_hour_service_never_starts_after_16() {
        let slots = compute_available_slots(&window(), 120, &[]);
        assert_eq!(slots.last().copied(), Some(t("16:00")));
        assert!(slots.iter().all(|s| *s <= t("16:00")));
    }

    #[test]
    fn test_back_to_back_allowed() {
        let bookings = [booked("08:00", 60), booked("10:00", 60)];
        let slots = fmt(&compute_available_slots(&window(), 60, &bookings));
        assert!(slots.contains(&"07:00".to_string()));
        assert!(slots.contains(&"09:00".to_string()));
        assert!(slots.contains(&"11:00".to_string()));
        assert!(!slots.contains(&"07:30".to_string()));
        assert!(!slots.contains(&"09:30".to_string()));
    }

    #[test]
    fn test_no_returned_slot_overlaps_any_booking() {
        let bookings = [
            booked("07:15", 45),
            booked("10:00", 120),
            booked("13:30", 30),
            booked("16:45", 75),
        ];
        for duration in [30, 60, 120, 150] {
            for slot in compute_available_slots(&window(), duration, &bookings) {
                let start = minutes_of_day(slot);
                let end = start + duration;
                for b in &bookings {
                    assert!(
                        !(start < b.end() && end > b.start()),
                        "{slot} ({duration}m) overlaps {:?}",
                        b
                    );
                }
                assert!(end <= 1080);
            }
        }
    }

    #[test]
    fn test_slots_are_ascending() {
        let slots = compute_available_slots(&window(), 30, &[booked("12:00", 90)]);
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_slots_for_closed_day() {
        let hours = BusinessHours::default();
        let sunday = NaiveDate::from_ymd_opt(2030, 6, 16).unwrap();
        let monday = NaiveDate::from_ymd_opt(2030, 6, 17).unwrap();
        assert!(slots_for_date(&hours, sunday, 60, &[]).is_empty());
        assert_eq!(slots_for_date(&hours, monday, 60, &[]).len(), 21);
    }

    #[test]
    fn test_is_slot_free() {
        let bookings = [booked("10:00", 60)];
        assert!(is_slot_free(&window(), t("09:00"), 60, &bookings));
        assert!(is_slot_free(&window(), t("11:00"), 60, &bookings));
        assert!(!is_slot_free(&window(), t("10:30"), 60, &bookings));
        assert!(!is_slot_free(&window(), t("06:30"), 60, &[]));
        assert!(!is_slot_free(&window(), t("17:30"), 60, &[]));
        assert!(!is_slot_free(&window(), t("12:00"), 0, &[]));
        assert!(!is_slot_free(&window(), t("07:00"), 661, &[]));
        assert!(!is_slot_free(&window(), t("17:59"), u32::MAX, &[]));
    }

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn request(date: &str, time: &str, duration_minutes: u32) -> ValidatedBooking {
        ValidatedBooking {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: t(time),
            duration_minutes,
            client_name: "Alice".to_string(),
            client_phone: "+5573999990000".to_string(),
            services: vec!["Manicure".to_string()],
            total_cost: 20.0,
        }
    }

    #[test]
    fn test_validate_free_slot() {
        let conn = setup_db();
        let hours = BusinessHours::default();
        assert!(validate_booking_time(&conn, &request("2030-06-17", "10:00", 60), &hours).is_ok());
    }

    #[test]
    fn test_validate_conflict_with_existing_booking() {
        let conn = setup_db();
        let hours = BusinessHours::default();
        queries::create_booking(&conn, &request("2030-06-17", "10:00", 60), None).unwrap();

        let result = validate_booking_time(&conn, &request("2030-06-17", "10:30", 60), &hours);
        assert!(matches!(result, Err(SchedulingError::Conflict)));

        // Other dates are unaffected
        let result = validate_booking_time(&conn, &request("2030-06-18", "10:30", 60), &hours);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_adjacent_booking() {
        let conn = setup_db();
        let hours = BusinessHours::default();
        queries::create_booking(&conn, &request("2030-06-17", "10:00", 60), None).unwrap();
        let result = validate_booking_time(&conn, &request("2030-06-17", "11:00", 60), &hours);
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_outside_hours() {
        let conn = setup_db();
        let hours = BusinessHours::default();
        let result = validate_booking_time(&conn, &request("2030-06-17", "17:30", 60), &hours);
        assert!(matches!(
            result,
            Err(SchedulingError::OutsideBusinessHours { .. })
        ));
    }

    #[test]
    fn test_validate_duration_overflowing_day() {
        let conn = setup_db();
        let hours = BusinessHours::default();
        for duration in [661, u32::MAX] {
            let result =
                validate_booking_time(&conn, &request("2030-06-17", "09:00", duration), &hours);
            assert!(matches!(
                result,
                Err(SchedulingError::OutsideBusinessHours { .. })
            ));
        }
    }
}
