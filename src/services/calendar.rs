use chrono::Duration;

use crate::models::Booking;

pub fn generate_ics(booking: &Booking, business_name: &str) -> String {
    let start = booking.date.and_time(booking.start_time);
    let end = start + Duration::minutes(booking.duration_minutes as i64);

    let dtstart = start.format("%Y%m%dT%H%M%S").to_string();
    let dtend = end.format("%Y%m%dT%H%M%S").to_string();
    let dtstamp = booking.created_at.format("%Y%m%dT%H%M%SZ").to_string();
    let uid = format!("{}@studiobook", booking.id);

    let summary = if booking.services.is_empty() {
        format!("Appointment at {}", escape_text(business_name))
    } else {
        format!(
            "{} at {}",
            escape_text(&booking.services.join(", ")),
            escape_text(business_name)
        )
    };
    let description = format!(
        "Client: {} ({})",
        escape_text(&booking.client_name),
        escape_text(&booking.client_phone)
    );

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Studiobook//Booking//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}

// RFC 5545 TEXT escaping
fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    fn booking(services: Vec<&str>, start: (u32, u32), duration_minutes: u32) -> Booking {
        Booking {
            id: "test-123".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 3, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            duration_minutes,
            client_name: "Alice".to_string(),
            client_phone: "+5573999990000".to_string(),
            services: services.into_iter().map(str::to_string).collect(),
            total_cost: 40.0,
            inspiration_url: None,
            created_at: NaiveDateTime::parse_from_str("2030-03-10 10:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    #[test]
    fn test_generate_ics() {
        let ics = generate_ics(&booking(vec!["Manicure + Pedicure"], (14, 0), 120), "Nail Studio");
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("DTSTART:20300315T140000"));
        assert!(ics.contains("DTEND:20300315T160000"));
        assert!(ics.contains("DTSTAMP:20300310T100000Z"));
        assert!(ics.contains("SUMMARY:Manicure + Pedicure at Nail Studio"));
        assert!(ics.contains("DESCRIPTION:Client: Alice (+5573999990000)"));
        assert!(ics.contains("UID:test-123@studiobook"));
        assert!(ics.contains("END:VCALENDAR"));
    }

    #[test]
    fn test_generate_ics_escapes_lists() {
        let ics = generate_ics(&booking(vec!["Manicure", "Foot Spa"], (9, 30), 30), "Studio");
        assert!(ics.contains("DTSTART:20300315T093000"));
        assert!(ics.contains("DTEND:20300315T100000"));
        assert!(ics.contains("SUMMARY:Manicure\\, Foot Spa at Studio"));
    }

    #[test]
    fn test_generate_ics_no_services() {
        let ics = generate_ics(&booking(vec![], (9, 0), 60), "Studio");
        assert!(ics.contains("SUMMARY:Appointment at Studio"));
    }
}
