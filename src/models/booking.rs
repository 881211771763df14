use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::availability::{minutes_of_day, parse_date, parse_time, BusinessHours};

const MIN_PHONE_LEN: usize = 9;

#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub client_name: String,
    pub client_phone: String,
    pub services: Vec<String>,
    pub total_cost: f64,
    pub inspiration_url: Option<String>,
    pub created_at: NaiveDateTime,
}

/// An occupied `[start, start + duration)` range on some date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
}

impl BookedInterval {
    pub fn start(&self) -> u32 {
        minutes_of_day(self.start_time)
    }

    pub fn end(&self) -> u32 {
        self.start().saturating_add(self.duration_minutes)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// The `bookingData` JSON sent by the wizard on confirmation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    pub user_info: Option<UserInfo>,
    pub selected_date: Option<String>,
    pub selected_time: Option<String>,
    pub total_duration: Option<u32>,
    pub service_names: Option<Vec<String>>,
    pub total_cost: Option<f64>,
}

/// A submission that passed validation, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub client_name: String,
    pub client_phone: String,
    pub services: Vec<String>,
    pub total_cost: f64,
}

impl ValidatedBooking {
    pub fn interval(&self) -> BookedInterval {
        BookedInterval {
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
        }
    }
}

impl BookingSubmission {
    pub fn from_json(s: &str) -> Result<Self, String> {
        serde_json::from_str(s).map_err(|e| format!("invalid bookingData: {e}"))
    }

    pub fn validate(
        &self,
        today: NaiveDate,
        hours: &BusinessHours,
    ) -> Result<ValidatedBooking, String> {
        let missing = || "Missing required booking data".to_string();

        let user_info = self.user_info.as_ref().ok_or_else(missing)?;
        let selected_date = self.selected_date.as_deref().ok_or_else(missing)?;
        let selected_time = self.selected_time.as_deref().ok_or_else(missing)?;
        let duration_minutes = self.total_duration.filter(|d| *d > 0).ok_or_else(missing)?;
        let services = self
            .service_names
            .as_ref()
            .filter(|names| !names.is_empty())
            .ok_or_else(missing)?;
        let total_cost = self.total_cost.ok_or_else(missing)?;

        let client_name = user_info.name.trim();
        if client_name.is_empty() {
            return Err("client name is required".to_string());
        }
        let client_phone = user_info.phone.trim();
        if client_phone.chars().count() < MIN_PHONE_LEN {
            return Err("client phone is too short".to_string());
        }
        if !total_cost.is_finite() || total_cost < 0.0 {
            return Err("total cost must be a non-negative amount".to_string());
        }

        if !hours.window.fits_duration(duration_minutes) {
            return Err(format!(
                "appointment of {duration_minutes} minutes does not fit in our business hours ({})",
                hours.to_human_readable()
            ));
        }

        let date = parse_date(selected_date).map_err(|e| e.to_string())?;
        let start_time = parse_time(selected_time).map_err(|e| e.to_string())?;

        if date < today {
            return Err("selected date is in the past".to_string());
        }
        if !hours.is_open_on(date) {
            return Err(format!(
                "we are closed on that day ({})",
                hours.to_human_readable()
            ));
        }

        Ok(ValidatedBooking {
            date,
            start_time,
            duration_minutes,
            client_name: client_name.to_string(),
            client_phone: client_phone.to_string(),
            services: services.iter().map(|s| s.trim().to_string()).collect(),
            total_cost,
        })
    }
}

/// Wire shape of `GET /api/bookings`.
#[derive(Debug, Clone, Serialize)]
pub struct BookedIntervalResponse {
    pub start_time: String,
    pub duration_minutes: u32,
}

impl From<BookedInterval> for BookedIntervalResponse {
    fn from(interval: BookedInterval) -> Self {
        Self {
            start_time: interval.start_time.format("%H:%M").to_string(),
            duration_minutes: interval.duration_minutes,
        }
    }
}
