use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

/// Daily operating window, candidate step and weekly closing days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHours {
    pub window: BusinessWindow,
    pub closed_days: Vec<Weekday>,
}

/// Minutes-of-day bounds of a business day. `close` is exclusive for starts
/// and inclusive for ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessWindow {
    pub open: u32,
    pub close: u32,
    pub step: u32,
}

impl Default for BusinessWindow {
    fn default() -> Self {
        Self {
            open: 7 * 60,
            close: 18 * 60,
            step: 30,
        }
    }
}

impl BusinessWindow {
    /// Minutes between opening and closing.
    pub fn length(&self) -> u32 {
        self.close.saturating_sub(self.open)
    }

    /// Whether an appointment of this length can fit in a single day.
    pub fn fits_duration(&self, duration_minutes: u32) -> bool {
        duration_minutes > 0 && duration_minutes <= self.length()
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            window: BusinessWindow::default(),
            closed_days: vec![Weekday::Sun],
        }
    }
}

impl BusinessHours {
    /// Builds hours from optional raw settings, falling back to the defaults
    /// for anything left unset.
    pub fn from_parts(
        open: Option<&str>,
        close: Option<&str>,
        step: Option<u32>,
        closed_days: Option<&str>,
    ) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let open = match open {
            Some(s) => minutes_of_day(parse_time(s)?),
            None => defaults.window.open,
        };
        let close = match close {
            Some(s) => minutes_of_day(parse_time(s)?),
            None => defaults.window.close,
        };
        let step = step.unwrap_or(defaults.window.step);

        if open >= close {
            anyhow::bail!("opening time must be before closing time");
        }
        if step == 0 {
            anyhow::bail!("slot step must be positive");
        }

        let closed_days = match closed_days {
            Some(s) => s
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(parse_weekday)
                .collect::<anyhow::Result<Vec<_>>>()?,
            None => defaults.closed_days,
        };

        Ok(Self {
            window: BusinessWindow { open, close, step },
            closed_days,
        })
    }

    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        !self.closed_days.contains(&date.weekday())
    }

    pub fn to_human_readable(&self) -> String {
        let hours = format!(
            "{}-{}",
            format_minutes(self.window.open),
            format_minutes(self.window.close)
        );
        if self.closed_days.is_empty() {
            return format!("Every day: {hours}");
        }
        let closed = self
            .closed_days
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{hours}, closed {closed}")
    }
}

pub fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| anyhow::anyhow!("invalid time format: {s}"))
}

pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date format: {s}"))
}

pub fn minutes_of_day(t: NaiveTime) -> u32 {
    use chrono::Timelike;
    t.hour() * 60 + t.minute()
}

pub fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn parse_weekday(s: &str) -> anyhow::Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" => Ok(Weekday::Mon),
        "tue" => Ok(Weekday::Tue),
        "wed" => Ok(Weekday::Wed),
        "thu" => Ok(Weekday::Thu),
        "fri" => Ok(Weekday::Fri),
        "sat" => Ok(Weekday::Sat),
        "sun" => Ok(Weekday::Sun),
        _ => Err(anyhow::anyhow!("invalid weekday: {s}")),
    }
}
