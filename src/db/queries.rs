use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{BookedInterval, Booking, PortfolioImage, ValidatedBooking};

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";

// ── Bookings ──

pub fn create_booking(
    conn: &Connection,
    booking: &ValidatedBooking,
    inspiration_url: Option<&str>,
) -> anyhow::Result<Booking> {
    let created = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        date: booking.date,
        start_time: booking.start_time,
        duration_minutes: booking.duration_minutes,
        client_name: booking.client_name.clone(),
        client_phone: booking.client_phone.clone(),
        services: booking.services.clone(),
        total_cost: booking.total_cost,
        inspiration_url: inspiration_url.map(str::to_string),
        created_at: Utc::now().naive_utc(),
    };

    let services_json = serde_json::to_string(&created.services)?;
    conn.execute(
        "INSERT INTO bookings (id, booking_date, start_time, duration_minutes, client_name, client_phone, services, total_cost, inspiration_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            created.id,
            created.date.format(DATE_FMT).to_string(),
            created.start_time.format(TIME_FMT).to_string(),
            created.duration_minutes,
            created.client_name,
            created.client_phone,
            services_json,
            created.total_cost,
            created.inspiration_url,
            created.created_at.format(TIMESTAMP_FMT).to_string(),
        ],
    )?;
    Ok(created)
}

pub fn get_intervals_for_date(
    conn: &Connection,
    date: &NaiveDate,
) -> anyhow::Result<Vec<BookedInterval>> {
    let mut stmt = conn.prepare(
        "SELECT start_time, duration_minutes FROM bookings WHERE booking_date = ?1 ORDER BY start_time ASC",
    )?;

    let rows = stmt.query_map(params![date.format(DATE_FMT).to_string()], |row| {
        let start_time: String = row.get(0)?;
        let duration_minutes: u32 = row.get(1)?;
        Ok((start_time, duration_minutes))
    })?;

    let mut intervals = vec![];
    for row in rows {
        let (start_time, duration_minutes) = row?;
        intervals.push(BookedInterval {
            start_time: parse_time(&start_time)?,
            duration_minutes,
        });
    }
    Ok(intervals)
}

pub fn get_bookings(
    conn: &Connection,
    date_filter: Option<&NaiveDate>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let (sql, params_vec): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match date_filter {
        Some(date) => (
            "SELECT id, booking_date, start_time, duration_minutes, client_name, client_phone, services, total_cost, inspiration_url, created_at \
             FROM bookings WHERE booking_date = ?1 ORDER BY start_time ASC LIMIT ?2",
            vec![
                Box::new(date.format(DATE_FMT).to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            "SELECT id, booking_date, start_time, duration_minutes, client_name, client_phone, services, total_cost, inspiration_url, created_at \
             FROM bookings ORDER BY booking_date DESC, start_time DESC LIMIT ?1",
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, booking_date, start_time, duration_minutes, client_name, client_phone, services, total_cost, inspiration_url, created_at \
         FROM bookings WHERE id = ?1",
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let date_str: String = row.get(1)?;
    let start_time_str: String = row.get(2)?;
    let duration_minutes: u32 = row.get(3)?;
    let client_name: String = row.get(4)?;
    let client_phone: String = row.get(5)?;
    let services_str: String = row.get(6)?;
    let total_cost: f64 = row.get(7)?;
    let inspiration_url: Option<String> = row.get(8)?;
    let created_at_str: String = row.get(9)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)?;
    let services: Vec<String> = serde_json::from_str(&services_str)
        .with_context(|| format!("invalid services list for booking {id}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        date,
        start_time: parse_time(&start_time_str)?,
        duration_minutes,
        client_name,
        client_phone,
        services,
        total_cost,
        inspiration_url,
        created_at,
    })
}

fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    Ok(NaiveTime::parse_from_str(s, TIME_FMT)?)
}

// ── Portfolio ──

/// Inserts an image URL; re-adding a known URL is a no-op.
pub fn add_portfolio_image(conn: &Connection, url: &str) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(TIMESTAMP_FMT).to_string();
    let count = conn.execute(
        "INSERT INTO portfolio_images (url, created_at) VALUES (?1, ?2) ON CONFLICT(url) DO NOTHING",
        params![url, now],
    )?;
    Ok(count > 0)
}

pub fn list_portfolio_images(conn: &Connection) -> anyhow::Result<Vec<PortfolioImage>> {
    let mut stmt = conn.prepare(
        "SELECT url, created_at FROM portfolio_images ORDER BY created_at DESC, id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        let url: String = row.get(0)?;
        let created_at: String = row.get(1)?;
        Ok((url, created_at))
    })?;

    let mut images = vec![];
    for row in rows {
        let (url, created_at) = row?;
        images.push(PortfolioImage {
            url,
            created_at: NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FMT)
                .unwrap_or_else(|_| Utc::now().naive_utc()),
        });
    }
    Ok(images)
}

pub fn portfolio_image_exists(conn: &Connection, url: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM portfolio_images WHERE url = ?1",
        params![url],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn delete_portfolio_image(conn: &Connection, url: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM portfolio_images WHERE url = ?1", params![url])?;
    Ok(count > 0)
}
