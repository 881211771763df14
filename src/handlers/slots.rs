use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::availability::parse_date;
use crate::models::ServiceSelection;
use crate::services::scheduling::slots_for_date;
use crate::state::AppState;

// GET /api/slots?date=YYYY-MM-DD&duration=N  or  &services=id,id
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
    pub duration: Option<u32>,
    pub services: Option<String>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    date: String,
    duration_minutes: u32,
    open: bool,
    slots: Vec<String>,
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = query
        .date
        .as_deref()
        .ok_or_else(|| AppError::validation("Date parameter is required"))?;
    let date = parse_date(date).map_err(|e| AppError::validation(e.to_string()))?;

    let duration_minutes = match (query.duration, query.services.as_deref()) {
        (Some(duration), _) => duration,
        (None, Some(ids)) => ServiceSelection::from_ids(ids.split(','))
            .map_err(AppError::Validation)?
            .total_duration(),
        (None, None) => {
            return Err(AppError::validation(
                "either duration or services is required",
            ))
        }
    };

    let hours = &state.config.business_hours;
    if !hours.window.fits_duration(duration_minutes) {
        return Err(AppError::validation(format!(
            "duration must be between 1 and {} minutes",
            hours.window.length()
        )));
    }

    let bookings = {
        let db = state.db()?;
        queries::get_intervals_for_date(&db, &date)?
    };

    let slots = slots_for_date(hours, date, duration_minutes, &bookings)
        .into_iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();

    Ok(Json(SlotsResponse {
        date: date.format("%Y-%m-%d").to_string(),
        duration_minutes,
        open: hours.is_open_on(date),
        slots,
    }))
}
