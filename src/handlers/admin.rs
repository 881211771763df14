use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::availability::parse_date;
use crate::state::AppState;

static ADMIN_HTML: &str = include_str!("../web/admin.html");

pub async fn admin_page() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

pub fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub date: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    date: String,
    start_time: String,
    duration_minutes: u32,
    client_name: String,
    client_phone: String,
    services: Vec<String>,
    total_cost: f64,
    inspiration_url: Option<String>,
    created_at: String,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let date = query
        .date
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let bookings = {
        let db = state.db()?;
        queries::get_bookings(&db, date.as_ref(), limit)?
    };

    let response = bookings
        .into_iter()
        .map(|b| BookingResponse {
            id: b.id,
            date: b.date.format("%Y-%m-%d").to_string(),
            start_time: b.start_time.format("%H:%M").to_string(),
            duration_minutes: b.duration_minutes,
            client_name: b.client_name,
            client_phone: b.client_phone,
            services: b.services,
            total_cost: b.total_cost,
            inspiration_url: b.inspiration_url,
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}
