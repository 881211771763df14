use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::availability::parse_date;
use crate::models::{BookedIntervalResponse, BookingSubmission};
use crate::services::handoff::{handoff_url, BusinessContact};
use crate::services::scheduling::validate_booking_time;
use crate::services::storage::guess_content_type;
use crate::state::AppState;

const BOOKING_DATA_FIELD: &str = "bookingData";
const INSPIRATION_FILE_FIELD: &str = "inspirationFile";

// GET /api/bookings?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

pub async fn list_booked_intervals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<BookedIntervalResponse>>, AppError> {
    let date = query
        .date
        .as_deref()
        .ok_or_else(|| AppError::validation("Date parameter is required"))?;
    let date = parse_date(date).map_err(|e| AppError::validation(e.to_string()))?;

    let intervals = {
        let db = state.db()?;
        queries::get_intervals_for_date(&db, &date)?
    };

    Ok(Json(intervals.into_iter().map(Into::into).collect()))
}

// POST /api/bookings
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    message: String,
    id: String,
    inspiration_url: Option<String>,
    handoff_url: Option<String>,
}

struct UploadedFile {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let mut booking_data: Option<String> = None;
    let mut inspiration: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some(BOOKING_DATA_FIELD) => {
                booking_data = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?,
                );
            }
            Some(INSPIRATION_FILE_FIELD) => {
                let filename = field.file_name().unwrap_or("inspiration").to_string();
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| guess_content_type(&filename).to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
                    .to_vec();
                inspiration = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let booking_data =
        booking_data.ok_or_else(|| AppError::validation("bookingData field is missing"))?;
    let submission = BookingSubmission::from_json(&booking_data).map_err(AppError::Validation)?;
    let today = chrono::Local::now().date_naive();
    let booking = submission
        .validate(today, &state.config.business_hours)
        .map_err(AppError::Validation)?;

    // Fail fast before uploading anything; re-checked below with the insert.
    {
        let db = state.db()?;
        validate_booking_time(&db, &booking, &state.config.business_hours)?;
    }

    let inspiration_url = match inspiration.filter(|f| !f.data.is_empty()) {
        Some(file) => {
            let blob = state
                .blobs
                .put(&file.filename, file.data, &file.content_type)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
            Some(blob.url)
        }
        None => None,
    };

    let created = {
        let db = state.db()?;
        validate_booking_time(&db, &booking, &state.config.business_hours)
            .map_err(AppError::from)
            .and_then(|()| {
                queries::create_booking(&db, &booking, inspiration_url.as_deref())
                    .map_err(AppError::from)
            })
    };

    let created = match created {
        Ok(created) => created,
        Err(e) => {
            if let Some(url) = &inspiration_url {
                if let Err(cleanup) = state.blobs.delete(url).await {
                    tracing::error!(error = %cleanup, url = %url, "failed to remove orphaned upload");
                }
            }
            return Err(e);
        }
    };

    tracing::info!(
        id = %created.id,
        date = %created.date,
        time = %created.start_time.format("%H:%M"),
        duration = created.duration_minutes,
        "booking created"
    );

    let contact = BusinessContact {
        name: &state.config.business_name,
        chat_number: &state.config.business_chat_number,
        currency_symbol: &state.config.currency_symbol,
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            message: "Booking created successfully".to_string(),
            handoff_url: handoff_url(&contact, &created),
            id: created.id,
            inspiration_url,
        }),
    ))
}
