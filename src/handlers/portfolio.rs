use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::services::storage::{guess_content_type, StoredBlob};
use crate::state::AppState;

use super::admin::check_auth;

const FILENAME_HEADER: &str = "x-filename";

// GET /api/portfolio
pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    let images = {
        let db = state.db()?;
        queries::list_portfolio_images(&db)?
    };
    Ok(Json(images.into_iter().map(|i| i.url).collect()))
}

// POST /api/portfolio
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StoredBlob>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let filename = headers
        .get(FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or("");
    if filename.is_empty() || body.is_empty() {
        return Err(AppError::validation(
            "Filename and image body are required.",
        ));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| guess_content_type(filename));

    let blob = state
        .blobs
        .put(filename, body.to_vec(), content_type)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    let saved = {
        let db = state.db()?;
        queries::add_portfolio_image(&db, &blob.url)
    };
    if let Err(e) = saved {
        if let Err(cleanup) = state.blobs.delete(&blob.url).await {
            tracing::error!(error = %cleanup, url = %blob.url, "failed to remove orphaned upload");
        }
        return Err(e.into());
    }

    tracing::info!(url = %blob.url, "portfolio image added");
    Ok(Json(blob))
}

// DELETE /api/portfolio
#[derive(Deserialize)]
pub struct DeleteImageRequest {
    pub url: Option<String>,
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<DeleteImageRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let url = body
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::validation("Image URL is required."))?;

    let exists = {
        let db = state.db()?;
        queries::portfolio_image_exists(&db, url)?
    };
    if !exists {
        return Err(AppError::NotFound("portfolio image".to_string()));
    }

    {
        let db = state.db()?;
        queries::delete_portfolio_image(&db, url)?;
    }

    // Best effort once the row is gone
    if state.blobs.owns(url) {
        if let Err(e) = state.blobs.delete(url).await {
            tracing::warn!(url = %url, error = %e, "failed to remove blob for deleted image");
        }
    } else {
        tracing::info!(url = %url, "image hosted elsewhere, removing reference only");
    }

    tracing::info!(url = %url, "portfolio image deleted");
    Ok(Json(serde_json::json!({ "message": "Image deleted successfully." })))
}
