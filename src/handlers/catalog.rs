use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::models::{service, Service};
use crate::state::AppState;

#[derive(Serialize)]
pub struct CatalogResponse {
    services: &'static [Service],
    opening_hours: String,
    currency: String,
}

// GET /api/services
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        services: service::catalog(),
        opening_hours: state.config.business_hours.to_human_readable(),
        currency: state.config.currency_symbol.clone(),
    })
}
