use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_dir = state.config.upload_dir.clone();
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/admin", get(handlers::admin::admin_page))
        .route("/api/services", get(handlers::catalog::get_catalog))
        .route("/api/slots", get(handlers::slots::get_slots))
        .route(
            "/api/bookings",
            get(handlers::bookings::list_booked_intervals).post(handlers::bookings::create_booking),
        )
        .route(
            "/api/portfolio",
            get(handlers::portfolio::list_images)
                .post(handlers::portfolio::upload_image)
                .delete(handlers::portfolio::delete_image),
        )
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/calendar/:booking_id",
            get(handlers::calendar::download_ics),
        )
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
