use std::env;

use crate::models::BusinessHours;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlobProvider {
    Local,
    Remote,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub upload_dir: String,
    pub public_base_url: String,
    pub blob_provider: BlobProvider,
    pub blob_api_url: String,
    pub blob_token: String,
    pub max_upload_bytes: usize,
    pub business_name: String,
    pub business_chat_number: String,
    pub currency_symbol: String,
    pub business_hours: BusinessHours,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = BusinessHours::default();
        let business_hours = BusinessHours::from_parts(
            env::var("OPENING_TIME").ok().as_deref(),
            env::var("CLOSING_TIME").ok().as_deref(),
            env::var("SLOT_STEP_MINUTES").ok().and_then(|v| v.parse().ok()),
            env::var("CLOSED_WEEKDAYS").ok().as_deref(),
        )
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid business hours, using defaults");
            defaults
        });

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "studiobook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            blob_provider: match env::var("BLOB_PROVIDER").as_deref() {
                Ok("remote") => BlobProvider::Remote,
                _ => BlobProvider::Local,
            },
            blob_api_url: env::var("BLOB_API_URL").unwrap_or_default(),
            blob_token: env::var("BLOB_TOKEN").unwrap_or_default(),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            business_name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "Studio".to_string()),
            business_chat_number: env::var("BUSINESS_CHAT_NUMBER").unwrap_or_default(),
            currency_symbol: env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "R$".to_string()),
            business_hours,
        }
    }
}
