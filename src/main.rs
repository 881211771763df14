use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use studiobook::config::{AppConfig, BlobProvider};
use studiobook::db;
use studiobook::routes::build_router;
use studiobook::services::storage::local::LocalBlobStore;
use studiobook::services::storage::remote::RemoteBlobStore;
use studiobook::services::storage::BlobStore;
use studiobook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let blobs: Box<dyn BlobStore> = match config.blob_provider {
        BlobProvider::Remote => {
            anyhow::ensure!(
                !config.blob_api_url.is_empty() && !config.blob_token.is_empty(),
                "BLOB_API_URL and BLOB_TOKEN must be set when BLOB_PROVIDER=remote"
            );
            tracing::info!("using remote blob store ({})", config.blob_api_url);
            Box::new(RemoteBlobStore::new(
                config.blob_api_url.clone(),
                config.blob_token.clone(),
            ))
        }
        BlobProvider::Local => {
            tracing::info!("using local blob store (dir: {})", config.upload_dir);
            Box::new(LocalBlobStore::new(&config.upload_dir, &config.public_base_url))
        }
    };

    if config.admin_token == "changeme" {
        tracing::warn!("ADMIN_TOKEN is not set, admin endpoints use the default token");
    }
    tracing::info!(
        hours = %config.business_hours.to_human_readable(),
        "business hours"
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        blobs,
    });

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
