//! Fills an empty portfolio with a starter set of externally hosted images.
//! Safe to run repeatedly: known URLs are skipped.

use tracing_subscriber::EnvFilter;

use studiobook::config::AppConfig;
use studiobook::db::{self, queries};

const STARTER_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1604948895053-4449e3863846?q=80&w=2940&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1519014816548-bf5fe059798b?q=80&w=2940&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1604948895163-c28f80a342a3?q=80&w=2940&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1522338242285-15a4d60152c4?q=80&w=2940&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1615875382847-53c5524675b8?q=80&w=2940&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1515699146029-b7b51e5ee50b?q=80&w=2940&auto=format&fit=crop",
];

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let conn = db::init_db(&config.database_url)?;

    let mut added = 0;
    for url in STARTER_IMAGES {
        if queries::add_portfolio_image(&conn, url)? {
            added += 1;
        }
    }

    tracing::info!(added, total = STARTER_IMAGES.len(), "portfolio seeded");
    Ok(())
}
