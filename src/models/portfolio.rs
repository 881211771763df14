use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioImage {
    pub url: String,
    pub created_at: NaiveDateTime,
}
