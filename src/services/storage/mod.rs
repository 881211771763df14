pub mod local;
pub mod remote;

use async_trait::async_trait;
use serde::Serialize;

/// A stored file and where clients can fetch it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlob {
    pub url: String,
    pub pathname: String,
    pub content_type: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        filename: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<StoredBlob>;

    async fn delete(&self, url: &str) -> anyhow::Result<()>;

    /// Whether `url` points at a blob this store can delete. Seeded or
    /// externally hosted images are only referenced.
    fn owns(&self, _url: &str) -> bool {
        true
    }
}

/// Builds a collision-resistant pathname from an uploaded file name:
/// `<unix-millis>-<name>`, keeping only characters safe in a URL path.
pub fn unique_pathname(filename: &str, now_millis: i64) -> String {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
        .trim();

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');

    if sanitized.is_empty() {
        format!("{now_millis}-upload")
    } else {
        format!("{now_millis}-{sanitized}")
    }
}

pub fn guess_content_type(filename: &str) -> &'static str {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
