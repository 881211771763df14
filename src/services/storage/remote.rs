use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::{unique_pathname, BlobStore, StoredBlob};

/// Client for an HTTP blob service: `PUT {base}/{pathname}` to upload and
/// `POST {base}/delete` with `{"urls": [...]}` to remove.
pub struct RemoteBlobStore {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PutResponse {
    url: String,
    pathname: Option<String>,
    content_type: Option<String>,
}

impl RemoteBlobStore {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BlobStore for RemoteBlobStore {
    async fn put(
        &self,
        filename: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<StoredBlob> {
        let pathname = unique_pathname(filename, chrono::Utc::now().timestamp_millis());
        let url = format!("{}/{}", self.base_url, pathname);

        let res: PutResponse = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-content-type", content_type)
            .body(data)
            .send()
            .await
            .context("failed to upload blob")?
            .error_for_status()
            .context("blob service returned error")?
            .json()
            .await
            .context("invalid blob service response")?;

        tracing::info!(url = %res.url, "uploaded blob");

        Ok(StoredBlob {
            url: res.url,
            pathname: res.pathname.unwrap_or(pathname),
            content_type: res.content_type.unwrap_or_else(|| content_type.to_string()),
        })
    }

    async fn delete(&self, url: &str) -> anyhow::Result<()> {
        self.client
            .post(format!("{}/delete", self.base_url))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "urls": [url] }))
            .send()
            .await
            .context("failed to delete blob")?
            .error_for_status()
            .context("blob service returned error")?;

        tracing::info!(url = %url, "deleted remote blob");
        Ok(())
    }
}
