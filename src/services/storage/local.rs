use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use super::{unique_pathname, BlobStore, StoredBlob};

/// Stores uploads in a directory that the server exposes under `/uploads`.
pub struct LocalBlobStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_prefix: format!("{}/uploads/", public_base_url.trim_end_matches('/')),
        }
    }

    fn pathname_from_url<'a>(&self, url: &'a str) -> anyhow::Result<&'a str> {
        let pathname = url
            .strip_prefix(&self.public_prefix)
            .with_context(|| format!("url is not managed by this store: {url}"))?;
        if pathname.is_empty()
            || pathname.contains('/')
            || pathname.contains('\\')
            || pathname.starts_with('.')
        {
            anyhow::bail!("invalid blob pathname: {pathname}");
        }
        Ok(pathname)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        filename: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<StoredBlob> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("failed to create upload dir {}", self.root.display()))?;

        let pathname = unique_pathname(filename, chrono::Utc::now().timestamp_millis());
        let path = self.root.join(&pathname);
        tokio::fs::write(&path, &data)
            .await
            .with_context(|| format!("failed to write blob {}", path.display()))?;

        tracing::info!(pathname = %pathname, size = data.len(), "stored blob");

        Ok(StoredBlob {
            url: format!("{}{}", self.public_prefix, pathname),
            pathname,
            content_type: content_type.to_string(),
        })
    }

    async fn delete(&self, url: &str) -> anyhow::Result<()> {
        let pathname = self.pathname_from_url(url)?;
        match tokio::fs::remove_file(self.root.join(pathname)).await {
            Ok(()) => {
                tracing::info!(pathname = %pathname, "deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(pathname = %pathname, "blob already gone");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("failed to delete blob {pathname}")),
        }
    }

    fn owns(&self, url: &str) -> bool {
        self.pathname_from_url(url).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:3000/");

        let blob = store
            .put("nails.jpg", b"jpeg-bytes".to_vec(), "image/jpeg")
            .await
            .unwrap();
        assert!(blob.pathname.ends_with("-nails.jpg"));
        assert_eq!(
            blob.url,
            format!("http://localhost:3000/uploads/{}", blob.pathname)
        );
        assert_eq!(blob.content_type, "image/jpeg");

        let on_disk = dir.path().join(&blob.pathname);
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"jpeg-bytes");

        store.delete(&blob.url).await.unwrap();
        assert!(!on_disk.exists());

        // Deleting twice is fine
        store.delete(&blob.url).await.unwrap();
        assert!(store.owns(&blob.url));
    }

    #[tokio::test]
    async fn test_delete_rejects_foreign_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:3000");

        assert!(!store.owns("https://elsewhere.example/a.jpg"));
        assert!(store.delete("https://elsewhere.example/a.jpg").await.is_err());
        assert!(store
            .delete("http://localhost:3000/uploads/../secret")
            .await
            .is_err());
        assert!(store.delete("http://localhost:3000/uploads/").await.is_err());
    }
}
