//! Local filesystem output backend.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::PageType;
use crate::storage::OutputStorage;

/// Filesystem storage rooted at `{base}/{sanitized domain}`.
#[derive(Clone)]
pub struct LocalStorage {
    site_dir: PathBuf,
}

impl LocalStorage {
    /// Create storage for one site under the given base directory.
    pub fn new(base_dir: impl Into<PathBuf>, domain: &str) -> Self {
        Self {
            site_dir: base_dir.into().join(domain),
        }
    }

    /// The site's output root.
    pub fn site_dir(&self) -> &PathBuf {
        &self.site_dir
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: PathBuf, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl OutputStorage for LocalStorage {
    async fn prepare(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.site_dir).await {
            Ok(()) => log::info!("Cleared output directory {}", self.site_dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(AppError::Io(e)),
        }

        tokio::fs::create_dir_all(&self.site_dir).await?;
        Ok(())
    }

    async fn write_raw(&self, filename: &str, content: &str) -> Result<()> {
        let path = self.site_dir.join("raw").join(filename);
        self.write_bytes(path, content.as_bytes()).await
    }

    async fn write_optimised(&self, page_type: PageType, content: &str) -> Result<()> {
        let path = self
            .site_dir
            .join("optimised")
            .join(format!("{page_type}.md"));
        self.write_bytes(path, content.as_bytes()).await
    }

    async fn write_header_footer(&self, content: &str) -> Result<()> {
        let path = self.site_dir.join("header-footer.md");
        self.write_bytes(path, content.as_bytes()).await
    }
}
