//! Output persistence for a crawl-and-rewrite run.
//!
//! ## Directory Structure
//!
//! ```text
//! {root}/{sanitized domain}/
//! ├── raw/                  # One Markdown file per crawled URL
//! │   ├── index.md
//! │   └── about.md
//! ├── optimised/            # One file per distinct classified page type
//! │   ├── home.md
//! │   └── about.md
//! └── header-footer.md      # Only when a common header/footer was found
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::PageType;

// Re-export for convenience
pub use local::LocalStorage;

/// Sink for one site's output files.
#[async_trait]
pub trait OutputStorage: Send + Sync {
    /// Clear and recreate the site's output root. Called once per run,
    /// before any write.
    async fn prepare(&self) -> Result<()>;

    /// Write one crawled page's converted text under `raw/`.
    async fn write_raw(&self, filename: &str, content: &str) -> Result<()>;

    /// Write a rewritten page under `optimised/`, named by page type.
    async fn write_optimised(&self, page_type: PageType, content: &str) -> Result<()>;

    /// Write the shared header/footer file at the site root.
    async fn write_header_footer(&self, content: &str) -> Result<()>;
}
