//! Service layer for the copy optimiser.
//!
//! This module contains the outward-facing collaborators:
//! - Page fetching with rendered fallback (`PageFetcher`)
//! - Generative copy rewriting (`RewriteClient`)

mod fetch;
mod rewrite;

pub use fetch::{FetchedPage, PageFetcher, PageSource};
pub use rewrite::{RewriteClient, RewriteRequest};
