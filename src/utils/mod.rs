//! Utility functions and helpers.

pub mod url;

pub use url::{page_filename, resolve_url, same_origin, sanitize_domain};
