// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve a potentially relative href against a base URL.
///
/// Returns `None` for hrefs that cannot be resolved (malformed, unsupported
/// scheme relative to the base).
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    base.join(href).ok()
}

/// Whether two URLs share a scheme+host+port origin.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Sanitize a URL's hostname into a directory-safe name.
///
/// # Examples
/// ```
/// use url::Url;
/// use copyforge::utils::sanitize_domain;
///
/// let url = Url::parse("https://www.Example-Site.com/about").unwrap();
/// assert_eq!(sanitize_domain(&url), "www_example_site_com");
/// ```
pub fn sanitize_domain(url: &Url) -> String {
    url.host_str()
        .unwrap_or("unknown")
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Derive an output filename from a URL's path.
///
/// Leading/trailing slashes are trimmed, the empty path becomes `index`,
/// and remaining slashes become underscores.
///
/// # Examples
/// ```
/// use url::Url;
/// use copyforge::utils::page_filename;
///
/// let url = Url::parse("https://example.com/blog/posts/").unwrap();
/// assert_eq!(page_filename(&url), "blog_posts.md");
/// ```
pub fn page_filename(url: &Url) -> String {
    let path = url.path().trim_matches('/');
    let stem = if path.is_empty() {
        "index".to_string()
    } else {
        path.replace('/', "_")
    };
    format!("{stem}.md")
}
