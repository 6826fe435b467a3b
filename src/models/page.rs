//! Page data structures.

use serde::{Deserialize, Serialize};
use url::Url;

/// Semantic page type assigned by the URL classifier.
///
/// A page has at most one type, decided once and immutable thereafter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    About,
    Contact,
    Services,
    Faq,
    Portfolio,
    Blog,
    Home,
}

impl PageType {
    /// Lowercase label used in output filenames and the rewrite prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::About => "about",
            PageType::Contact => "contact",
            PageType::Services => "services",
            PageType::Faq => "faq",
            PageType::Portfolio => "portfolio",
            PageType::Blog => "blog",
            PageType::Home => "home",
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of crawl work: a URL and the depth it was discovered at.
///
/// Created when enqueued, consumed once when dequeued.
#[derive(Debug, Clone)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: u32,
}

/// One successfully fetched page.
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// Final resolved URL of the page
    pub url: Url,

    /// Raw markup as returned by the fetch strategy
    pub html: String,

    /// Whether the headless browser fallback produced this markup
    pub rendered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_type_labels() {
        assert_eq!(PageType::About.as_str(), "about");
        assert_eq!(PageType::Home.to_string(), "home");
    }

    #[test]
    fn test_page_type_serializes_lowercase() {
        let json = serde_json::to_string(&PageType::Faq).unwrap();
        assert_eq!(json, "\"faq\"");
    }
}
