//! Extracted-fact data structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Contact details pulled out of a page's converted text.
///
/// Derived on demand and consumed immediately by the rewrite stage;
/// never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFacts {
    /// Deduplicated email addresses, first-seen order
    pub emails: Vec<String>,

    /// Deduplicated phone numbers, normalised to +<digits>
    pub phones: Vec<String>,

    /// First street address found, if any
    pub address: Option<String>,
}

impl ContactFacts {
    /// True when no contact signal of any kind was found.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.address.is_none()
    }
}

/// A single post segmented out of a blog page's converted text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPost {
    /// Heading text of the post
    pub title: String,

    /// Body excerpt, trimmed and capped at 300 characters
    pub excerpt: String,

    /// URL-safe slug, unique within its page
    pub slug: String,

    /// Publication date found near the heading, if any
    pub date: Option<NaiveDate>,

    /// First image reference in the post body, if any
    pub hero_image: Option<String>,
}

/// Result of segmenting a page into posts.
#[derive(Debug, Clone, Default)]
pub struct BlogExtraction {
    /// Posts in document order
    pub posts: Vec<BlogPost>,

    /// Lines that appeared before the first post heading
    pub clean_body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_facts_is_empty() {
        assert!(ContactFacts::default().is_empty());

        let facts = ContactFacts {
            emails: vec!["a@b.com".to_string()],
            ..ContactFacts::default()
        };
        assert!(!facts.is_empty());
    }

    #[test]
    fn test_blog_post_date_serialises_iso() {
        let post = BlogPost {
            title: "Launch".to_string(),
            excerpt: String::new(),
            slug: "launch".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 3),
            hero_image: None,
        };
        let json = serde_json::to_string(&post).unwrap();
        assert!(json.contains("\"2024-03-03\""));
    }
}
