// src/classify.rs

//! URL-based page type classification.
//!
//! A fixed, ordered rule table maps URL substrings to a [`PageType`].
//! The first matching rule wins, so rule order is part of the contract.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::PageType;

/// Ordered classification rules. A URL matching several patterns resolves
/// to the earliest entry.
const RULES: &[(&str, PageType)] = &[
    (r"about|team|management|leadership|company", PageType::About),
    (r"contact|support|help|inquiries", PageType::Contact),
    (r"service|solution|what-we-do", PageType::Services),
    (r"faq|questions|help-center", PageType::Faq),
    (r"portfolio|work|projects|case-studies", PageType::Portfolio),
    (r"blog|news|articles|posts", PageType::Blog),
];

fn compiled_rules() -> &'static Vec<(Regex, PageType)> {
    static COMPILED: OnceLock<Vec<(Regex, PageType)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|(pattern, label)| {
                let re = Regex::new(&format!("(?i){pattern}")).expect("rule pattern is valid");
                (re, *label)
            })
            .collect()
    })
}

/// Classify a URL into a semantic page type.
///
/// Pure and deterministic: depends only on the URL string and the run's
/// seed URL. Returns [`PageType::Home`] for the seed itself when no rule
/// matches, and `None` for any other unmatched URL.
pub fn classify(url: &str, seed_url: &str) -> Option<PageType> {
    for (re, label) in compiled_rules() {
        if re.is_match(url) {
            return Some(*label);
        }
    }

    if url == seed_url {
        Some(PageType::Home)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "https://example.com/";

    #[test]
    fn test_classify_rule_matches() {
        let cases = [
            ("https://example.com/about", PageType::About),
            ("https://example.com/team", PageType::About),
            ("https://example.com/contact", PageType::Contact),
            ("https://example.com/support", PageType::Contact),
            ("https://example.com/service", PageType::Services),
            ("https://example.com/faq", PageType::Faq),
            ("https://example.com/portfolio", PageType::Portfolio),
            ("https://example.com/blog", PageType::Blog),
            ("https://example.com/news/2024", PageType::Blog),
        ];

        for (url, expected) in cases {
            assert_eq!(classify(url, SEED), Some(expected), "url: {url}");
        }
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(
            classify("https://example.com/About-Us", SEED),
            Some(PageType::About)
        );
    }

    #[test]
    fn test_classify_first_match_wins() {
        // Matches both the about and contact rules; about is first.
        assert_eq!(
            classify("https://example.com/contact-our-team", SEED),
            Some(PageType::About)
        );
        assert_eq!(
            classify("https://example.com/about/contact", SEED),
            Some(PageType::About)
        );
    }

    #[test]
    fn test_classify_seed_is_home() {
        assert_eq!(classify(SEED, SEED), Some(PageType::Home));
    }

    #[test]
    fn test_classify_unmatched_is_none() {
        assert_eq!(classify("https://example.com/unknown", SEED), None);
    }
}
