// src/extract/contact.rs

//! Contact detail extraction from converted page text.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::ContactFacts;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").expect("email pattern is valid")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+?\d[\d\s().-]{7,}").expect("phone pattern is valid"))
}

fn address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\d+\s+([A-Za-z0-9\s,.-]+(?:St|Rd|Ave|Blvd|Dr|Ln|Way)[A-Za-z0-9\s,.-]+(?:[A-Za-z\s]+,\s*[A-Z]{2}\s*\d{5}(?:-\d{4})?))",
        )
        .expect("address pattern is valid")
    })
}

/// Extract all contact facts from a text in one pass.
pub fn extract_contact_facts(text: &str) -> ContactFacts {
    ContactFacts {
        emails: extract_emails(text),
        phones: extract_phones(text),
        address: extract_address(text),
    }
}

/// Extract deduplicated email addresses, first-seen order.
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    email_re()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|email| seen.insert(email.clone()))
        .collect()
}

/// Extract phone numbers, normalised and deduplicated post-normalisation.
pub fn extract_phones(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    phone_re()
        .find_iter(text)
        .map(|m| normalize_phone(m.as_str()))
        .filter(|phone| seen.insert(phone.clone()))
        .collect()
}

/// Raw phone-pattern matches as they appear in the text.
///
/// Used when the source text needs the original spellings removed before
/// being handed downstream.
pub fn raw_phone_matches(text: &str) -> Vec<String> {
    phone_re()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Normalise a loosely delimited phone number to a +-prefixed digit string.
///
/// 11 digits with a leading country digit 1 keep it; exactly 10 digits gain
/// a `+1` prefix; anything else is prefixed with `+` as-is.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 11 && digits.starts_with('1') {
        format!("+{digits}")
    } else if digits.len() == 10 {
        format!("+1{digits}")
    } else {
        format!("+{digits}")
    }
}

/// Extract the first street address, if any.
///
/// The capture starts at the street name; the leading house number delimits
/// the match but is not part of the returned string.
pub fn extract_address(text: &str) -> Option<String> {
    address_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
