// src/extract/dates.rs

//! Long-form date extraction from converted page text.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b",
        )
        .expect("date pattern is valid")
    })
}

/// Find the first long-form month-name date in a text.
///
/// Handles full and abbreviated month names with optional ordinal day
/// suffixes ("March 3rd, 2024", "Sep 5 2023"). Impossible dates and text
/// without a date both yield `None`.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    let caps = date_re().captures(text)?;

    let month = month_number(caps.get(1)?.as_str())?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year: i32 = caps.get(3)?.as_str().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    match prefix.as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_date_ordinal_suffix() {
        assert_eq!(
            extract_date("Posted on March 3rd, 2024 by the team"),
            Some(date(2024, 3, 3))
        );
    }

    #[test]
    fn test_extract_date_abbreviated_month() {
        assert_eq!(extract_date("Sep 5 2023"), Some(date(2023, 9, 5)));
    }

    #[test]
    fn test_extract_date_no_comma() {
        assert_eq!(extract_date("January 15 2022"), Some(date(2022, 1, 15)));
    }

    #[test]
    fn test_extract_date_case_insensitive() {
        assert_eq!(extract_date("DECEMBER 1ST, 2021"), Some(date(2021, 12, 1)));
    }

    #[test]
    fn test_extract_date_impossible_is_none() {
        assert_eq!(extract_date("February 30th, 2024"), None);
    }

    #[test]
    fn test_extract_date_absent_is_none() {
        assert_eq!(extract_date("no date in this line"), None);
    }
}
