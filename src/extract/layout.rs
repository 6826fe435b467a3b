// src/extract/layout.rs

//! Shared header/footer detection across a batch of converted pages.
//!
//! Candidates are the literal leading and trailing character windows of each
//! page. A candidate counts as common only when it is byte-identical across
//! at least 80% of the batch; a single stray character breaks the match.

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

/// Window length, in grapheme clusters, taken from each end of a page.
const WINDOW_LEN: usize = 250;

/// Fraction of the batch a window must appear in to count as common.
const COMMON_THRESHOLD: f64 = 0.8;

/// Common header and footer fragments found across a batch of pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonSections {
    pub header: Option<String>,
    pub footer: Option<String>,
}

impl CommonSections {
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.footer.is_none()
    }
}

/// Detect the common header and footer of a batch of converted texts.
pub fn detect_common_sections<S: AsRef<str>>(texts: &[S]) -> CommonSections {
    let headers: Vec<String> = texts
        .iter()
        .map(|t| leading_window(t.as_ref()))
        .collect();
    let footers: Vec<String> = texts
        .iter()
        .map(|t| trailing_window(t.as_ref()))
        .collect();

    CommonSections {
        header: majority_section(&headers),
        footer: majority_section(&footers),
    }
}

/// First `WINDOW_LEN` characters of a text.
fn leading_window(text: &str) -> String {
    text.graphemes(true).take(WINDOW_LEN).collect()
}

/// Last `WINDOW_LEN` characters of a text.
fn trailing_window(text: &str) -> String {
    let total = text.graphemes(true).count();
    text.graphemes(true)
        .skip(total.saturating_sub(WINDOW_LEN))
        .collect()
}

/// The window shared by at least 80% of the batch, if any.
///
/// Empty windows are never candidates, so a batch of blank conversions
/// cannot yield an empty "common" section.
fn majority_section(sections: &[String]) -> Option<String> {
    if sections.is_empty() {
        return None;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for section in sections {
        if !section.is_empty() {
            *counts.entry(section.as_str()).or_insert(0) += 1;
        }
    }

    let total = sections.len() as f64;
    counts
        .into_iter()
        .find(|(_, count)| *count as f64 / total >= COMMON_THRESHOLD)
        .map(|(section, _)| section.to_string())
}
