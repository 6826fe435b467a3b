// src/extract/posts.rs

//! Blog post segmentation over converted page text.
//!
//! Second-level headings (`## `) open a new post; everything up to the next
//! heading accumulates into that post's excerpt. Lines before the first
//! heading form the page's non-post clean body.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::extract::dates::extract_date;
use crate::models::{BlogExtraction, BlogPost};

/// Maximum excerpt length in characters, ellipsis included.
const EXCERPT_MAX: usize = 300;

/// Maximum slug length in characters, before collision suffixes.
const SLUG_MAX: usize = 60;

fn image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[[^\]]*\]\(([^)\s]+)[^)]*\)").expect("image pattern is valid"))
}

/// Segment a page's converted text into discrete posts.
pub fn extract_posts(markdown: &str) -> BlogExtraction {
    let lines: Vec<&str> = markdown.lines().collect();

    let mut posts: Vec<BlogPost> = Vec::new();
    let mut current: Option<PostBuilder> = None;
    let mut clean_body: Vec<&str> = Vec::new();
    let mut used_slugs = HashSet::new();

    for (i, line) in lines.iter().enumerate() {
        if let Some(title) = line.strip_prefix("## ") {
            if let Some(builder) = current.take() {
                posts.push(builder.finalize());
            }

            let title = title.trim().to_string();
            let slug = unique_slug(&kebab_case(&title), &mut used_slugs);

            // The heading line and its immediate neighbours may carry the
            // publication date.
            let lo = i.saturating_sub(1);
            let hi = (i + 1).min(lines.len() - 1);
            let date = lines[lo..=hi].iter().find_map(|l| extract_date(l));

            current = Some(PostBuilder::new(title, slug, date));
        } else if let Some(builder) = current.as_mut() {
            if is_read_more(line) {
                continue;
            }
            builder.push_line(line);
        } else {
            clean_body.push(line);
        }
    }

    if let Some(builder) = current.take() {
        posts.push(builder.finalize());
    }

    BlogExtraction {
        posts,
        clean_body: clean_body.join("\n"),
    }
}

/// "Read more" boilerplate that should not reach an excerpt.
fn is_read_more(line: &str) -> bool {
    line.contains("Read more") || line.contains("Read More")
}

/// Lowercase, collapse non-alphanumeric runs to a single `-`, trim, cap at
/// 60 characters.
pub fn kebab_case(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_sep = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    slug.chars().take(SLUG_MAX).collect::<String>()
        .trim_matches('-')
        .to_string()
}

/// De-duplicate a slug within its page by appending `-2`, `-3`, ...
fn unique_slug(base: &str, used: &mut HashSet<String>) -> String {
    let mut slug = base.to_string();
    let mut counter = 1;

    while used.contains(&slug) {
        counter += 1;
        slug = format!("{base}-{counter}");
    }

    used.insert(slug.clone());
    slug
}

struct PostBuilder {
    title: String,
    slug: String,
    date: Option<chrono::NaiveDate>,
    hero_image: Option<String>,
    excerpt: String,
}

impl PostBuilder {
    fn new(title: String, slug: String, date: Option<chrono::NaiveDate>) -> Self {
        Self {
            title,
            slug,
            date,
            hero_image: None,
            excerpt: String::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        if self.hero_image.is_none() {
            if let Some(caps) = image_re().captures(line) {
                self.hero_image = Some(caps[1].to_string());
            }
        }

        self.excerpt.push_str(line);
        self.excerpt.push('\n');
    }

    fn finalize(self) -> BlogPost {
        BlogPost {
            title: self.title,
            slug: self.slug,
            date: self.date,
            hero_image: self.hero_image,
            excerpt: truncate_excerpt(self.excerpt.trim()),
        }
    }
}

/// Cap an excerpt at 300 characters, ellipsis included.
fn truncate_excerpt(excerpt: &str) -> String {
    if excerpt.graphemes(true).count() <= EXCERPT_MAX {
        return excerpt.to_string();
    }

    let mut truncated: String = excerpt.graphemes(true).take(EXCERPT_MAX - 3).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_kebab_case_collapses_runs() {
        assert_eq!(kebab_case("Hello,   World! 2024"), "hello-world-2024");
        assert_eq!(kebab_case("--Edge--"), "edge");
    }

    #[test]
    fn test_kebab_case_caps_length() {
        let long = "a".repeat(100);
        assert_eq!(kebab_case(&long).len(), 60);
    }

    #[test]
    fn test_duplicate_titles_get_numeric_suffix() {
        let markdown = "## Launch Day\nbody one\n## Launch Day\nbody two\n## Launch Day\nbody three";
        let result = extract_posts(markdown);

        let slugs: Vec<&str> = result.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["launch-day", "launch-day-2", "launch-day-3"]);
    }

    #[test]
    fn test_clean_body_precedes_first_heading() {
        let markdown = "intro line\nsecond intro\n## First Post\npost body";
        let result = extract_posts(markdown);

        assert_eq!(result.clean_body, "intro line\nsecond intro");
        assert_eq!(result.posts.len(), 1);
        assert_eq!(result.posts[0].excerpt, "post body");
    }

    #[test]
    fn test_date_found_in_neighbouring_line() {
        let markdown = "## New Office\nMarch 3rd, 2024\nWe moved.";
        let result = extract_posts(markdown);

        assert_eq!(
            result.posts[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 3)
        );
    }

    #[test]
    fn test_date_found_in_preceding_line() {
        let markdown = "January 15 2022\n## Year In Review\nA look back.";
        let result = extract_posts(markdown);

        assert_eq!(
            result.posts[0].date,
            NaiveDate::from_ymd_opt(2022, 1, 15)
        );
    }

    #[test]
    fn test_read_more_lines_skipped() {
        let markdown = "## Post\nfirst line\n[Read more](https://example.com/post)\nlast line";
        let result = extract_posts(markdown);

        assert_eq!(result.posts[0].excerpt, "first line\nlast line");
    }

    #[test]
    fn test_excerpt_truncated_to_300_with_ellipsis() {
        let body = "x".repeat(310);
        let markdown = format!("## Long Post\n{body}");
        let result = extract_posts(&markdown);

        let excerpt = &result.posts[0].excerpt;
        assert_eq!(excerpt.chars().count(), 300);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_hero_image_is_first_image() {
        let markdown =
            "## Post\n![alt text](https://example.com/hero.jpg)\n![second](https://example.com/b.png)";
        let result = extract_posts(markdown);

        assert_eq!(
            result.posts[0].hero_image.as_deref(),
            Some("https://example.com/hero.jpg")
        );
    }

    #[test]
    fn test_no_headings_is_all_clean_body() {
        let markdown = "just\nplain\ntext";
        let result = extract_posts(markdown);

        assert!(result.posts.is_empty());
        assert_eq!(result.clean_body, markdown);
    }
}
