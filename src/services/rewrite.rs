// src/services/rewrite.rs

//! Generative copy rewriting over an OpenAI-compatible API.
//!
//! A deliberately small REST client: one chat-completions call per page,
//! no SDK dependency. The response body is front-matter-delimited Markdown
//! used as-is downstream.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::extract::contact::raw_phone_matches;
use crate::models::{BlogPost, ContactFacts, PageType, RewriteConfig};

/// Everything the rewrite prompt needs for one page.
pub struct RewriteRequest<'a> {
    /// Converted page text (clean body for blog pages)
    pub markdown: &'a str,

    /// Classified page type
    pub page_type: PageType,

    /// Page URL, used to derive the front-matter slug
    pub url: &'a Url,

    /// Contact facts extracted from the page
    pub facts: &'a ContactFacts,

    /// Segmented posts for blog pages
    pub posts: &'a [BlogPost],

    /// Optional tone directive from the CLI
    pub tone: Option<&'a str>,
}

/// Client for the rewrite API.
pub struct RewriteClient {
    http: reqwest::Client,
    api_key: String,
    config: RewriteConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl RewriteClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>, config: RewriteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            config,
        }
    }

    /// Create a client from the `OPENAI_API_KEY` environment variable.
    pub fn from_env(config: RewriteConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::config("OPENAI_API_KEY not set"))?;
        Ok(Self::new(api_key, config))
    }

    /// Rewrite one page's copy, returning front-matter-delimited Markdown.
    pub async fn rewrite(&self, request: &RewriteRequest<'_>) -> Result<String> {
        let cleaned = strip_contact_facts(request.markdown, request.facts);
        let prompt = build_prompt(request, &cleaned);

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::rewrite(format!("API returned {status}: {detail}")));
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::rewrite("response contained no completion"))?;

        Ok(content.trim().to_string())
    }
}

/// Derive the front-matter slug from a URL path; the root page is `home`.
fn url_slug(url: &Url) -> String {
    let path = url.path().trim_matches('/');
    if path.is_empty() {
        "home".to_string()
    } else {
        path.to_string()
    }
}

/// Remove extracted contact details from the Markdown body.
///
/// Phones are removed by their raw spellings in the text, not the
/// normalised forms, which never appear verbatim.
fn strip_contact_facts(markdown: &str, facts: &ContactFacts) -> String {
    let mut cleaned = markdown.to_string();

    for email in &facts.emails {
        cleaned = cleaned.replace(email.as_str(), "");
    }
    for raw in raw_phone_matches(markdown) {
        cleaned = cleaned.replace(raw.as_str(), "");
    }
    if let Some(address) = &facts.address {
        cleaned = cleaned.replace(address.as_str(), "");
    }

    cleaned
}

/// Compose the optimisation prompt for one page.
fn build_prompt(request: &RewriteRequest<'_>, cleaned_markdown: &str) -> String {
    let page_type = request.page_type.as_str();
    let slug = url_slug(request.url);

    let mut ctas = String::new();
    for email in &request.facts.emails {
        ctas.push_str(&format!(
            "  - {{ text: \"Email\", href: \"mailto:{email}\" }}\n"
        ));
    }
    for phone in &request.facts.phones {
        ctas.push_str(&format!(
            "  - {{ text: \"Call\", href: \"tel:{phone}\" }}\n"
        ));
    }

    let address_line = request
        .facts
        .address
        .as_deref()
        .map(|address| format!("address: \"{address}\"\n"))
        .unwrap_or_default();

    let tone_line = request
        .tone
        .map(|tone| format!("Write in a {tone} tone.\n"))
        .unwrap_or_default();

    let form_block = if request.page_type == PageType::Contact {
        concat!(
            "form:\n",
            "  action: \"/api/contact\"\n",
            "  method: \"POST\"\n",
            "  submitText: \"Send Message\"\n",
            "  fields:\n",
            "    - { name: \"name\",    label: \"Your Name\",        type: \"text\",     required: true  }\n",
            "    - { name: \"email\",   label: \"Email Address\",    type: \"email\",    required: true  }\n",
            "    - { name: \"phone\",   label: \"Phone Number\",     type: \"tel\",      required: false }\n",
            "    - { name: \"message\", label: \"Message\",          type: \"textarea\", required: true  }\n",
        )
        .to_string()
    } else {
        String::new()
    };

    let posts_block = if request.page_type == PageType::Blog && !request.posts.is_empty() {
        let mut block = String::from("posts:\n");
        for post in request.posts {
            block.push_str(&format!(
                "  - {{ title: \"{}\", slug: \"{}\", date: {}, excerpt: \"{}\" }}\n",
                post.title,
                post.slug,
                post.date
                    .map(|d| format!("\"{d}\""))
                    .unwrap_or_else(|| "null".to_string()),
                post.excerpt.replace('"', "'").replace('\n', " "),
            ));
        }
        block
    } else {
        String::new()
    };

    format!(
        r#"You are an expert web copy editor. Please optimize the following Markdown content for a {page_type} page:

{cleaned_markdown}

Focus ONLY on the text content. Ignore all images, image URLs, and alt text.
{tone_line}
Specific requirements:
1. Generate a 1-sentence description (<= 155 chars, no quotes)
2. Extract ALL calls-to-action (CTAs) from the text and move them to the front-matter
   - This includes any text with phone numbers, email addresses, or links
   - Remove ALL Markdown links from the body text
   - Convert phone numbers to proper tel: links
3. Ensure exactly one H1 (#) at the start (taken from <title> or first <h1>)
4. Demote any extra H1s to H2 (##)
5. Keep bullet lists in Markdown format
6. Do NOT move lists into structured arrays
7. Improve grammar, clarity, concision, engagement; keep facts accurate
8. Remove redundancy:
   - Eliminate repeated phrases or concepts
   - Consolidate similar ideas into single, clear statements
   - Ensure each section adds unique value
   - Remove duplicate information across sections
   - Keep only the strongest version of any repeated message

Return ONLY valid Markdown prefixed with YAML front-matter:

---
pageType: "{page_type}"
slug: "{slug}"
metaTitle: "<best-fit title <= 60 chars>"
description: "<1-sentence summary <= 155 chars>"
{address_line}cta:
{ctas}{form_block}{posts_block}wordCount: <integer>
---

(The rest of the Markdown body follows, starting with the single H1. NO LINKS should remain in the body text.)"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts() -> ContactFacts {
        ContactFacts {
            emails: vec!["sales@example.com".to_string()],
            phones: vec!["+14155550100".to_string()],
            address: Some("Main St, Springfield, IL 62704".to_string()),
        }
    }

    fn request<'a>(
        page_type: PageType,
        url: &'a Url,
        facts: &'a ContactFacts,
        posts: &'a [BlogPost],
    ) -> RewriteRequest<'a> {
        RewriteRequest {
            markdown: "Some body text",
            page_type,
            url,
            facts,
            posts,
            tone: None,
        }
    }

    #[test]
    fn test_url_slug() {
        let root = Url::parse("https://example.com/").unwrap();
        let page = Url::parse("https://example.com/about/team/").unwrap();

        assert_eq!(url_slug(&root), "home");
        assert_eq!(url_slug(&page), "about/team");
    }

    #[test]
    fn test_prompt_carries_front_matter_and_ctas() {
        let url = Url::parse("https://example.com/about").unwrap();
        let facts = facts();
        let req = request(PageType::About, &url, &facts, &[]);
        let prompt = build_prompt(&req, req.markdown);

        assert!(prompt.contains("pageType: \"about\""));
        assert!(prompt.contains("slug: \"about\""));
        assert!(prompt.contains("mailto:sales@example.com"));
        assert!(prompt.contains("tel:+14155550100"));
        assert!(prompt.contains("address: \"Main St, Springfield, IL 62704\""));
        assert!(!prompt.contains("form:"));
        assert!(!prompt.contains("posts:"));
    }

    #[test]
    fn test_contact_pages_get_form_block() {
        let url = Url::parse("https://example.com/contact").unwrap();
        let facts = facts();
        let req = request(PageType::Contact, &url, &facts, &[]);
        let prompt = build_prompt(&req, req.markdown);

        assert!(prompt.contains("form:"));
        assert!(prompt.contains("submitText: \"Send Message\""));
    }

    #[test]
    fn test_blog_pages_get_posts_block() {
        let url = Url::parse("https://example.com/blog").unwrap();
        let facts = ContactFacts::default();
        let posts = vec![BlogPost {
            title: "Launch".to_string(),
            excerpt: "We shipped.".to_string(),
            slug: "launch".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 3),
            hero_image: None,
        }];
        let req = request(PageType::Blog, &url, &facts, &posts);
        let prompt = build_prompt(&req, req.markdown);

        assert!(prompt.contains("posts:"));
        assert!(prompt.contains("slug: \"launch\""));
        assert!(prompt.contains("date: \"2024-03-03\""));
    }

    #[test]
    fn test_tone_directive_included_when_set() {
        let url = Url::parse("https://example.com/about").unwrap();
        let facts = ContactFacts::default();
        let mut req = request(PageType::About, &url, &facts, &[]);
        req.tone = Some("playful");
        let prompt = build_prompt(&req, req.markdown);

        assert!(prompt.contains("Write in a playful tone."));
    }

    #[test]
    fn test_strip_contact_facts_removes_signals() {
        let markdown = "Email sales@example.com or call (415) 555-0100. \
                        Find us at 123 Main St, Springfield, IL 62704.";
        let facts = ContactFacts {
            emails: vec!["sales@example.com".to_string()],
            phones: vec!["+14155550100".to_string()],
            address: Some("Main St, Springfield, IL 62704".to_string()),
        };

        let cleaned = strip_contact_facts(markdown, &facts);
        assert!(!cleaned.contains("sales@example.com"));
        assert!(!cleaned.contains("555-0100"));
        assert!(!cleaned.contains("Springfield"));
    }
}
