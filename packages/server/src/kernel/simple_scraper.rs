//! Page content extractor using plain HTTP and local HTML parsing.
//!
//! Fetches a URL with reqwest, picks the main content area with `scraper`,
//! strips navigation and other boilerplate, and converts what is left to
//! Markdown with `htmd`. No JavaScript rendering, so dynamic pages usually
//! come back too short and are dropped.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{BaseWebScraper, ExtractedPage};
use crate::common::truncate_chars;

/// Pages with less extracted text than this are treated as empty.
pub const MIN_CONTENT_CHARS: usize = 200;

/// Upper bound kept per page.
pub const MAX_CONTENT_CHARS: usize = 20_000;

/// Content extractor using reqwest + scraper + htmd
pub struct SimpleScraper {
    client: reqwest::Client,
}

impl SimpleScraper {
    pub fn new() -> Result<Self> {
        // Use a browser-like User-Agent to avoid bot detection
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("pt-BR,pt;q=0.9,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch raw HTML from a URL
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).context("Invalid URL")?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Unsupported URL scheme: {}", parsed.scheme());
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }

    /// Title, main content Markdown. Pure, so tests can feed HTML directly.
    pub fn extract_from_html(html: &str) -> (Option<String>, String) {
        let document = Html::parse_document(html);
        let title = Self::extract_title(&document);
        let main_html = Self::extract_main_content(&document);
        let markdown = Self::html_to_markdown(&Self::remove_boilerplate(&main_html));
        (title, Self::collapse_blank_lines(&markdown))
    }

    fn extract_title(document: &Html) -> Option<String> {
        let title_selector = Selector::parse("title").ok()?;
        document
            .select(&title_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Main content HTML, or the whole body when no content area is marked.
    fn extract_main_content(document: &Html) -> String {
        let main_selectors = [
            "main",
            "article",
            "[role='main']",
            "#content",
            "#main",
            ".content",
            ".post-content",
            ".entry-content",
        ];

        for selector_str in main_selectors {
            if let Ok(selector) = Selector::parse(selector_str) {
                if let Some(main) = document.select(&selector).next() {
                    return main.html();
                }
            }
        }

        if let Ok(body_selector) = Selector::parse("body") {
            if let Some(body) = document.select(&body_selector).next() {
                return body.html();
            }
        }

        document.html()
    }

    fn remove_boilerplate(html: &str) -> String {
        let document = Html::parse_fragment(html);
        let unwanted = [
            "nav", "header", "footer", "aside", ".navbar", ".sidebar", ".menu", ".ads",
            ".advertisement", "#cookie-banner", "script", "style", "noscript", "iframe", "form",
        ];

        let mut result = html.to_string();
        for selector_str in unwanted {
            if let Ok(selector) = Selector::parse(selector_str) {
                for element in document.select(&selector) {
                    result = result.replace(&element.html(), "");
                }
            }
        }

        result
    }

    fn html_to_markdown(html: &str) -> String {
        htmd::convert(html).unwrap_or_else(|_| {
            // Fallback: strip tags and return plain text
            let document = Html::parse_fragment(html);
            document.root_element().text().collect::<String>()
        })
    }

    fn collapse_blank_lines(text: &str) -> String {
        static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
        let blank_runs =
            BLANK_RUNS.get_or_init(|| Regex::new(r"\n{2,}").expect("static pattern"));

        let trimmed: Vec<&str> = text.lines().map(str::trim_end).collect();
        blank_runs
            .replace_all(&trimmed.join("\n"), "\n\n")
            .trim()
            .to_string()
    }
}

#[async_trait]
impl BaseWebScraper for SimpleScraper {
    async fn extract(&self, url: &str) -> Result<Option<ExtractedPage>> {
        let html = self.fetch_html(url).await?;
        let (title, content) = Self::extract_from_html(&html);

        let chars = content.chars().count();
        if chars < MIN_CONTENT_CHARS {
            debug!(url, chars, "Extracted content too short, skipping");
            return Ok(None);
        }

        Ok(Some(ExtractedPage {
            url: url.to_string(),
            title,
            content: truncate_chars(&content, MAX_CONTENT_CHARS).to_string(),
        }))
    }
}
