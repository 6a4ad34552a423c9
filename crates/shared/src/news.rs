use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::models::RawArticle;

const NO_TITLE: &str = "No title available";
pub const NO_SUMMARY: &str = "No summary available";

const MAX_ATTEMPTS: u32 = 3;

/// Scrapes company news from a Bing News search results page
pub struct BingNewsClient {
    client: Client,
    search_url: String,
}

impl BingNewsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
        })
    }

    /// Fetch up to `limit` distinct articles about `company`.
    ///
    /// A non-success status yields an empty list rather than an error, so the
    /// caller can report "no articles" the same way in both cases.
    pub async fn fetch_articles(&self, company: &str, limit: usize) -> Result<Vec<RawArticle>> {
        let url = search_url(&self.search_url, company);

        for attempt in 0..MAX_ATTEMPTS {
            match self.try_fetch(&url, limit).await {
                Ok(articles) => return Ok(articles),
                Err(e) => {
                    if attempt == MAX_ATTEMPTS - 1 {
                        return Err(e).with_context(|| format!("Failed to fetch news for {}", company));
                    }
                    let backoff = std::time::Duration::from_millis(500 * (2_u64.pow(attempt)));
                    warn!(error = %e, attempt, ?backoff, "News search failed, retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        Ok(Vec::new())
    }

    async fn try_fetch(&self, url: &str, limit: usize) -> Result<Vec<RawArticle>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send HTTP request")?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, %url, "News search returned an error status");
            return Ok(Vec::new());
        }

        let html = response.text().await.context("Failed to read response body")?;
        let articles = parse_search_results(&html, url, limit)?;

        info!(count = articles.len(), %url, "Parsed news search results");
        Ok(articles)
    }
}

/// Search URL for a company, with the query percent-encoded.
pub fn search_url(base: &str, company: &str) -> String {
    format!("{}?q={}", base, urlencoding::encode(company.trim()))
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid CSS selector {}: {}", css, e))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract articles from a search results page.
///
/// Looks at the first `limit` news cards only. Cards without a title or link
/// are skipped, and a card repeating an earlier (title, summary) pair is
/// dropped. Relative links are resolved against `base_url`.
pub fn parse_search_results(html: &str, base_url: &str, limit: usize) -> Result<Vec<RawArticle>> {
    let document = Html::parse_document(html);
    let card_selector = selector(".news-card")?;
    let title_selector = selector("a.title")?;
    let any_link_selector = selector("a")?;
    let snippet_selector = selector(".snippet")?;

    let base = Url::parse(base_url).ok();
    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for card in document.select(&card_selector).take(limit) {
        let title_tag = card
            .select(&title_selector)
            .next()
            .or_else(|| card.select(&any_link_selector).next());

        let title = title_tag
            .map(element_text)
            .unwrap_or_else(|| NO_TITLE.to_string());
        let link = title_tag
            .and_then(|tag| tag.value().attr("href"))
            .map(|href| resolve_link(base.as_ref(), href));

        let Some(link) = link else {
            debug!(%title, "Skipping news card without link");
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let summary = card
            .select(&snippet_selector)
            .next()
            .map(element_text)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NO_SUMMARY.to_string());

        if !seen.insert((title.clone(), summary.clone())) {
            debug!(%title, "Skipping duplicate news card");
            continue;
        }

        articles.push(RawArticle {
            title,
            link,
            summary,
        });
    }

    Ok(articles)
}

fn resolve_link(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.bing.com/news/search?q=Tesla";

    fn card(title: &str, href: Option<&str>, snippet: Option<&str>) -> String {
        let link = match href {
            Some(h) => format!("<a class=\"title\" href=\"{}\">{}</a>", h, title),
            None => format!("<a class=\"title\">{}</a>", title),
        };
        let snippet = snippet
            .map(|s| format!("<div class=\"snippet\">{}</div>", s))
            .unwrap_or_default();
        format!("<div class=\"news-card\">{}{}</div>", link, snippet)
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body>{}</body></html>", cards.join("\n"))
    }

    #[test]
    fn test_search_url_encodes_query() {
        assert_eq!(
            search_url("https://www.bing.com/news/search", " Johnson & Johnson "),
            "https://www.bing.com/news/search?q=Johnson%20%26%20Johnson"
        );
    }

    #[test]
    fn test_parse_basic_cards() {
        let html = page(&[
            card("Tesla beats estimates", Some("https://example.com/a"), Some("Deliveries rose.")),
            card("Tesla recall", Some("https://example.com/b"), None),
        ]);

        let articles = parse_search_results(&html, BASE, 10).unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Tesla beats estimates");
        assert_eq!(articles[0].link, "https://example.com/a");
        assert_eq!(articles[0].summary, "Deliveries rose.");
        assert_eq!(articles[1].summary, "No summary available");
    }

    #[test]
    fn test_parse_skips_cards_without_link() {
        let html = page(&[card("No link here", None, Some("Text"))]);
        assert!(parse_search_results(&html, BASE, 10).unwrap().is_empty());
    }

    #[test]
    fn test_parse_drops_duplicate_title_and_summary() {
        let html = page(&[
            card("Same", Some("https://example.com/1"), Some("Same text")),
            card("Same", Some("https://example.com/2"), Some("Same text")),
            card("Same", Some("https://example.com/3"), Some("Different text")),
        ]);

        let articles = parse_search_results(&html, BASE, 10).unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].link, "https://example.com/1");
        assert_eq!(articles[1].summary, "Different text");
    }

    #[test]
    fn test_parse_respects_limit() {
        let cards: Vec<String> = (0..5)
            .map(|i| card(&format!("Story {}", i), Some("https://example.com"), Some(&format!("S{}", i))))
            .collect();

        let articles = parse_search_results(&page(&cards), BASE, 3).unwrap();
        assert_eq!(articles.len(), 3);
    }

    #[test]
    fn test_parse_falls_back_to_first_link_and_resolves_relative_href() {
        let html = page(&[
            "<div class=\"news-card\"><a href=\"/news/story\">  Fallback   title </a></div>".to_string(),
        ]);

        let articles = parse_search_results(&html, BASE, 10).unwrap();

        assert_eq!(articles[0].title, "Fallback title");
        assert_eq!(articles[0].link, "https://www.bing.com/news/story");
    }
}
