//! Douban Books metadata provider

use super::traits::*;
use crate::results::{BookCandidate, ProviderSource, GENERIC_COVER};
use anyhow::Result;

const SEARCH_URL: &str = "https://api.douban.com/v2/book/search";
const API_KEY: &str = "0df993c66c0c636e29ecbb5344252a4a";

/// Douban book search provider
pub struct Douban {
    search_url: String,
    api_key: String,
}

impl Douban {
    pub fn new() -> Self {
        Self {
            search_url: SEARCH_URL.to_string(),
            api_key: API_KEY.to_string(),
        }
    }

    /// Override the API endpoint, used by tests against a local server
    pub fn with_search_url(url: impl Into<String>) -> Self {
        Self {
            search_url: url.into(),
            api_key: API_KEY.to_string(),
        }
    }

    fn source() -> ProviderSource {
        ProviderSource::new("douban", "Douban Books", "https://book.douban.com/")
    }

    /// Douban gives partial publication dates ("2019", "2019-7"). Normalize
    /// to YYYY-MM-01, or empty when the date cannot be read.
    fn normalize_pubdate(pubdate: &str) -> String {
        let mut parts = pubdate.split('-');
        let year = parts.next().unwrap_or("1");
        let month = parts.next().unwrap_or("1");

        match (year.parse::<i32>(), month.parse::<u32>()) {
            (Ok(year), Ok(month)) => format!("{}-{:02}-{:02}", year, month, 1),
            _ => String::new(),
        }
    }
}

impl Default for Douban {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MetadataProvider for Douban {
    fn name(&self) -> &str {
        "douban"
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://book.douban.com/")
            .description("Douban Books")
            .official_api(true)
            .api_key_required(true)
    }

    fn request(&self, params: &SearchParams) -> Result<ProviderRequest> {
        Ok(ProviderRequest::get(&self.search_url)
            .param("apikey", &self.api_key)
            .param("q", &params.title)
            .param("fields", "all")
            .param("count", "10"))
    }

    fn response(&self, response: ProviderResponse) -> Result<Vec<BookCandidate>> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let json: serde_json::Value = response.json()?;

        let books = match json.get("books").and_then(|b| b.as_array()) {
            Some(books) => books,
            None => return Ok(vec![]),
        };

        let mut candidates = Vec::new();

        for item in books {
            let id = match item.get("id").and_then(|i| i.as_str()) {
                Some(id) => id,
                None => continue,
            };

            let title = item
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or_default();

            let mut candidate = BookCandidate::new(id, title, Self::source());

            if let Some(authors) = item.get("author").and_then(|a| a.as_array()) {
                candidate.authors = authors
                    .iter()
                    .filter_map(|a| a.as_str())
                    .map(String::from)
                    .collect();
            }

            if let Some(summary) = item.get("summary").and_then(|s| s.as_str()) {
                candidate.description = summary.to_string();
            }

            if let Some(publisher) = item.get("publisher").and_then(|p| p.as_str()) {
                candidate.publisher = publisher.to_string();
            }

            if let Some(pubdate) = item.get("pubdate").and_then(|d| d.as_str()) {
                candidate.published_date = Self::normalize_pubdate(pubdate);
            }

            if let Some(tags) = item.get("tags").and_then(|t| t.as_array()) {
                candidate.tags = tags
                    .iter()
                    .filter_map(|tag| tag.get("title").and_then(|t| t.as_str()))
                    .map(|title| title.to_lowercase().replace(',', "_"))
                    .collect();
            }

            // Douban rates out of 10
            candidate.rating = item
                .get("rating")
                .and_then(|r| r.get("average"))
                .and_then(|a| a.as_str().map(String::from).or_else(|| a.as_f64().map(|f| f.to_string())))
                .and_then(|a| a.parse::<f64>().ok())
                .map(|a| a / 2.0)
                .unwrap_or(0.0);

            if let Some(series) = item
                .get("series")
                .and_then(|s| s.get("title"))
                .and_then(|t| t.as_str())
            {
                candidate.series = Some(series.to_string());
            }

            candidate.cover = item
                .get("image")
                .and_then(|i| i.as_str())
                .unwrap_or(GENERIC_COVER)
                .to_string();

            candidate.url = format!("https://book.douban.com/subject/{}", id);

            candidates.push(candidate);
        }

        Ok(candidates)
    }
}
