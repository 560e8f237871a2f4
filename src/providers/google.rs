//! Google Books metadata provider
//!
//! Uses the public Google Books volumes API.

use super::traits::*;
use crate::results::{BookCandidate, ProviderSource, GENERIC_COVER};
use anyhow::Result;

const SEARCH_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Google Books provider
pub struct Google {
    search_url: String,
}

impl Google {
    pub fn new() -> Self {
        Self {
            search_url: SEARCH_URL.to_string(),
        }
    }

    /// Override the API endpoint, used by tests against a local server
    pub fn with_search_url(url: impl Into<String>) -> Self {
        Self {
            search_url: url.into(),
        }
    }

    fn source() -> ProviderSource {
        ProviderSource::new("google", "Google Books", "https://books.google.com/")
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MetadataProvider for Google {
    fn name(&self) -> &str {
        "google"
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://books.google.com/")
            .description("Google Books")
            .official_api(true)
    }

    fn request(&self, params: &SearchParams) -> Result<ProviderRequest> {
        // The volumes API takes the whole search as a single q parameter
        let url = format!("{}?q={}", self.search_url, urlencoding::encode(&params.title));
        Ok(ProviderRequest::get(url))
    }

    fn response(&self, response: ProviderResponse) -> Result<Vec<BookCandidate>> {
        if !response.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", response.status));
        }

        let json: serde_json::Value = response.json()?;

        let items = match json.get("items").and_then(|i| i.as_array()) {
            Some(items) => items,
            None => return Ok(vec![]),
        };

        let mut candidates = Vec::new();

        for item in items {
            let id = match item.get("id").and_then(|i| i.as_str()) {
                Some(id) => id,
                None => continue,
            };
            let empty = serde_json::Value::Object(Default::default());
            let info = item.get("volumeInfo").unwrap_or(&empty);

            let title = info
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or_default();

            let mut candidate = BookCandidate::new(id, title, Self::source());

            if let Some(authors) = info.get("authors").and_then(|a| a.as_array()) {
                candidate.authors = authors
                    .iter()
                    .filter_map(|a| a.as_str())
                    .map(String::from)
                    .collect();
            }

            if let Some(description) = info.get("description").and_then(|d| d.as_str()) {
                candidate.description = description.to_string();
            }

            if let Some(publisher) = info.get("publisher").and_then(|p| p.as_str()) {
                candidate.publisher = publisher.to_string();
            }

            if let Some(date) = info.get("publishedDate").and_then(|d| d.as_str()) {
                candidate.published_date = date.to_string();
            }

            if let Some(categories) = info.get("categories").and_then(|c| c.as_array()) {
                candidate.tags = categories
                    .iter()
                    .filter_map(|c| c.as_str())
                    .map(String::from)
                    .collect();
            }

            candidate.rating = info
                .get("averageRating")
                .and_then(|r| r.as_f64())
                .unwrap_or(0.0);

            candidate.cover = info
                .get("imageLinks")
                .and_then(|l| l.get("thumbnail"))
                .and_then(|t| t.as_str())
                .unwrap_or(GENERIC_COVER)
                .to_string();

            candidate.url = format!("https://books.google.com/books?id={}", id);

            candidates.push(candidate);
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "items": [
            {
                "id": "zyTCAlFPjgYC",
                "volumeInfo": {
                    "title": "The Google Story",
                    "authors": ["David A. Vise", "Mark Malseed"],
                    "publisher": "Random House Digital, Inc.",
                    "publishedDate": "2005-11-15",
                    "description": "Here is the story behind one of the most remarkable Internet successes of our time.",
                    "categories": ["Business & Economics", "Business & Economics"],
                    "averageRating": 3.5,
                    "imageLinks": {
                        "thumbnail": "http://books.google.com/books/content?id=zyTCAlFPjgYC"
                    }
                }
            }
        ]
    }"#;

    fn response(status: u16, text: &str) -> ProviderResponse {
        ProviderResponse {
            status,
            text: text.to_string(),
            url: SEARCH_URL.to_string(),
        }
    }

    #[test]
    fn request_encodes_keyword() {
        let google = Google::new();
        let request = google
            .request(&SearchParams::new("42", "the google story"))
            .unwrap();

        assert!(request.url.starts_with(SEARCH_URL));
        assert!(request.url.contains("q=the%20google%20story"));
    }

    #[test]
    fn response_maps_volume_info() {
        let google = Google::new();
        let candidates = google.response(response(200, SAMPLE)).unwrap();

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.id, "zyTCAlFPjgYC");
        assert_eq!(c.title, "The Google Story");
        assert_eq!(c.authors.len(), 2);
        assert_eq!(c.rating, 3.5);
        assert_eq!(c.published_date, "2005-11-15");
        assert_eq!(c.url, "https://books.google.com/books?id=zyTCAlFPjgYC");
        assert_eq!(c.source.id, "google");
        assert!(c.series.is_none());
    }

    #[test]
    fn response_without_items_is_empty() {
        let google = Google::new();
        let candidates = google
            .response(response(200, r#"{"totalItems": 0}"#))
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn response_error_status_fails() {
        let google = Google::new();
        assert!(google.response(response(503, "")).is_err());
    }

    #[test]
    fn response_missing_cover_falls_back_to_generic() {
        let google = Google::new();
        let body = r#"{"items": [{"id": "x", "volumeInfo": {"title": "Bare"}}]}"#;
        let candidates = google.response(response(200, body)).unwrap();
        assert_eq!(candidates[0].cover, GENERIC_COVER);
    }
}
