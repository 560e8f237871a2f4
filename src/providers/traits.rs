//! Provider trait and request/response types

use crate::config::ProviderConfig;
use crate::results::BookCandidate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// What the user asked for: the book being edited plus an optional keyword
/// typed into the search box. Providers search by the keyword when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Identifier of the book being edited
    pub book_id: String,
    /// Title keyword to search for
    pub title: String,
}

impl SearchParams {
    pub fn new(book_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            title: title.into(),
        }
    }
}

/// HTTP GET request to be made on behalf of a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Base URL without query string
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters, appended to the URL on execution
    pub params: HashMap<String, String>,
}

impl ProviderRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            params: HashMap::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Resolve the final URL with query parameters appended
    pub fn full_url(&self) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.url)?;
        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// HTTP response handed back to the provider for parsing
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ProviderResponse {
    /// Parse response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A metadata provider: builds a search request for a book and parses the
/// upstream response into candidate records.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Provider name, unique within the registry
    fn name(&self) -> &str;

    /// Provider metadata for the UI
    fn about(&self) -> ProviderAbout {
        ProviderAbout::default()
    }

    /// Default timeout in seconds
    fn timeout(&self) -> f64 {
        5.0
    }

    /// Build the HTTP request for a search. A request with an empty title
    /// keyword yields no results; providers may still build a request and
    /// let the upstream answer, or short-circuit in `response`.
    fn request(&self, params: &SearchParams) -> anyhow::Result<ProviderRequest>;

    /// Parse the HTTP response into candidates
    fn response(&self, response: ProviderResponse) -> anyhow::Result<Vec<BookCandidate>>;

    /// Optional initialization from configuration (called once on startup)
    fn init(&mut self, _config: &ProviderConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Provider metadata shown on the dialog and the about page
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderAbout {
    /// Provider homepage
    pub website: Option<String>,
    /// Human-readable description
    pub description: Option<String>,
    /// Whether it uses an official API
    pub use_official_api: bool,
    /// Whether an API key is required
    pub require_api_key: bool,
}

impl ProviderAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn official_api(mut self, uses: bool) -> Self {
        self.use_official_api = uses;
        self
    }

    pub fn api_key_required(mut self, required: bool) -> Self {
        self.require_api_key = required;
        self
    }
}
