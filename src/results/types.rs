//! Candidate record and provider error definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback cover shown when a provider has no image for a book
pub const GENERIC_COVER: &str = "/static/generic_cover.jpg";

/// One metadata record returned by a provider for a book search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookCandidate {
    /// Provider-side identifier of the record
    pub id: String,
    /// Book title
    pub title: String,
    /// Authors in the order the provider lists them
    #[serde(default)]
    pub authors: Vec<String>,
    /// Description, may contain rich text
    #[serde(default)]
    pub description: String,
    /// Publisher name
    #[serde(default)]
    pub publisher: String,
    /// Publication date, YYYY-MM-DD
    #[serde(default)]
    pub published_date: String,
    /// Tags/categories, may contain duplicates
    #[serde(default)]
    pub tags: Vec<String>,
    /// Rating in [0.0, 5.0]
    #[serde(default)]
    pub rating: f64,
    /// Series name, absent when the provider has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    /// Cover image URL, external or local
    pub cover: String,
    /// External link to the book description
    pub url: String,
    /// Which provider produced this record
    pub source: ProviderSource,
}

impl BookCandidate {
    /// Create a candidate with the fields every provider must fill
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: ProviderSource) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: vec![],
            description: String::new(),
            publisher: String::new(),
            published_date: String::new(),
            tags: vec![],
            rating: 0.0,
            series: None,
            cover: GENERIC_COVER.to_string(),
            url: String::new(),
            source,
        }
    }
}

/// Identity of a metadata provider, attached to every candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderSource {
    /// Provider name (registry key)
    pub id: String,
    /// Human-readable description
    pub description: String,
    /// Provider homepage
    pub url: String,
}

impl ProviderSource {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            url: url.into(),
        }
    }
}

/// Why a provider failed to contribute results
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("network error")]
    Network,
    #[error("HTTP error: {0}")]
    HttpStatus(u16),
    #[error("failed to parse response")]
    Parse,
    #[error("unknown error")]
    Unknown,
}
