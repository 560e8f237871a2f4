//! Mapping a chosen candidate onto the book-edit form

use super::types::BookCandidate;
use serde::{Deserialize, Serialize};

/// Field values to write into the edit form for a chosen candidate.
/// Fields mirror the form inputs; `series` is absent when the candidate has
/// no series so the existing form value is left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormFill {
    /// Rich-text description field
    pub description: String,
    /// Authors joined with `&`
    pub authors: String,
    pub title: String,
    /// Deduplicated tags joined with `,`
    pub tags: String,
    /// Rating widget value, rounded to the nearest star
    pub rating: u8,
    /// Cover preview image source and hidden cover field
    pub cover_url: String,
    pub published_date: String,
    pub publisher: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

impl FormFill {
    pub fn from_candidate(candidate: &BookCandidate) -> Self {
        Self {
            description: candidate.description.clone(),
            authors: candidate.authors.join("&"),
            title: candidate.title.clone(),
            tags: dedup_tags(&candidate.tags).join(","),
            rating: candidate.rating.round().clamp(0.0, 255.0) as u8,
            cover_url: candidate.cover.clone(),
            published_date: candidate.published_date.clone(),
            publisher: candidate.publisher.clone(),
            series: candidate.series.clone(),
        }
    }
}

/// Remove duplicate tags, keeping the first occurrence of each
fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(tag) {
            unique.push(tag.clone());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::types::ProviderSource;

    fn candidate() -> BookCandidate {
        let mut c = BookCandidate::new(
            "42",
            "Hyperion",
            ProviderSource::new("google", "Google Books", "https://books.google.com/"),
        );
        c.authors = vec!["Dan Simmons".to_string(), "Someone Else".to_string()];
        c.description = "<p>A pilgrimage.</p>".to_string();
        c.tags = vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
            "c".to_string(),
        ];
        c.rating = 4.6;
        c.cover = "https://example.com/cover.jpg".to_string();
        c.published_date = "1989-05-26".to_string();
        c.publisher = "Doubleday".to_string();
        c
    }

    #[test]
    fn tag_dedup_preserves_first_occurrence_order() {
        let fill = FormFill::from_candidate(&candidate());
        assert_eq!(fill.tags, "a,b,c");
    }

    #[test]
    fn authors_joined_with_ampersand() {
        let fill = FormFill::from_candidate(&candidate());
        assert_eq!(fill.authors, "Dan Simmons&Someone Else");
    }

    #[test]
    fn rating_rounds_to_nearest_star() {
        let fill = FormFill::from_candidate(&candidate());
        assert_eq!(fill.rating, 5);

        let mut low = candidate();
        low.rating = 4.4;
        assert_eq!(FormFill::from_candidate(&low).rating, 4);
    }

    #[test]
    fn series_is_absent_when_candidate_has_none() {
        let fill = FormFill::from_candidate(&candidate());
        assert!(fill.series.is_none());

        let json = serde_json::to_value(&fill).unwrap();
        assert!(json.get("series").is_none());

        let mut with_series = candidate();
        with_series.series = Some("Hyperion Cantos".to_string());
        let fill = FormFill::from_candidate(&with_series);
        assert_eq!(fill.series.as_deref(), Some("Hyperion Cantos"));
    }

    #[test]
    fn cover_url_populates_preview_and_hidden_field() {
        let fill = FormFill::from_candidate(&candidate());
        assert_eq!(fill.cover_url, "https://example.com/cover.jpg");
    }
}
