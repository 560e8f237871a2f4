//! Search query model

use serde::{Deserialize, Serialize};

/// One metadata search as launched from the dialog: which book, which
/// keyword, and which providers the user has checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaQuery {
    /// Identifier of the book being edited
    pub book_id: String,
    /// Title keyword to search for
    pub keyword: String,
    /// Selected provider names, in checkbox order
    pub providers: Vec<String>,
    /// Client session token. Searches sharing a token supersede each other;
    /// searches without one are independent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl MetaQuery {
    pub fn new(book_id: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            keyword: keyword.into(),
            providers: vec![],
            session_token: None,
        }
    }

    /// Add a provider to the selection
    pub fn with_provider(mut self, name: impl Into<String>) -> Self {
        self.providers.push(name.into());
        self
    }

    /// Replace the provider selection
    pub fn with_providers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = names.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the query as belonging to a client session
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_providers() {
        let query = MetaQuery::new("42", "dune")
            .with_provider("google")
            .with_provider("douban");

        assert_eq!(query.book_id, "42");
        assert_eq!(query.providers, ["google", "douban"]);
        assert!(query.session_token.is_none());
    }

    #[test]
    fn session_token_is_carried() {
        let query = MetaQuery::new("42", "dune").with_session_token("tab-1");
        assert_eq!(query.session_token.as_deref(), Some("tab-1"));
    }

    #[test]
    fn with_providers_replaces_selection() {
        let query = MetaQuery::new("42", "")
            .with_provider("google")
            .with_providers(["douban"]);

        assert_eq!(query.providers, ["douban"]);
    }
}
