//! Search execution and orchestration

use super::models::MetaQuery;
use crate::network::HttpClient;
use crate::providers::{MetadataProvider, ProviderRegistry, SearchParams};
use crate::results::{BookCandidate, ProviderError, SearchSession, Timing};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Executor that fans one metadata search out to the selected providers
pub struct MetaSearch {
    /// HTTP client for outgoing requests
    client: HttpClient,
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Default per-provider timeout
    default_timeout: Duration,
    /// Upper bound for per-provider timeouts
    max_timeout: Duration,
    /// Newest launched generation per client session token. A search only
    /// supersedes earlier searches carrying the same token, so concurrent
    /// clients never invalidate each other's sessions. Token-less searches
    /// are unguarded: each stands alone.
    generations: Mutex<HashMap<String, u64>>,
}

impl MetaSearch {
    /// Create a new search executor
    pub fn new(client: HttpClient, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            client,
            registry,
            default_timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
            max_timeout: Duration::from_secs(crate::MAX_TIMEOUT),
            generations: Mutex::new(HashMap::new()),
        }
    }

    /// Set default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set maximum timeout
    pub fn with_max_timeout(mut self, timeout: Duration) -> Self {
        self.max_timeout = timeout;
        self
    }

    /// Generation of the newest search launched for a client session token
    pub fn current_generation(&self, token: &str) -> u64 {
        self.generations
            .lock()
            .unwrap()
            .get(token)
            .copied()
            .unwrap_or(0)
    }

    fn next_generation(&self, token: &str) -> u64 {
        let mut generations = self.generations.lock().unwrap();
        let counter = generations.entry(token.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Launch a search: one pending session entry per selected provider,
    /// then fetch all providers concurrently. Completion order is up to the
    /// network; each provider settles only its own entry. Returns once every
    /// provider has settled. A query carrying a session token supersedes the
    /// previous search of that same token and no other.
    pub async fn execute(&self, query: &MetaQuery) -> SearchSession {
        let generation = match query.session_token.as_deref() {
            Some(token) => self.next_generation(token),
            None => 0,
        };

        let selected: Vec<String> = query
            .providers
            .iter()
            .filter(|name| {
                let known = self.registry.contains(name);
                if !known {
                    warn!("Ignoring unknown provider: {}", name);
                }
                known
            })
            .cloned()
            .collect();

        let session = SearchSession::new(generation, &selected);

        // Nothing selected: the no-result state, without any HTTP traffic
        if session.is_empty() {
            return session;
        }

        // Blank keyword: nothing to ask upstream, every entry settles empty
        if query.keyword.trim().is_empty() {
            for name in &selected {
                session.complete(name, Ok(Vec::new()));
            }
            return session;
        }

        info!(
            "Searching {} providers for book {} (keyword: {:?})",
            selected.len(),
            query.book_id,
            query.keyword
        );

        let futures: Vec<_> = selected
            .iter()
            .filter_map(|name| {
                let provider = self.registry.get(name)?;
                Some(self.fetch_provider(provider.clone(), name.clone(), query, session.clone()))
            })
            .collect();

        join_all(futures).await;

        session
    }

    /// Fetch a single provider and settle its session entry. Failures are
    /// isolated: they degrade this provider to no data and leave siblings
    /// untouched. No retry, no cancellation.
    async fn fetch_provider(
        &self,
        provider: Arc<dyn MetadataProvider>,
        name: String,
        query: &MetaQuery,
        session: SearchSession,
    ) {
        let start = Instant::now();

        let provider_timeout = Duration::from_secs_f64(
            self.registry
                .get_timeout(&name, self.default_timeout.as_secs_f64())
                .min(self.max_timeout.as_secs_f64()),
        );

        debug!(
            "Fetching provider {} with timeout {:?}",
            name, provider_timeout
        );

        let params = SearchParams::new(&query.book_id, &query.keyword);

        let token = query.session_token.as_deref();

        let request = match provider.request(&params) {
            Ok(request) => request,
            Err(e) => {
                warn!("Failed to build request for {}: {}", name, e);
                self.settle(&session, token, &name, Err(ProviderError::Unknown), start);
                return;
            }
        };

        let result = timeout(
            provider_timeout,
            self.client.execute_with_timeout(request, provider_timeout),
        )
        .await;

        match result {
            Ok(Ok(response)) => {
                let status = response.status;
                match provider.response(response) {
                    Ok(candidates) => {
                        debug!(
                            "Provider {} returned {} candidates in {:?}",
                            name,
                            candidates.len(),
                            start.elapsed()
                        );
                        self.settle(&session, token, &name, Ok(candidates), start);
                    }
                    Err(e) => {
                        warn!("Failed to parse response from {}: {}", name, e);
                        let error = if !(200..300).contains(&status) {
                            ProviderError::HttpStatus(status)
                        } else {
                            ProviderError::Parse
                        };
                        self.settle(&session, token, &name, Err(error), start);
                    }
                }
            }
            Ok(Err(e)) => {
                warn!("Request failed for {}: {}", name, e);
                let error = if e.to_string().contains("timed out") {
                    ProviderError::Timeout
                } else {
                    ProviderError::Network
                };
                self.settle(&session, token, &name, Err(error), start);
            }
            Err(_) => {
                warn!("Timeout for provider {}", name);
                self.settle(&session, token, &name, Err(ProviderError::Timeout), start);
            }
        }
    }

    /// Apply a completion through the stale-search guard, recording timing
    /// only when the completion was accepted. The guard compares against the
    /// newest generation of the session's own token; without a token the
    /// completion always applies.
    fn settle(
        &self,
        session: &SearchSession,
        token: Option<&str>,
        name: &str,
        outcome: Result<Vec<BookCandidate>, ProviderError>,
        start: Instant,
    ) {
        let result_count = outcome.as_ref().map(|c| c.len()).unwrap_or(0);
        let current = match token {
            Some(token) => self.current_generation(token),
            None => session.generation(),
        };
        let applied = session.complete_if_current(current, name, outcome);
        if applied {
            session.add_timing(Timing {
                provider: name.to_string(),
                time_ms: start.elapsed().as_millis() as u64,
                result_count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::providers::douban::Douban;
    use crate::providers::google::Google;
    use crate::results::{ProviderState, SessionPhase};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GOOGLE_ONE: &str = r#"{
        "items": [
            {"id": "g1", "volumeInfo": {"title": "The Google Story"}}
        ]
    }"#;

    fn config(name: &str) -> ProviderConfig {
        ProviderConfig {
            name: name.to_string(),
            provider: name.to_string(),
            ..Default::default()
        }
    }

    async fn registry_with(server: &MockServer) -> Arc<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        registry.register(
            Arc::new(Google::with_search_url(format!("{}/google", server.uri()))),
            config("google"),
        );
        registry.register(
            Arc::new(Douban::with_search_url(format!("{}/douban", server.uri()))),
            config("douban"),
        );
        Arc::new(registry)
    }

    #[tokio::test]
    async fn empty_selection_issues_no_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let search = MetaSearch::new(HttpClient::new().unwrap(), registry_with(&server).await);
        let session = search.execute(&MetaQuery::new("42", "dune")).await;

        assert!(session.is_empty());
        assert_eq!(session.view().phase, SessionPhase::NoResults);
    }

    #[tokio::test]
    async fn one_provider_with_results_one_empty_yields_one_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(GOOGLE_ONE, "application/json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/douban"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"count": 0}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let search = MetaSearch::new(HttpClient::new().unwrap(), registry_with(&server).await);
        let query = MetaQuery::new("42", "the google story").with_providers(["google", "douban"]);
        let session = search.execute(&query).await;

        assert_eq!(session.provider_count(), 2);
        let view = session.view();
        assert_eq!(view.phase, SessionPhase::Results);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].provider, "google");
        assert_eq!(view.rows[0].candidate.id, "g1");
        assert_eq!(session.timings().len(), 2);
    }

    #[tokio::test]
    async fn provider_failure_is_isolated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(GOOGLE_ONE, "application/json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/douban"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let search = MetaSearch::new(HttpClient::new().unwrap(), registry_with(&server).await);
        let query = MetaQuery::new("42", "anything").with_providers(["google", "douban"]);
        let session = search.execute(&query).await;

        assert_eq!(
            session.state_of("douban"),
            Some(ProviderState::Failed(ProviderError::HttpStatus(500)))
        );
        let view = session.view();
        assert_eq!(view.phase, SessionPhase::Results);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.failures.len(), 1);
    }

    #[tokio::test]
    async fn all_empty_is_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"totalItems": 0}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let search = MetaSearch::new(HttpClient::new().unwrap(), registry_with(&server).await);
        let query = MetaQuery::new("42", "no such book").with_providers(["google"]);
        let session = search.execute(&query).await;

        assert_eq!(session.view().phase, SessionPhase::NoResults);
    }

    #[tokio::test]
    async fn unknown_providers_are_dropped_from_the_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(GOOGLE_ONE, "application/json"))
            .mount(&server)
            .await;

        let search = MetaSearch::new(HttpClient::new().unwrap(), registry_with(&server).await);
        let query = MetaQuery::new("42", "q").with_providers(["google", "amazon"]);
        let session = search.execute(&query).await;

        assert_eq!(session.provider_count(), 1);
        assert!(session.state_of("amazon").is_none());
    }

    #[tokio::test]
    async fn blank_keyword_settles_empty_without_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let search = MetaSearch::new(HttpClient::new().unwrap(), registry_with(&server).await);
        let query = MetaQuery::new("42", "   ").with_providers(["google", "douban"]);
        let session = search.execute(&query).await;

        assert_eq!(session.view().phase, SessionPhase::NoResults);
        assert_eq!(
            session.state_of("google"),
            Some(ProviderState::Succeeded(vec![]))
        );
        assert_eq!(
            session.state_of("douban"),
            Some(ProviderState::Succeeded(vec![]))
        );
    }

    #[tokio::test]
    async fn superseded_session_rejects_late_completions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"totalItems": 0}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let search = MetaSearch::new(HttpClient::new().unwrap(), registry_with(&server).await);
        let query = MetaQuery::new("42", "q")
            .with_providers(["google"])
            .with_session_token("dialog-1");

        let first = search.execute(&query).await;
        let _second = search.execute(&query).await;

        // A callback left over from the first search must not write anymore
        let applied =
            first.complete_if_current(search.current_generation("dialog-1"), "google", Ok(vec![]));
        assert!(!applied);
    }

    #[tokio::test]
    async fn concurrent_searches_of_different_clients_do_not_interfere() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(GOOGLE_ONE, "application/json")
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/douban"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"count": 0}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let search = Arc::new(MetaSearch::new(
            HttpClient::new().unwrap(),
            registry_with(&server).await,
        ));

        // Client A searches google (slow upstream)...
        let slow = {
            let search = search.clone();
            tokio::spawn(async move {
                let query = MetaQuery::new("1", "the google story")
                    .with_providers(["google"])
                    .with_session_token("tab-a");
                search.execute(&query).await
            })
        };

        // ...while client B launches an unrelated search before A settles
        tokio::time::sleep(Duration::from_millis(50)).await;
        let other = MetaQuery::new("2", "anything")
            .with_providers(["douban"])
            .with_session_token("tab-b");
        search.execute(&other).await;

        // A's completion must still land: B did not supersede A
        let session = slow.await.unwrap();
        let view = session.view();
        assert_eq!(view.phase, SessionPhase::Results);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].candidate.id, "g1");
        assert_ne!(session.state_of("google"), Some(ProviderState::Pending));
    }
}
