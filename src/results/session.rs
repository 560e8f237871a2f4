//! Search session: per-search accumulation of provider outcomes
//!
//! A session is created fresh for every launched search with one entry per
//! selected provider. Concurrent fetch tasks settle their own entry through
//! a cloned handle; the entry set itself is fixed at launch. Rendering is a
//! pure fold over the current state (`SessionView`), so it can run after any
//! individual completion and is safe to repeat.

use super::types::{BookCandidate, ProviderError};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Per-provider outcome within one search
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderState {
    /// Request dispatched, not yet settled
    Pending,
    /// Request settled with a (possibly empty) candidate list
    Succeeded(Vec<BookCandidate>),
    /// Request settled with a transport or parse failure
    Failed(ProviderError),
}

impl ProviderState {
    /// Settled with no data: empty success or failure
    pub fn is_settled_empty(&self) -> bool {
        match self {
            Self::Pending => false,
            Self::Succeeded(candidates) => candidates.is_empty(),
            Self::Failed(_) => true,
        }
    }
}

/// How long a provider took to settle
#[derive(Debug, Clone, Serialize)]
pub struct Timing {
    pub provider: String,
    pub time_ms: u64,
    pub result_count: usize,
}

#[derive(Debug)]
struct SessionInner {
    /// Provider entries in dispatch order
    entries: Vec<(String, ProviderState)>,
    timings: Vec<Timing>,
}

/// Cheaply cloneable accumulator shared with concurrent fetch tasks
#[derive(Debug, Clone)]
pub struct SearchSession {
    /// Identity token of the search this session belongs to
    generation: u64,
    inner: Arc<RwLock<SessionInner>>,
}

impl SearchSession {
    /// Create a session with one pending entry per selected provider
    pub fn new(generation: u64, providers: &[String]) -> Self {
        let entries = providers
            .iter()
            .map(|name| (name.clone(), ProviderState::Pending))
            .collect();

        Self {
            generation,
            inner: Arc::new(RwLock::new(SessionInner {
                entries,
                timings: Vec::new(),
            })),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn provider_count(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provider_count() == 0
    }

    /// Settle the entry for `provider`. Completions for providers that were
    /// not part of this search are ignored.
    pub fn complete(
        &self,
        provider: &str,
        outcome: Result<Vec<BookCandidate>, ProviderError>,
    ) {
        let mut inner = self.inner.write().unwrap();
        if let Some((_, state)) = inner.entries.iter_mut().find(|(name, _)| name == provider) {
            *state = match outcome {
                Ok(candidates) => ProviderState::Succeeded(candidates),
                Err(error) => ProviderState::Failed(error),
            };
        }
    }

    /// Settle the entry only if this session still belongs to the current
    /// search. A completion arriving after a newer search has started is
    /// discarded instead of written. Returns whether the write was applied.
    pub fn complete_if_current(
        &self,
        current_generation: u64,
        provider: &str,
        outcome: Result<Vec<BookCandidate>, ProviderError>,
    ) -> bool {
        if self.generation != current_generation {
            debug!(
                provider,
                session = self.generation,
                current = current_generation,
                "discarding completion for superseded search"
            );
            return false;
        }
        self.complete(provider, outcome);
        true
    }

    pub fn add_timing(&self, timing: Timing) {
        self.inner.write().unwrap().timings.push(timing);
    }

    pub fn timings(&self) -> Vec<Timing> {
        self.inner.read().unwrap().timings.clone()
    }

    /// Current state of one provider's entry
    pub fn state_of(&self, provider: &str) -> Option<ProviderState> {
        self.inner
            .read()
            .unwrap()
            .entries
            .iter()
            .find(|(name, _)| name == provider)
            .map(|(_, state)| state.clone())
    }

    /// Snapshot the session into a renderable view
    pub fn view(&self) -> SessionView {
        let inner = self.inner.read().unwrap();

        let mut rows = Vec::new();
        let mut failures = Vec::new();
        let mut any_pending = false;

        for (provider, state) in &inner.entries {
            match state {
                ProviderState::Pending => any_pending = true,
                ProviderState::Succeeded(candidates) => {
                    rows.extend(candidates.iter().map(|candidate| ResultRow {
                        provider: provider.clone(),
                        candidate: candidate.clone(),
                    }));
                }
                ProviderState::Failed(error) => failures.push(ProviderFailure {
                    provider: provider.clone(),
                    error: error.clone(),
                }),
            }
        }

        let phase = if inner.entries.is_empty() {
            SessionPhase::NoResults
        } else if !rows.is_empty() {
            SessionPhase::Results
        } else if any_pending {
            SessionPhase::Loading
        } else {
            SessionPhase::NoResults
        };

        SessionView {
            phase,
            rows,
            failures,
        }
    }
}

/// Overall state of the results panel
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// At least one provider outstanding and nothing to show yet
    Loading,
    /// Every entry settled without data, or no providers were selected
    NoResults,
    /// At least one candidate row available
    Results,
}

/// One rendered candidate row
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub provider: String,
    pub candidate: BookCandidate,
}

/// A provider whose request failed, surfaced alongside the rows
#[derive(Debug, Clone, Serialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

/// Renderable snapshot of a session. Rows appear in dispatch order of their
/// provider, then in the order the provider returned them.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub rows: Vec<ResultRow>,
    pub failures: Vec<ProviderFailure>,
}
