//! BookMeta-RS: a book metadata aggregation service written in Rust
//!
//! Serves a library's "fetch metadata" dialog: searches external book
//! metadata providers concurrently, accumulates per-provider outcomes in a
//! search session, and renders the session state.

pub mod config;
pub mod locales;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use providers::MetadataProvider;
pub use results::{BookCandidate, FormFill, SearchSession, SessionView};
pub use search::{MetaQuery, MetaSearch};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for provider requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
