//! Result data model, per-search session state, and form population

pub mod form;
pub mod session;
pub mod types;

pub use form::FormFill;
pub use session::{
    ProviderFailure, ProviderState, ResultRow, SearchSession, SessionPhase, SessionView, Timing,
};
pub use types::{BookCandidate, ProviderError, ProviderSource, GENERIC_COVER};
