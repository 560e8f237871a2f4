//! Search orchestration across metadata providers

pub mod executor;
pub mod models;

pub use executor::MetaSearch;
pub use models::MetaQuery;
