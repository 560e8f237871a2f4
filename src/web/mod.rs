//! Web layer: routes, handlers, templates, shared state

pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
