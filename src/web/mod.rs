//! Web server module
//!
//! Provides the HTTP API for WhereAmI-RS.

mod handlers;
mod routes;
mod state;

pub use handlers::{ResolveRequest, ResolveResponse};
pub use routes::create_router;
pub use state::AppState;
