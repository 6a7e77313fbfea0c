//! REST API for the check-in desk and the admin UI.
//!
//! Routes are nested under `/api/`. `api_router()` returns a `Router` that
//! can be mounted on any axum server; `server::start_server_on` runs it.

pub mod endpoints;
pub mod error;
pub mod extract;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server_on, ApiServer};
pub use types::ApiContext;
