//! Read-only JSON API over the query engine.
//!
//! Every view is a `GET` under `/api/`; `POST /api/reload` re-reads the
//! store. The router is composable: `api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
