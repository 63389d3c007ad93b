//! Local HTTP API.
//!
//! Exposes the medication store, today's schedule, missed-dose alerts,
//! the profile and notification settings as JSON endpoints under
//! `/api/`. The router is composable: `api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{ApiServer, ApiSession};
pub use types::ApiContext;
