//! API endpoint handlers.
//!
//! Each module corresponds to a client screen. Handlers reuse the store
//! and schedule logic directly.

pub mod health;
pub mod medications;
pub mod profile;
pub mod schedule;
