//! Local HTTP API: bearer-token auth, rate limiting, JSON endpoints.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;
