//! HTTP server layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing
//! - Bearer-token authentication on `/api`
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use extractors::AuthUser;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};

#[cfg(test)]
mod tests;
