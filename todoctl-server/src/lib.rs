//! todoctl-server: ownership-scoped storage and HTTP API for to-do lists
//!
//! Layers, bottom-up:
//! - [`db`]: query builder, transactional PostgreSQL repositories, in-memory engine
//! - [`auth`]: credential hashing and bearer tokens
//! - [`service`]: validation, deadlines and ownership checks
//! - [`http`]: axum routes over the service

pub mod auth;
pub mod db;
pub mod http;
pub mod service;

pub use db::{create_pool, DbError, MemoryStore, Repository};
pub use http::{build_router, run_server, ApiError, ServerConfig};
pub use service::{Deadline, Service, ServiceError};
