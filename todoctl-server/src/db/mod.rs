//! Database layer - connection pool, ownership-scoped SQL and repositories
//!
//! # Design Principles
//!
//! - Pool handle passed explicitly to every repository, no singleton
//! - Every read/write/delete joins through the owner edge
//! - Zero rows affected is `NotFound`, never silent success
//! - Multi-statement writes run on one transaction handle

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repos;

pub use error::DbError;
pub use memory::MemoryStore;
pub use pool::{create_pool, pool_options};
pub use repos::*;
