//! Data access capabilities and their PostgreSQL implementations
//!
//! The service layer only sees the three traits below. Each storage engine
//! provides one implementation of each:
//! - PostgreSQL: [`AuthPostgres`], [`ListPostgres`], [`ItemPostgres`]
//! - in-memory: [`crate::db::MemoryStore`]

pub mod auth;
pub mod items;
pub mod lists;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use todoctl_core::{NewItem, NewList, TodoItem, TodoList, UpdateItemInput, UpdateListInput, User};

use super::{DbError, MemoryStore};
use crate::auth::CredentialHasher;

pub use auth::AuthPostgres;
pub use items::ItemPostgres;
pub use lists::ListPostgres;

/// User creation and credential lookup
#[async_trait]
pub trait Authorization: Send + Sync {
    /// Insert a user whose `password_hash` is already hashed. `id` is ignored.
    async fn create_user(&self, user: User) -> Result<i32, DbError>;

    /// Look up a user and check the raw password against the stored hash.
    async fn get_user(&self, username: &str, password: &str) -> Result<User, DbError>;
}

/// Lists, scoped by the `user_lists` owner edge
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Insert the list and its owner edge atomically.
    async fn create(&self, user_id: i32, list: NewList) -> Result<i32, DbError>;
    async fn get_all(&self, user_id: i32) -> Result<Vec<TodoList>, DbError>;
    async fn get_by_id(&self, user_id: i32, list_id: i32) -> Result<TodoList, DbError>;
    /// Delete the list and its items atomically.
    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), DbError>;
    /// `input` must already be validated as non-empty.
    async fn update(&self, user_id: i32, list_id: i32, input: UpdateListInput)
        -> Result<(), DbError>;
}

/// Items, scoped by `list_items` then `user_lists`
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert the item and its membership edge atomically.
    async fn create(&self, list_id: i32, item: NewItem) -> Result<i32, DbError>;
    async fn get_all(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, DbError>;
    async fn get_by_id(&self, user_id: i32, item_id: i32) -> Result<TodoItem, DbError>;
    async fn delete(&self, user_id: i32, item_id: i32) -> Result<(), DbError>;
    /// `input` must already be validated as non-empty.
    async fn update(&self, user_id: i32, item_id: i32, input: UpdateItemInput)
        -> Result<(), DbError>;
}

/// One storage engine's implementation of every capability
#[derive(Clone)]
pub struct Repository {
    pub auth: Arc<dyn Authorization>,
    pub lists: Arc<dyn ListStore>,
    pub items: Arc<dyn ItemStore>,
}

impl Repository {
    pub fn postgres(pool: PgPool, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            auth: Arc::new(AuthPostgres::new(pool.clone(), hasher)),
            lists: Arc::new(ListPostgres::new(pool.clone())),
            items: Arc::new(ItemPostgres::new(pool)),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            auth: store.clone(),
            lists: store.clone(),
            items: store,
        }
    }
}

/// Shared by the rows-affected checks in update/delete.
pub(crate) fn expect_one_row(
    rows_affected: u64,
    resource: &'static str,
    id: i32,
) -> Result<(), DbError> {
    if rows_affected == 0 {
        return Err(DbError::not_found(resource, id));
    }
    Ok(())
}
