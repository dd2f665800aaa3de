//! Authorization repository
//!
//! Usernames are unique at the database level; a conflicting insert is
//! reported as `DuplicateUsername` rather than checked beforehand.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use todoctl_core::User;

use super::Authorization;
use crate::auth::CredentialHasher;
use crate::db::error::map_unique_username;
use crate::db::query::sql;
use crate::db::DbError;

/// PostgreSQL authorization store
pub struct AuthPostgres {
    pool: PgPool,
    hasher: Arc<dyn CredentialHasher>,
}

impl AuthPostgres {
    pub fn new(pool: PgPool, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { pool, hasher }
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
    })
}

#[async_trait]
impl Authorization for AuthPostgres {
    async fn create_user(&self, user: User) -> Result<i32, DbError> {
        let id: i32 = sqlx::query_scalar(sql::INSERT_USER)
            .bind(&user.name)
            .bind(&user.username)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_username(e, &user.username))?;

        tracing::debug!(user_id = id, username = %user.username, "user created");
        Ok(id)
    }

    async fn get_user(&self, username: &str, password: &str) -> Result<User, DbError> {
        let row = sqlx::query(sql::SELECT_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("user", username))?;

        let user = user_from_row(&row)?;
        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(DbError::InvalidCredential);
        }

        Ok(user)
    }
}
