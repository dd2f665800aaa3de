//! Item repository
//!
//! Items carry no user reference. Every statement except `create` joins
//! `list_items` to `user_lists` to find the owner; `create` is only reached
//! after the service has confirmed the caller owns `list_id`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use todoctl_core::{NewItem, TodoItem, UpdateItemInput};

use super::{expect_one_row, ItemStore};
use crate::db::query::{sql, ScopedUpdate};
use crate::db::DbError;

/// PostgreSQL item store
pub struct ItemPostgres {
    pool: PgPool,
}

impl ItemPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn item_from_row(row: &PgRow) -> Result<TodoItem, sqlx::Error> {
    Ok(TodoItem {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        done: row.try_get("done")?,
    })
}

#[async_trait]
impl ItemStore for ItemPostgres {
    /// Create item with its membership edge (atomic).
    ///
    /// Both inserts go through the same transaction handle. Any failure
    /// returns before `commit`, and dropping the transaction rolls back the
    /// item insert as well.
    async fn create(&self, list_id: i32, item: NewItem) -> Result<i32, DbError> {
        let mut tx = self.pool.begin().await?;

        let item_id: i32 = sqlx::query_scalar(sql::INSERT_ITEM)
            .bind(&item.title)
            .bind(&item.description)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(sql::INSERT_LIST_ITEM)
            .bind(list_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(list_id, item_id, "item created");
        Ok(item_id)
    }

    async fn get_all(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, DbError> {
        let rows = sqlx::query(sql::SELECT_ITEMS_IN_LIST)
            .bind(list_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(item_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    async fn get_by_id(&self, user_id: i32, item_id: i32) -> Result<TodoItem, DbError> {
        let row = sqlx::query(sql::SELECT_ITEM_BY_ID)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("item", item_id))?;

        Ok(item_from_row(&row)?)
    }

    async fn delete(&self, user_id: i32, item_id: i32) -> Result<(), DbError> {
        let result = sqlx::query(sql::DELETE_ITEM)
            .bind(user_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        expect_one_row(result.rows_affected(), "item", item_id)
    }

    async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        input: UpdateItemInput,
    ) -> Result<(), DbError> {
        let query = ScopedUpdate::item(user_id, item_id, &input).build()?;
        let result = query.execute(&self.pool).await?;
        expect_one_row(result.rows_affected(), "item", item_id)
    }
}
