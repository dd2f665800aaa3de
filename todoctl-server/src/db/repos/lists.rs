//! List repository
//!
//! - create: list row + owner edge in one transaction
//! - reads/update: joined through `user_lists`
//! - delete: the list's items, then the list, in one transaction

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use todoctl_core::{NewList, TodoList, UpdateListInput};

use super::{expect_one_row, ListStore};
use crate::db::query::{sql, ScopedUpdate};
use crate::db::DbError;

/// PostgreSQL list store
pub struct ListPostgres {
    pool: PgPool,
}

impl ListPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn list_from_row(row: &PgRow) -> Result<TodoList, sqlx::Error> {
    Ok(TodoList {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
    })
}

#[async_trait]
impl ListStore for ListPostgres {
    async fn create(&self, user_id: i32, list: NewList) -> Result<i32, DbError> {
        let mut tx = self.pool.begin().await?;

        let list_id: i32 = sqlx::query_scalar(sql::INSERT_LIST)
            .bind(&list.title)
            .bind(&list.description)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(sql::INSERT_USER_LIST)
            .bind(user_id)
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(user_id, list_id, "list created");
        Ok(list_id)
    }

    async fn get_all(&self, user_id: i32) -> Result<Vec<TodoList>, DbError> {
        let rows = sqlx::query(sql::SELECT_LISTS)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let lists = rows
            .iter()
            .map(list_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    async fn get_by_id(&self, user_id: i32, list_id: i32) -> Result<TodoList, DbError> {
        let row = sqlx::query(sql::SELECT_LIST_BY_ID)
            .bind(user_id)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("list", list_id))?;

        Ok(list_from_row(&row)?)
    }

    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let items = sqlx::query(sql::DELETE_LIST_ITEMS)
            .bind(user_id)
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(sql::DELETE_LIST)
            .bind(user_id)
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        // Dropping `tx` on the error path rolls back the item deletes too
        expect_one_row(result.rows_affected(), "list", list_id)?;

        tx.commit().await?;
        tracing::debug!(
            user_id,
            list_id,
            items_deleted = items.rows_affected(),
            "list deleted"
        );
        Ok(())
    }

    async fn update(
        &self,
        user_id: i32,
        list_id: i32,
        input: UpdateListInput,
    ) -> Result<(), DbError> {
        let query = ScopedUpdate::list(user_id, list_id, &input).build()?;
        let result = query.execute(&self.pool).await?;
        expect_one_row(result.rows_affected(), "list", list_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{Authorization, AuthPostgres, ItemPostgres, ItemStore};
    use crate::db::migrations;
    use crate::db::pool::test_pool;
    use crate::auth::Argon2Hasher;
    use std::sync::Arc;
    use todoctl_core::{NewItem, User};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p todoctl-server -- --ignored

    async fn setup() -> (PgPool, i32, i32) {
        let pool = test_pool().await;
        migrations::run(&pool).await.expect("migrations failed");

        let auth = AuthPostgres::new(pool.clone(), Arc::new(Argon2Hasher));
        let stamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let mut ids = Vec::new();
        for who in ["a", "b"] {
            let id = auth
                .create_user(User {
                    id: 0,
                    name: who.into(),
                    username: format!("lists-{}-{}", who, stamp),
                    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
                })
                .await
                .unwrap();
            ids.push(id);
        }
        (pool, ids[0], ids[1])
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_is_invisible_to_other_users() {
        let (pool, a, b) = setup().await;
        let lists = ListPostgres::new(pool);

        let id = lists
            .create(a, NewList::new("Groceries", ""))
            .await
            .unwrap();

        let err = lists.get_by_id(b, id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(lists.get_by_id(a, id).await.unwrap().title, "Groceries");

        let input = UpdateListInput {
            title: Some("Stolen".into()),
            ..Default::default()
        };
        assert!(lists.update(b, id, input).await.unwrap_err().is_not_found());
        assert!(lists.delete(b, id).await.unwrap_err().is_not_found());
        assert!(lists.get_all(b).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn partial_update_keeps_other_fields() {
        let (pool, a, _) = setup().await;
        let lists = ListPostgres::new(pool);
        let id = lists
            .create(a, NewList::new("Chores", "weekly"))
            .await
            .unwrap();

        let input = UpdateListInput {
            title: Some("House chores".into()),
            ..Default::default()
        };
        lists.update(a, id, input).await.unwrap();

        let list = lists.get_by_id(a, id).await.unwrap();
        assert_eq!(list.title, "House chores");
        assert_eq!(list.description, "weekly");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_removes_list_items() {
        let (pool, a, _) = setup().await;
        let lists = ListPostgres::new(pool.clone());
        let items = ItemPostgres::new(pool.clone());

        let list_id = lists.create(a, NewList::new("Trip", "")).await.unwrap();
        let item_id = items.create(list_id, NewItem::new("Tickets", "")).await.unwrap();

        lists.delete(a, list_id).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items WHERE id = $1")
            .bind(item_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(lists.get_by_id(a, list_id).await.unwrap_err().is_not_found());
    }
}
