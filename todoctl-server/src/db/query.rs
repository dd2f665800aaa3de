//! Ownership-scoped SQL
//!
//! Every statement that touches a list or an item joins through the owner
//! edge, so a user can never see or change rows outside their own chain:
//!
//! - lists:  `lists tl` ← `user_lists ul`
//! - items:  `items ti` ← `list_items li` ← `user_lists ul`
//!
//! Fixed statements live in [`sql`]. Partial updates go through
//! [`ScopedUpdate`], which numbers placeholders from the position of each
//! bound value so the SET clause and the trailing predicate can't drift.

use std::fmt::Write as _;

use sqlx::postgres::{PgArguments, PgQueryResult};
use sqlx::query::Query;
use sqlx::Postgres;
use todoctl_core::{UpdateItemInput, UpdateListInput};

use super::DbError;

/// Fixed, fully parameterized statements.
pub mod sql {
    pub const INSERT_USER: &str =
        "INSERT INTO users (name, username, password_hash) VALUES ($1, $2, $3) RETURNING id";

    pub const SELECT_USER_BY_USERNAME: &str =
        "SELECT id, name, username, password_hash FROM users WHERE username = $1";

    pub const INSERT_LIST: &str =
        "INSERT INTO lists (title, description) VALUES ($1, $2) RETURNING id";

    pub const INSERT_USER_LIST: &str = "INSERT INTO user_lists (user_id, list_id) VALUES ($1, $2)";

    pub const SELECT_LISTS: &str = r#"
        SELECT tl.id, tl.title, tl.description
        FROM lists tl
        INNER JOIN user_lists ul ON tl.id = ul.list_id
        WHERE ul.user_id = $1
        ORDER BY tl.id
        "#;

    pub const SELECT_LIST_BY_ID: &str = r#"
        SELECT tl.id, tl.title, tl.description
        FROM lists tl
        INNER JOIN user_lists ul ON tl.id = ul.list_id
        WHERE ul.user_id = $1 AND tl.id = $2
        "#;

    /// Removes the items of one owned list; runs before [`DELETE_LIST`].
    pub const DELETE_LIST_ITEMS: &str = r#"
        DELETE FROM items ti
        USING list_items li, user_lists ul
        WHERE ti.id = li.item_id AND li.list_id = ul.list_id
        AND ul.user_id = $1 AND li.list_id = $2
        "#;

    pub const DELETE_LIST: &str = r#"
        DELETE FROM lists tl
        USING user_lists ul
        WHERE tl.id = ul.list_id AND ul.user_id = $1 AND tl.id = $2
        "#;

    pub const INSERT_ITEM: &str =
        "INSERT INTO items (title, description) VALUES ($1, $2) RETURNING id";

    pub const INSERT_LIST_ITEM: &str = "INSERT INTO list_items (list_id, item_id) VALUES ($1, $2)";

    pub const SELECT_ITEMS_IN_LIST: &str = r#"
        SELECT ti.id, ti.title, ti.description, ti.done
        FROM items ti
        INNER JOIN list_items li ON li.item_id = ti.id
        INNER JOIN user_lists ul ON ul.list_id = li.list_id
        WHERE li.list_id = $1 AND ul.user_id = $2
        ORDER BY ti.id
        "#;

    pub const SELECT_ITEM_BY_ID: &str = r#"
        SELECT ti.id, ti.title, ti.description, ti.done
        FROM items ti
        INNER JOIN list_items li ON li.item_id = ti.id
        INNER JOIN user_lists ul ON ul.list_id = li.list_id
        WHERE ul.user_id = $1 AND ti.id = $2
        "#;

    pub const DELETE_ITEM: &str = r#"
        DELETE FROM items ti
        USING list_items li, user_lists ul
        WHERE ti.id = li.item_id AND li.list_id = ul.list_id
        AND ul.user_id = $1 AND ti.id = $2
        "#;
}

/// A value bound to a positional placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i32),
    Text(String),
    Bool(bool),
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Which ownership chain an update is scoped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipScope {
    List,
    Item,
}

impl OwnershipScope {
    fn target(self) -> &'static str {
        match self {
            Self::List => "lists tl",
            Self::Item => "items ti",
        }
    }

    fn edges(self) -> &'static str {
        match self {
            Self::List => "user_lists ul",
            Self::Item => "list_items li, user_lists ul",
        }
    }

    fn join(self) -> &'static str {
        match self {
            Self::List => "tl.id = ul.list_id",
            Self::Item => "li.item_id = ti.id AND li.list_id = ul.list_id",
        }
    }
}

/// Builder for `UPDATE ... SET ... FROM <edges> WHERE <join> AND ...`.
///
/// Assignments render in the order they are added; the typed constructors
/// [`ScopedUpdate::list`] and [`ScopedUpdate::item`] always add them as
/// title, description, done.
#[derive(Debug, Clone)]
pub struct ScopedUpdate {
    scope: OwnershipScope,
    assignments: Vec<(&'static str, SqlValue)>,
    filters: Vec<(&'static str, SqlValue)>,
}

impl ScopedUpdate {
    pub fn new(scope: OwnershipScope) -> Self {
        Self {
            scope,
            assignments: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Update a list owned by `user_id`.
    pub fn list(user_id: i32, list_id: i32, input: &UpdateListInput) -> Self {
        Self::new(OwnershipScope::List)
            .set_if("title", input.title.clone())
            .set_if("description", input.description.clone())
            .filter("ul.user_id", user_id)
            .filter("tl.id", list_id)
    }

    /// Update an item whose list is owned by `user_id`.
    pub fn item(user_id: i32, item_id: i32, input: &UpdateItemInput) -> Self {
        Self::new(OwnershipScope::Item)
            .set_if("title", input.title.clone())
            .set_if("description", input.description.clone())
            .set_if("done", input.done)
            .filter("ul.user_id", user_id)
            .filter("ti.id", item_id)
    }

    /// Add `column = $n`.
    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.assignments.push((column, value.into()));
        self
    }

    /// Add `column = $n` only when the value is present.
    pub fn set_if<V: Into<SqlValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Add a trailing `AND column = $n` predicate.
    pub fn filter(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.filters.push((column, value.into()));
        self
    }

    /// Render the statement. Fails with `EmptyUpdate` when nothing is set.
    pub fn build(self) -> Result<BuiltQuery, DbError> {
        if self.assignments.is_empty() {
            return Err(DbError::EmptyUpdate);
        }

        let mut args = Vec::with_capacity(self.assignments.len() + self.filters.len());
        let mut sql = format!("UPDATE {} SET ", self.scope.target());

        for (i, (column, value)) in self.assignments.into_iter().enumerate() {
            args.push(value);
            if i > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "{} = ${}", column, args.len());
        }

        let _ = write!(
            sql,
            " FROM {} WHERE {}",
            self.scope.edges(),
            self.scope.join()
        );

        for (column, value) in self.filters {
            args.push(value);
            let _ = write!(sql, " AND {} = ${}", column, args.len());
        }

        Ok(BuiltQuery { sql, args })
    }
}

/// Rendered SQL plus its arguments in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    sql: String,
    args: Vec<SqlValue>,
}

impl BuiltQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[SqlValue] {
        &self.args
    }

    /// Bind every argument, in order, onto a sqlx query.
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        self.args
            .iter()
            .fold(sqlx::query(&self.sql), |query, arg| match arg {
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.clone()),
                SqlValue::Bool(v) => query.bind(*v),
            })
    }

    pub async fn execute<'c, E>(&self, executor: E) -> Result<PgQueryResult, sqlx::Error>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        self.query().execute(executor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_count(sql: &str) -> usize {
        sql.matches('$').count()
    }

    #[test]
    fn item_done_only() {
        let input = UpdateItemInput {
            done: Some(true),
            ..Default::default()
        };
        let built = ScopedUpdate::item(7, 42, &input).build().unwrap();

        assert_eq!(
            built.sql(),
            "UPDATE items ti SET done = $1 FROM list_items li, user_lists ul \
             WHERE li.item_id = ti.id AND li.list_id = ul.list_id \
             AND ul.user_id = $2 AND ti.id = $3"
        );
        assert_eq!(
            built.args(),
            &[SqlValue::Bool(true), SqlValue::Int(7), SqlValue::Int(42)]
        );
    }

    #[test]
    fn item_fields_render_in_declared_order() {
        let input = UpdateItemInput {
            done: Some(false),
            description: Some("2 litres".into()),
            title: Some("Milk".into()),
        };
        let built = ScopedUpdate::item(1, 2, &input).build().unwrap();

        assert!(built
            .sql()
            .starts_with("UPDATE items ti SET title = $1, description = $2, done = $3 FROM"));
        assert!(built.sql().ends_with("AND ul.user_id = $4 AND ti.id = $5"));
        assert_eq!(
            built.args(),
            &[
                SqlValue::Text("Milk".into()),
                SqlValue::Text("2 litres".into()),
                SqlValue::Bool(false),
                SqlValue::Int(1),
                SqlValue::Int(2),
            ]
        );
    }

    #[test]
    fn placeholders_match_args_for_every_field_subset() {
        for mask in 1u8..8 {
            let input = UpdateItemInput {
                title: (mask & 1 != 0).then(|| "t".to_string()),
                description: (mask & 2 != 0).then(|| "d".to_string()),
                done: (mask & 4 != 0).then_some(true),
            };
            let built = ScopedUpdate::item(3, 9, &input).build().unwrap();
            let n = built.args().len();

            assert_eq!(placeholder_count(built.sql()), n, "mask {mask}");
            assert!(built.sql().contains(&format!("ul.user_id = ${}", n - 1)));
            assert!(built.sql().ends_with(&format!("ti.id = ${}", n)));
            assert_eq!(built.args()[n - 2], SqlValue::Int(3));
            assert_eq!(built.args()[n - 1], SqlValue::Int(9));
        }
    }

    #[test]
    fn list_update_uses_single_edge() {
        let input = UpdateListInput {
            description: Some("weekly".into()),
            ..Default::default()
        };
        let built = ScopedUpdate::list(5, 11, &input).build().unwrap();

        assert_eq!(
            built.sql(),
            "UPDATE lists tl SET description = $1 FROM user_lists ul \
             WHERE tl.id = ul.list_id AND ul.user_id = $2 AND tl.id = $3"
        );
        assert_eq!(built.args().len(), 3);
    }

    #[test]
    fn empty_update_is_refused() {
        let err = ScopedUpdate::item(1, 1, &UpdateItemInput::default())
            .build()
            .unwrap_err();
        assert!(matches!(err, DbError::EmptyUpdate));
    }

    #[test]
    fn item_statements_join_edge_to_edge() {
        for stmt in [
            sql::SELECT_ITEMS_IN_LIST,
            sql::SELECT_ITEM_BY_ID,
            sql::DELETE_ITEM,
            sql::DELETE_LIST_ITEMS,
        ] {
            assert!(
                stmt.contains("ul.list_id = li.list_id") || stmt.contains("li.list_id = ul.list_id"),
                "missing edge join in {stmt}"
            );
            assert!(!stmt.contains("li.list_id = li.list_id"));
            assert!(stmt.contains("ul.user_id = $"));
        }
    }
}
