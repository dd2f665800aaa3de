//! Storage-layer error type
//!
//! "Zero rows" is always reported as `NotFound`, never folded into `Sqlx`,
//! so the HTTP layer can answer 404 instead of 500.

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("invalid username or password")]
    InvalidCredential,

    #[error("update has no fields to set")]
    EmptyUpdate,

    #[error("storage call timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("credential error: {0}")]
    Credential(String),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Map a unique violation on `users.username` to `DuplicateUsername`.
pub(crate) fn map_unique_username(err: sqlx::Error, username: &str) -> DbError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DbError::DuplicateUsername(username.to_owned())
        }
        _ => DbError::Sqlx(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = DbError::not_found("item", 42);
        assert_eq!(err.to_string(), "not found: item '42'");
        assert!(err.is_not_found());
    }

    #[test]
    fn row_not_found_is_storage_error() {
        let err = map_unique_username(sqlx::Error::RowNotFound, "ada");
        assert!(matches!(err, DbError::Sqlx(_)));
    }
}
