//! Database connection pool management
//!
//! The pool is the only resource shared between requests. It is built once
//! from the `[database]` config section and handed to each repository
//! constructor; there is no global.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use todoctl_core::config::DatabaseSection;

/// Pool settings derived from the `[database]` section.
pub fn pool_options(db: &DatabaseSection) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(Duration::from_millis(db.acquire_timeout_ms))
}

/// Connect a PostgreSQL pool for the configured database.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established within
/// the acquire timeout.
pub async fn create_pool(db: &DatabaseSection) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        max_connections = db.max_connections,
        acquire_timeout_ms = db.acquire_timeout_ms,
        "connecting database pool"
    );
    pool_options(db).connect(&db.url).await
}

/// Pool for the ignored database-backed tests, from `DATABASE_URL`.
#[cfg(test)]
pub(crate) async fn test_pool() -> PgPool {
    let db = DatabaseSection {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL required"),
        ..DatabaseSection::default()
    };
    create_pool(&db).await.expect("pool creation failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config() {
        let db = DatabaseSection {
            max_connections: 12,
            acquire_timeout_ms: 750,
            ..DatabaseSection::default()
        };
        let options = pool_options(&db);
        assert_eq!(options.get_max_connections(), 12);
        assert_eq!(options.get_acquire_timeout(), Duration::from_millis(750));
    }

    // Run with: DATABASE_URL=postgres://... cargo test -p todoctl-server -- --ignored
    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let pool = test_pool().await;

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
