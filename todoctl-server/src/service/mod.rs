//! Service layer
//!
//! Thin: validates payloads before any storage call, applies the per-call
//! deadline, and otherwise passes storage results through unchanged.

pub mod auth;
pub mod items;
pub mod lists;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use todoctl_core::ValidationError;

use crate::auth::{CredentialHasher, TokenError, TokenIssuer};
use crate::db::{DbError, Repository};

pub use auth::AuthService;
pub use items::ItemService;
pub use lists::ListService;

/// Errors surfaced by the service layer
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] DbError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Upper bound on a single storage call
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Duration);

impl Deadline {
    pub fn new(limit: Duration) -> Self {
        Self(limit)
    }

    /// The limit in whole milliseconds, saturating at `u64::MAX`.
    pub fn millis(self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }

    /// Run a storage call, dropping it if it outlives the deadline.
    ///
    /// Dropping the future releases its pooled connection; an open
    /// transaction is rolled back when its handle is dropped.
    pub async fn run<T, F>(self, call: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        match tokio::time::timeout(self.0, call).await {
            Ok(result) => result,
            Err(_) => Err(DbError::Timeout {
                millis: self.millis(),
            }),
        }
    }
}

/// Everything the HTTP layer calls
#[derive(Clone)]
pub struct Service {
    pub auth: AuthService,
    pub lists: ListService,
    pub items: ItemService,
}

impl Service {
    pub fn new(
        repo: Repository,
        hasher: Arc<dyn CredentialHasher>,
        tokens: TokenIssuer,
        deadline: Deadline,
    ) -> Self {
        Self {
            auth: AuthService::new(repo.auth.clone(), hasher, tokens, deadline),
            lists: ListService::new(repo.lists.clone(), deadline),
            items: ItemService::new(repo.items, repo.lists, deadline),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::auth::Argon2Hasher;
    use crate::db::MemoryStore;
    use todoctl_core::NewUser;

    pub fn service() -> (Service, Arc<MemoryStore>) {
        let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher);
        let store = Arc::new(MemoryStore::new(hasher.clone()));
        let service = Service::new(
            Repository::memory(store.clone()),
            hasher,
            TokenIssuer::new("test-secret", Duration::from_secs(60)),
            Deadline::new(Duration::from_secs(5)),
        );
        (service, store)
    }

    pub async fn sign_up(service: &Service, username: &str) -> i32 {
        service
            .auth
            .sign_up(NewUser {
                name: username.to_string(),
                username: username.to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn deadline_expiry_is_timeout() {
        let deadline = Deadline::new(Duration::from_millis(50));
        let err = deadline
            .run(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, DbError>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Timeout { millis: 50 }));
    }

    #[tokio::test]
    async fn deadline_passes_results_through() {
        let deadline = Deadline::new(Duration::from_secs(1));
        let err = deadline
            .run(async { Err::<(), _>(DbError::not_found("item", 1)) })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unbounded_deadline_reports_saturated_millis() {
        let deadline = Deadline::new(Duration::MAX);
        assert_eq!(deadline.millis(), u64::MAX);
        assert_eq!(Deadline::new(Duration::from_micros(2_500)).millis(), 2);

        let value = deadline.run(async { Ok::<_, DbError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }
}
