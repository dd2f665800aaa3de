//! List operations for an authenticated user

use std::sync::Arc;

use todoctl_core::{NewList, TodoList, UpdateListInput};

use super::{Deadline, ServiceResult};
use crate::db::repos::ListStore;

#[derive(Clone)]
pub struct ListService {
    repo: Arc<dyn ListStore>,
    deadline: Deadline,
}

impl ListService {
    pub fn new(repo: Arc<dyn ListStore>, deadline: Deadline) -> Self {
        Self { repo, deadline }
    }

    pub async fn create(&self, user_id: i32, list: NewList) -> ServiceResult<i32> {
        let list = list.normalize()?;
        Ok(self.deadline.run(self.repo.create(user_id, list)).await?)
    }

    pub async fn get_all(&self, user_id: i32) -> ServiceResult<Vec<TodoList>> {
        Ok(self.deadline.run(self.repo.get_all(user_id)).await?)
    }

    pub async fn get_by_id(&self, user_id: i32, list_id: i32) -> ServiceResult<TodoList> {
        Ok(self.deadline.run(self.repo.get_by_id(user_id, list_id)).await?)
    }

    pub async fn delete(&self, user_id: i32, list_id: i32) -> ServiceResult<()> {
        Ok(self.deadline.run(self.repo.delete(user_id, list_id)).await?)
    }

    pub async fn update(
        &self,
        user_id: i32,
        list_id: i32,
        input: UpdateListInput,
    ) -> ServiceResult<()> {
        let input = input.normalize()?;
        Ok(self
            .deadline
            .run(self.repo.update(user_id, list_id, input))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{service, sign_up};
    use crate::db::DbError;
    use crate::service::ServiceError;
    use std::time::Duration;
    use todoctl_core::ValidationError;

    #[tokio::test]
    async fn groceries_visible_only_to_owner() {
        let (service, _) = service();
        let a = sign_up(&service, "a").await;
        let b = sign_up(&service, "b").await;

        let id = service
            .lists
            .create(a, NewList::new("Groceries", ""))
            .await
            .unwrap();

        let err = service.lists.get_by_id(b, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(e) if e.is_not_found()));

        let list = service.lists.get_by_id(a, id).await.unwrap();
        assert_eq!(list.title, "Groceries");
    }

    #[tokio::test]
    async fn get_all_is_empty_not_absent() {
        let (service, _) = service();
        let a = sign_up(&service, "a").await;
        assert!(service.lists.get_all(a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_update_fails_before_storage() {
        let (service, store) = service();
        let a = sign_up(&service, "a").await;
        let id = service
            .lists
            .create(a, NewList::new("Chores", ""))
            .await
            .unwrap();
        let calls = store.storage_calls();

        let err = service
            .lists
            .update(a, id, UpdateListInput::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::NoFieldsSet { .. })
        ));
        assert_eq!(store.storage_calls(), calls);
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let (service, _) = service();
        let a = sign_up(&service, "a").await;
        let id = service
            .lists
            .create(a, NewList::new("Chores", "weekly"))
            .await
            .unwrap();

        let input = UpdateListInput {
            description: Some("daily".into()),
            ..Default::default()
        };
        service.lists.update(a, id, input).await.unwrap();

        let list = service.lists.get_by_id(a, id).await.unwrap();
        assert_eq!(list.title, "Chores");
        assert_eq!(list.description, "daily");
    }

    #[tokio::test]
    async fn other_user_cannot_update_or_delete() {
        let (service, _) = service();
        let a = sign_up(&service, "a").await;
        let b = sign_up(&service, "b").await;
        let id = service
            .lists
            .create(a, NewList::new("Mine", ""))
            .await
            .unwrap();

        let input = UpdateListInput {
            title: Some("Theirs".into()),
            ..Default::default()
        };
        let err = service.lists.update(b, id, input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(e) if e.is_not_found()));

        let err = service.lists.delete(b, id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(e) if e.is_not_found()));

        assert_eq!(service.lists.get_by_id(a, id).await.unwrap().title, "Mine");
    }

    #[tokio::test]
    async fn renamed_title_is_trimmed() {
        let (service, _) = service();
        let a = sign_up(&service, "a").await;
        let id = service
            .lists
            .create(a, NewList::new("Chores", ""))
            .await
            .unwrap();

        let input = UpdateListInput {
            title: Some("\tHousework  ".into()),
            ..Default::default()
        };
        service.lists.update(a, id, input).await.unwrap();

        assert_eq!(
            service.lists.get_by_id(a, id).await.unwrap().title,
            "Housework"
        );
    }

    /// Never answers within any reasonable deadline.
    struct StalledLists;

    #[async_trait::async_trait]
    impl ListStore for StalledLists {
        async fn create(&self, _: i32, _: NewList) -> Result<i32, DbError> {
            stall().await
        }
        async fn get_all(&self, _: i32) -> Result<Vec<TodoList>, DbError> {
            stall().await
        }
        async fn get_by_id(&self, _: i32, _: i32) -> Result<TodoList, DbError> {
            stall().await
        }
        async fn delete(&self, _: i32, _: i32) -> Result<(), DbError> {
            stall().await
        }
        async fn update(&self, _: i32, _: i32, _: UpdateListInput) -> Result<(), DbError> {
            stall().await
        }
    }

    async fn stall<T>() -> Result<T, DbError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(DbError::not_found("list", 0))
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_store_times_out() {
        let lists = ListService::new(
            Arc::new(StalledLists),
            Deadline::new(Duration::from_millis(200)),
        );

        let err = lists.get_all(1).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Store(DbError::Timeout { millis: 200 })
        ));
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let (service, store) = service();
        let err = service
            .lists
            .create(1, NewList::new("   ", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(store.storage_calls(), 0);
    }
}
