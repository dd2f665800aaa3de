//! Item operations for an authenticated user

use std::sync::Arc;

use todoctl_core::{NewItem, TodoItem, UpdateItemInput};

use super::{Deadline, ServiceResult};
use crate::db::repos::{ItemStore, ListStore};

#[derive(Clone)]
pub struct ItemService {
    repo: Arc<dyn ItemStore>,
    lists: Arc<dyn ListStore>,
    deadline: Deadline,
}

impl ItemService {
    pub fn new(repo: Arc<dyn ItemStore>, lists: Arc<dyn ListStore>, deadline: Deadline) -> Self {
        Self {
            repo,
            lists,
            deadline,
        }
    }

    /// Create an item in a list the user owns.
    ///
    /// The item store only knows list ids, so ownership is confirmed first;
    /// a list owned by someone else is reported as not found.
    pub async fn create(&self, user_id: i32, list_id: i32, item: NewItem) -> ServiceResult<i32> {
        let item = item.normalize()?;
        self.deadline
            .run(self.lists.get_by_id(user_id, list_id))
            .await?;
        Ok(self.deadline.run(self.repo.create(list_id, item)).await?)
    }

    pub async fn get_all(&self, user_id: i32, list_id: i32) -> ServiceResult<Vec<TodoItem>> {
        Ok(self.deadline.run(self.repo.get_all(user_id, list_id)).await?)
    }

    pub async fn get_by_id(&self, user_id: i32, item_id: i32) -> ServiceResult<TodoItem> {
        Ok(self.deadline.run(self.repo.get_by_id(user_id, item_id)).await?)
    }

    pub async fn delete(&self, user_id: i32, item_id: i32) -> ServiceResult<()> {
        Ok(self.deadline.run(self.repo.delete(user_id, item_id)).await?)
    }

    pub async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        input: UpdateItemInput,
    ) -> ServiceResult<()> {
        let input = input.normalize()?;
        Ok(self
            .deadline
            .run(self.repo.update(user_id, item_id, input))
            .await?)
    }
}
