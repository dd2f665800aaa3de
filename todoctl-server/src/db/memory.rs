//! In-memory storage engine
//!
//! Implements the same capabilities as the PostgreSQL repositories, with the
//! same ownership rules and foreign-key checks. Used by tests and for running
//! the server without a database (`todoctl serve --memory`).
//!
//! Writes run against a copy of the tables that replaces the live tables only
//! when the whole operation succeeds, so multi-step writes are atomic here
//! too. The lock is never held across an `.await`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use todoctl_core::{
    ListItem, NewItem, NewList, TodoItem, TodoList, UpdateItemInput, UpdateListInput, User,
    UserList,
};

use super::repos::{Authorization, ItemStore, ListStore};
use super::DbError;
use crate::auth::CredentialHasher;

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    lists: BTreeMap<i32, TodoList>,
    items: BTreeMap<i32, TodoItem>,
    user_lists: Vec<UserList>,
    list_items: Vec<ListItem>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn owns_list(&self, user_id: i32, list_id: i32) -> bool {
        self.user_lists
            .iter()
            .any(|e| e.user_id == user_id && e.list_id == list_id)
    }

    /// The list an item belongs to, if `user_id` owns that list.
    fn owned_item_list(&self, user_id: i32, item_id: i32) -> Option<i32> {
        self.list_items
            .iter()
            .find(|e| e.item_id == item_id)
            .map(|e| e.list_id)
            .filter(|list_id| self.owns_list(user_id, *list_id))
    }

    fn foreign_key(table: &str, column: &str) -> DbError {
        DbError::Sqlx(sqlx::Error::Protocol(format!(
            "insert on {} violates foreign key on {}",
            table, column
        )))
    }
}

/// Storage engine backed by process memory
pub struct MemoryStore {
    tables: Mutex<Tables>,
    hasher: Arc<dyn CredentialHasher>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            hasher,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of capability calls that reached this store.
    pub fn storage_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn item_count(&self) -> usize {
        self.lock().items.len()
    }

    pub fn list_item_count(&self) -> usize {
        self.lock().list_items.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock leaves the tables as they were
        // before the write, since writes go through `write`.
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> Result<T, DbError>) -> Result<T, DbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        f(&self.lock())
    }

    /// Apply `f` to a copy of the tables and keep the copy only on success.
    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T, DbError>) -> Result<T, DbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut live = self.lock();
        let mut staged = live.clone();
        let out = f(&mut staged)?;
        *live = staged;
        Ok(out)
    }
}

#[async_trait]
impl Authorization for MemoryStore {
    async fn create_user(&self, user: User) -> Result<i32, DbError> {
        self.write(|t| {
            if t.users.values().any(|u| u.username == user.username) {
                return Err(DbError::DuplicateUsername(user.username));
            }
            let id = t.next_id();
            t.users.insert(id, User { id, ..user });
            Ok(id)
        })
    }

    async fn get_user(&self, username: &str, password: &str) -> Result<User, DbError> {
        let user = self.read(|t| {
            t.users
                .values()
                .find(|u| u.username == username)
                .cloned()
                .ok_or_else(|| DbError::not_found("user", username))
        })?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(DbError::InvalidCredential);
        }
        Ok(user)
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn create(&self, user_id: i32, list: NewList) -> Result<i32, DbError> {
        self.write(|t| {
            let list_id = t.next_id();
            t.lists.insert(
                list_id,
                TodoList {
                    id: list_id,
                    title: list.title,
                    description: list.description,
                },
            );

            if !t.users.contains_key(&user_id) {
                return Err(Tables::foreign_key("user_lists", "user_id"));
            }
            let id = t.next_id();
            t.user_lists.push(UserList {
                id,
                user_id,
                list_id,
            });
            Ok(list_id)
        })
    }

    async fn get_all(&self, user_id: i32) -> Result<Vec<TodoList>, DbError> {
        self.read(|t| {
            Ok(t.lists
                .values()
                .filter(|l| t.owns_list(user_id, l.id))
                .cloned()
                .collect())
        })
    }

    async fn get_by_id(&self, user_id: i32, list_id: i32) -> Result<TodoList, DbError> {
        self.read(|t| {
            t.lists
                .get(&list_id)
                .filter(|_| t.owns_list(user_id, list_id))
                .cloned()
                .ok_or_else(|| DbError::not_found("list", list_id))
        })
    }

    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), DbError> {
        self.write(|t| {
            if !t.owns_list(user_id, list_id) {
                return Err(DbError::not_found("list", list_id));
            }

            let item_ids: Vec<i32> = t
                .list_items
                .iter()
                .filter(|e| e.list_id == list_id)
                .map(|e| e.item_id)
                .collect();
            for item_id in &item_ids {
                t.items.remove(item_id);
            }

            t.list_items.retain(|e| e.list_id != list_id);
            t.user_lists.retain(|e| e.list_id != list_id);
            t.lists.remove(&list_id);
            Ok(())
        })
    }

    async fn update(
        &self,
        user_id: i32,
        list_id: i32,
        input: UpdateListInput,
    ) -> Result<(), DbError> {
        if input.is_empty() {
            return Err(DbError::EmptyUpdate);
        }
        self.write(|t| {
            let owned = t.owns_list(user_id, list_id);
            let list = t
                .lists
                .get_mut(&list_id)
                .filter(|_| owned)
                .ok_or_else(|| DbError::not_found("list", list_id))?;

            if let Some(title) = input.title {
                list.title = title;
            }
            if let Some(description) = input.description {
                list.description = description;
            }
            Ok(())
        })
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn create(&self, list_id: i32, item: NewItem) -> Result<i32, DbError> {
        self.write(|t| {
            let item_id = t.next_id();
            t.items.insert(
                item_id,
                TodoItem {
                    id: item_id,
                    title: item.title,
                    description: item.description,
                    done: false,
                },
            );

            if !t.lists.contains_key(&list_id) {
                return Err(Tables::foreign_key("list_items", "list_id"));
            }
            let id = t.next_id();
            t.list_items.push(ListItem {
                id,
                list_id,
                item_id,
            });
            Ok(item_id)
        })
    }

    async fn get_all(&self, user_id: i32, list_id: i32) -> Result<Vec<TodoItem>, DbError> {
        self.read(|t| {
            if !t.owns_list(user_id, list_id) {
                return Ok(Vec::new());
            }
            Ok(t.list_items
                .iter()
                .filter(|e| e.list_id == list_id)
                .filter_map(|e| t.items.get(&e.item_id).cloned())
                .collect())
        })
    }

    async fn get_by_id(&self, user_id: i32, item_id: i32) -> Result<TodoItem, DbError> {
        self.read(|t| {
            t.owned_item_list(user_id, item_id)
                .and_then(|_| t.items.get(&item_id).cloned())
                .ok_or_else(|| DbError::not_found("item", item_id))
        })
    }

    async fn delete(&self, user_id: i32, item_id: i32) -> Result<(), DbError> {
        self.write(|t| {
            t.owned_item_list(user_id, item_id)
                .ok_or_else(|| DbError::not_found("item", item_id))?;
            t.items.remove(&item_id);
            t.list_items.retain(|e| e.item_id != item_id);
            Ok(())
        })
    }

    async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        input: UpdateItemInput,
    ) -> Result<(), DbError> {
        if input.is_empty() {
            return Err(DbError::EmptyUpdate);
        }
        self.write(|t| {
            let owned = t.owned_item_list(user_id, item_id).is_some();
            let item = t
                .items
                .get_mut(&item_id)
                .filter(|_| owned)
                .ok_or_else(|| DbError::not_found("item", item_id))?;

            if let Some(title) = input.title {
                item.title = title;
            }
            if let Some(description) = input.description {
                item.description = description;
            }
            if let Some(done) = input.done {
                item.done = done;
            }
            Ok(())
        })
    }
}
