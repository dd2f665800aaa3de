//! To-do lists and their owner edge

use serde::{Deserialize, Serialize};

use super::{Title, ValidationError};

/// A stored to-do list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Owner edge: `user_lists(id, user_id, list_id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    pub id: i32,
    pub user_id: i32,
    pub list_id: i32,
}

/// Input for creating a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewList {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl NewList {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Title is required and must not be blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Title::new(&self.title).map(|_| ())
    }

    /// Validate and return the input with its title trimmed.
    pub fn normalize(self) -> Result<Self, ValidationError> {
        let title = Title::new(&self.title)?.into_string();
        Ok(Self { title, ..self })
    }
}

/// Partial update for a list. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateListInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateListInput {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// At least one field must be set, and a present title must not be blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoFieldsSet {
                fields: "title or description",
            });
        }
        if let Some(title) = &self.title {
            Title::new(title)?;
        }
        Ok(())
    }

    /// Validate and return the update with a present title trimmed.
    pub fn normalize(self) -> Result<Self, ValidationError> {
        self.validate()?;
        let title = self
            .title
            .as_deref()
            .map(Title::new)
            .transpose()?
            .map(Title::into_string);
        Ok(Self { title, ..self })
    }
}
