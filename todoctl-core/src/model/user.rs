//! Users and sign-in credentials

use serde::{Deserialize, Serialize};

use super::validation::check_text;
use super::ValidationError;

/// Maximum length for display names and usernames
const MAX_NAME_LEN: usize = 64;

/// A stored user. `password_hash` is an opaque PHC string and never leaves
/// the server in a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Sign-up payload carrying the raw password
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("name", &self.name, MAX_NAME_LEN)?;
        check_text("username", &self.username, MAX_NAME_LEN)?;
        if self.password.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        Ok(())
    }
}

/// Sign-in payload
#[derive(Debug, Clone, Deserialize)]
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

impl SignInInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }
        if self.password.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        Ok(())
    }
}
