//! Sign-up and sign-in

use std::sync::Arc;

use todoctl_core::{NewUser, SignInInput, User};

use super::{Deadline, ServiceResult};
use crate::auth::{CredentialHasher, TokenIssuer};
use crate::db::repos::Authorization;
use crate::db::DbError;

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn Authorization>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: TokenIssuer,
    deadline: Deadline,
}

impl AuthService {
    pub fn new(
        repo: Arc<dyn Authorization>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: TokenIssuer,
        deadline: Deadline,
    ) -> Self {
        Self {
            repo,
            hasher,
            tokens,
            deadline,
        }
    }

    /// Hash the password and store the user. Returns the new user id.
    pub async fn sign_up(&self, input: NewUser) -> ServiceResult<i32> {
        input.validate()?;

        let password_hash = self.hasher.hash(&input.password).map_err(DbError::from)?;
        let user = User {
            id: 0,
            name: input.name,
            username: input.username,
            password_hash,
        };

        let id = self.deadline.run(self.repo.create_user(user)).await?;
        tracing::info!(user_id = id, "user signed up");
        Ok(id)
    }

    /// Check credentials and return a bearer token.
    pub async fn sign_in(&self, input: SignInInput) -> ServiceResult<String> {
        input.validate()?;

        let user = self
            .deadline
            .run(self.repo.get_user(&input.username, &input.password))
            .await?;

        Ok(self.tokens.issue(user.id)?)
    }

    /// Resolve a bearer token to a user id.
    pub fn parse_token(&self, token: &str) -> ServiceResult<i32> {
        Ok(self.tokens.verify(token)?)
    }
}
