//! Credential hashing and bearer tokens

pub mod password;
pub mod token;

pub use password::{Argon2Hasher, CredentialError, CredentialHasher};
pub use token::{TokenError, TokenIssuer};
