//! todoctl-core: entity model and configuration shared by the todoctl crates
//!
//! Nothing in here touches the database. Payload validation lives next to
//! the payload types so every layer above can fail fast without a round trip.

pub mod config;
pub mod error;
pub mod model;

pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use model::{
    ListItem, NewItem, NewList, NewUser, SignInInput, Title, TodoItem, TodoList, UpdateItemInput,
    UpdateListInput, User, UserList, ValidationError,
};
