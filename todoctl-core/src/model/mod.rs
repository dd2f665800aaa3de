//! Domain models with validation at construction
//!
//! Entities (`User`, `TodoList`, `TodoItem`) mirror table rows. Inputs
//! (`NewList`, `UpdateItemInput`, ...) are what callers hand in; each has a
//! `validate()` that runs before anything reaches storage.

pub mod item;
pub mod list;
pub mod title;
pub mod user;
pub mod validation;

pub use item::{ListItem, NewItem, TodoItem, UpdateItemInput};
pub use list::{NewList, TodoList, UpdateListInput, UserList};
pub use title::Title;
pub use user::{NewUser, SignInInput, User};
pub use validation::ValidationError;
