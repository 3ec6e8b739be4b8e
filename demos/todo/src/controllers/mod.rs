//! Controllers mediating between user intents, view state, and the store.
//!
//! Each controller depends only on a [`TodoRepository`](crate::TodoRepository)
//! and exposes [`Observable`](todomvc_core::Observable) fields a rendering
//! layer binds to. Controllers unsubscribe from the repository when dropped.

pub mod filter;
pub mod input;
pub mod list;

pub use filter::FilterController;
pub use input::InputController;
pub use list::{ListController, ViewItem};
