//! TodoMVC collection synchronization.
//!
//! One ordered todo collection, kept consistent across three controllers that
//! never reference each other:
//!
//! - [`InputController`] turns the new-todo field into items
//! - [`ListController`] projects items into view state and relays per-item intents
//! - [`FilterController`] derives counts and clears completed items
//!
//! Controllers depend on a [`TodoRepository`]. Two wirings provide one:
//!
//! - **Direct**: the [`TodoStore`] itself
//! - **Channel**: a [`ChannelTodoStore`] publishing commands on a hub channel,
//!   served by a [`StoreBridge`] that owns the store
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use todomvc::{TodoApp, TodoConfig, TodoEnvironment, Wiring};
//! use todomvc_testing::InMemoryStorage;
//!
//! # fn main() -> todomvc::Result<()> {
//! let env = TodoEnvironment::new(Rc::new(InMemoryStorage::new()));
//! let app = TodoApp::new(&env, &TodoConfig::default().with_wiring(Wiring::Channel));
//!
//! app.input().set_text("write spec");
//! let item = app.input().submit()?.expect("title is not blank");
//!
//! app.list().toggle_complete(item.id)?;
//! assert_eq!(app.filter().remaining().get(), 0);
//! assert!(app.list().all_completed());
//!
//! app.filter().clear_completed()?;
//! assert_eq!(app.filter().total().get(), 0);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod channel;
pub mod config;
pub mod controllers;
pub mod error;
pub mod messages;
pub mod repository;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use app::{TodoApp, TodoEnvironment};
pub use channel::{BRIDGE_CONTEXT, ChannelTodoStore, StoreBridge};
pub use config::{TodoConfig, Wiring};
pub use controllers::{FilterController, InputController, ListController, ViewItem};
pub use error::{Result, TodoError};
pub use messages::TodoMessage;
pub use repository::TodoRepository;
pub use store::TodoStore;
pub use types::{Filter, TodoCounts, TodoEvent, TodoId, TodoItem, TodoRecord};
