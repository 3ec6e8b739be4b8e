//! # TodoMVC Core
//!
//! Building blocks for keeping one mutable collection consistent across
//! several loosely coupled observers.
//!
//! ## Core Concepts
//!
//! - **Message**: A closed enum of things that can travel over a channel
//! - **EventChannel**: Synchronous, same-thread publish/subscribe with explicit handles
//! - **EventHub**: Named, independent channels shared by every component of an app
//! - **Observable**: A single value a rendering layer can bind to
//! - **KeyValueStorage**: The synchronous persistence boundary
//!
//! ## Architecture Principles
//!
//! - Single-threaded: `Rc` and `RefCell`, no locks
//! - Delivery in subscription order, fully drained before `publish` returns
//! - Subscriber lists are snapshotted, so listeners may re-enter freely
//! - Dependencies are passed in, never looked up by name
//!
//! ## Example
//!
//! ```ignore
//! use todomvc_core::event_bus::EventHub;
//!
//! let hub = EventHub::<TodoMessage>::new();
//! let channel = hub.channel("todos");
//!
//! let id = channel.on("todo-added", |message| {
//!     println!("added: {message:?}");
//! });
//!
//! channel.publish(TodoMessage::TodoAdded { item });
//! channel.unsubscribe(id);
//! ```

pub mod event_bus;
pub mod message;
pub mod metrics;
pub mod observable;
pub mod storage;

// Re-export commonly used types
pub use event_bus::{Context, EventChannel, EventHub, SubscriptionId};
pub use message::Message;
pub use observable::Observable;
pub use storage::{FileStorage, KeyValueStorage, StorageError};
