//! The [`Message`] trait shared by every channel payload.
//!
//! Messages replace ad hoc event-name strings: each channel carries one
//! closed enum, and every variant has a stable kebab-case name that
//! subscribers can filter on. The name is generated by
//! `#[derive(Message)]` from `todomvc-macros`.

use std::fmt::Debug;

/// A value that can be published on an [`EventChannel`](crate::EventChannel).
///
/// # Example
///
/// ```ignore
/// #[derive(Message, Clone, Debug)]
/// enum TodoMessage {
///     #[command]
///     AddTodo { title: String },
///
///     #[event]
///     TodoAdded { item: TodoItem },
/// }
///
/// assert_eq!(TodoMessage::AddTodo { title: "x".into() }.name(), "add-todo");
/// ```
pub trait Message: Clone + Debug + 'static {
    /// Stable name of this message's variant (e.g. `"todo-added"`)
    fn name(&self) -> &'static str;
}
