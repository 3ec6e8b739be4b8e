//! Messages carried on the shared todo channel.
//!
//! In the channel-mediated wiring, controllers never hold the store. They
//! publish commands here, and a [`StoreBridge`](crate::channel::StoreBridge)
//! answers with events.

use crate::types::{TodoEvent, TodoId, TodoItem};
use todomvc_macros::Message;

/// Commands and events exchanged over the todo channel
///
/// This enum combines both commands (requests to the store owner) and events
/// (facts the store owner announces after persisting a change).
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub enum TodoMessage {
    // ========== Commands ==========
    /// Command: Ask the store owner for the current collection
    #[command]
    SyncRequested,

    /// Command: Append a new item
    #[command]
    AddTodo {
        /// Title, already trimmed by the caller
        title: String,
    },

    /// Command: Write an item's title and completed flag
    #[command]
    UpdateTodo {
        /// Item carrying the new field values
        item: TodoItem,
    },

    /// Command: Remove an item
    #[command]
    RemoveTodo {
        /// Item to remove
        id: TodoId,
    },

    /// Command: Remove every completed item
    #[command]
    ClearCompleted,

    // ========== Events ==========
    /// Event: Reply to `SyncRequested`
    #[event]
    Synced {
        /// The whole collection, in display order
        items: Vec<TodoItem>,
    },

    /// Event: An item was appended
    #[event]
    TodoAdded {
        /// The new item
        item: TodoItem,
    },

    /// Event: An item was written
    #[event]
    TodoUpdated {
        /// The item after the write
        item: TodoItem,
    },

    /// Event: An item was removed
    #[event]
    TodoRemoved {
        /// The removed item
        item: TodoItem,
    },

    /// Event: The store owner finished handling a command
    ///
    /// Sent after the events the command caused, so it is always the last
    /// reply to a command that succeeded.
    #[event]
    CommandHandled {
        /// Name of the handled command
        command: &'static str,
        /// Items the command added, wrote, or removed
        items: Vec<TodoItem>,
    },

    /// Event: A command could not be persisted
    #[event]
    PersistenceFailed {
        /// Name of the failed command
        command: &'static str,
        /// Display form of the underlying error
        reason: String,
    },
}

impl From<TodoEvent> for TodoMessage {
    fn from(event: TodoEvent) -> Self {
        match event {
            TodoEvent::Added(item) => Self::TodoAdded { item },
            TodoEvent::Updated(item) => Self::TodoUpdated { item },
            TodoEvent::Removed(item) => Self::TodoRemoved { item },
        }
    }
}

impl TodoMessage {
    /// The store notification this message carries, if any
    #[must_use]
    pub fn as_todo_event(&self) -> Option<TodoEvent> {
        match self {
            Self::TodoAdded { item } => Some(TodoEvent::Added(item.clone())),
            Self::TodoUpdated { item } => Some(TodoEvent::Updated(item.clone())),
            Self::TodoRemoved { item } => Some(TodoEvent::Removed(item.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todomvc_core::Message;

    #[test]
    fn todo_message_is_command() {
        let message = TodoMessage::AddTodo {
            title: "Test".to_string(),
        };
        assert!(message.is_command());
        assert!(!message.is_event());
        assert_eq!(message.name(), "add-todo");
    }

    #[test]
    fn todo_message_is_event() {
        let message = TodoMessage::TodoAdded {
            item: TodoItem::new(TodoId::new(1), "Test"),
        };
        assert!(message.is_event());
        assert!(!message.is_command());
        assert_eq!(message.name(), "todo-added");
    }

    #[test]
    fn store_events_round_trip_through_messages() {
        let item = TodoItem::new(TodoId::new(4), "Write docs");
        for event in [
            TodoEvent::Added(item.clone()),
            TodoEvent::Updated(item.clone()),
            TodoEvent::Removed(item.clone()),
        ] {
            let message = TodoMessage::from(event.clone());
            assert_eq!(message.as_todo_event(), Some(event));
        }
        assert_eq!(TodoMessage::ClearCompleted.as_todo_event(), None);
    }

    #[test]
    fn acknowledgement_is_an_event() {
        let message = TodoMessage::CommandHandled {
            command: "clear-completed",
            items: Vec::new(),
        };
        assert!(message.is_event());
        assert_eq!(message.name(), "command-handled");
        assert_eq!(message.as_todo_event(), None);
    }
}
