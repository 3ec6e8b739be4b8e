//! Domain types for the todo collection.
//!
//! A todo list is an ordered collection of items that can be added, edited,
//! completed, and removed. Items are identified by a [`TodoId`] allocated when
//! they enter a store, never by their field values.

use serde::{Deserialize, Serialize};
use std::fmt;
use todomvc_macros::Message;

/// Stable identifier for a todo item within one store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from a raw value
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "todo-{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoItem {
    /// Identifier assigned by the store
    pub id: TodoId,
    /// Title/description of the todo
    pub title: String,
    /// Whether the todo is completed
    pub completed: bool,
}

impl TodoItem {
    /// Creates a new, not yet completed, todo item
    #[must_use]
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }

    /// Returns a copy with `completed` set to `completed`
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Returns a copy with a new title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// The persisted form of this item
    #[must_use]
    pub fn to_record(&self) -> TodoRecord {
        TodoRecord {
            title: self.title.clone(),
            completed: self.completed,
        }
    }
}

/// Persisted form of an item: `{"title": string, "completed": bool}`.
///
/// Ids are not persisted; a store reassigns them in stored order on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    /// Title of the todo
    pub title: String,
    /// Whether the todo is completed
    #[serde(default)]
    pub completed: bool,
}

/// Change notifications emitted by a store after a mutation is persisted
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub enum TodoEvent {
    /// An item was appended
    #[event]
    Added(TodoItem),

    /// An item's title or completed flag was written
    #[event]
    Updated(TodoItem),

    /// An item was removed
    #[event]
    Removed(TodoItem),
}

impl TodoEvent {
    /// The item this event is about
    #[must_use]
    pub const fn item(&self) -> &TodoItem {
        match self {
            Self::Added(item) | Self::Updated(item) | Self::Removed(item) => item,
        }
    }
}

/// Derived aggregates over a collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodoCounts {
    /// Number of items
    pub total: usize,
    /// Number of completed items
    pub completed: usize,
    /// Number of items still to do (`total - completed`)
    pub remaining: usize,
}

impl TodoCounts {
    /// Count a collection
    #[must_use]
    pub fn of(items: &[TodoItem]) -> Self {
        let total = items.len();
        let completed = items.iter().filter(|item| item.completed).count();
        Self {
            total,
            completed,
            remaining: total - completed,
        }
    }
}

/// Which items a list view shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Every item
    #[default]
    All,
    /// Items not yet completed
    Active,
    /// Completed items
    Completed,
}

impl Filter {
    /// Whether an item with this completed flag is shown
    #[must_use]
    pub const fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }

    /// URL fragment selecting this filter
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::All => "#/",
            Self::Active => "#/active",
            Self::Completed => "#/completed",
        }
    }

    /// Parse a URL fragment. Unknown routes select [`Filter::All`].
    #[must_use]
    pub fn from_route(route: &str) -> Self {
        match route.trim_start_matches('#').trim_matches('/') {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use todomvc_core::Message;

    #[test]
    fn todo_id_display() {
        assert_eq!(TodoId::new(7).to_string(), "todo-7");
    }

    #[test]
    fn todo_item_new() {
        let item = TodoItem::new(TodoId::new(1), "Test todo");

        assert_eq!(item.id, TodoId::new(1));
        assert_eq!(item.title, "Test todo");
        assert!(!item.completed);
    }

    #[test]
    fn record_drops_id() {
        let item = TodoItem::new(TodoId::new(3), "Buy milk").with_completed(true);
        assert_eq!(
            item.to_record(),
            TodoRecord {
                title: "Buy milk".to_string(),
                completed: true,
            }
        );
    }

    #[test]
    fn record_defaults_completed() {
        let record: TodoRecord = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert!(!record.completed);
    }

    #[test]
    fn event_names() {
        let item = TodoItem::new(TodoId::new(1), "x");
        assert_eq!(TodoEvent::Added(item.clone()).name(), "added");
        assert_eq!(TodoEvent::Updated(item.clone()).name(), "updated");
        assert_eq!(TodoEvent::Removed(item.clone()).name(), "removed");
        assert!(TodoEvent::Removed(item).is_event());
    }

    #[test]
    fn counts_hold_remaining_invariant() {
        let items = vec![
            TodoItem::new(TodoId::new(1), "a"),
            TodoItem::new(TodoId::new(2), "b").with_completed(true),
            TodoItem::new(TodoId::new(3), "c"),
        ];
        let counts = TodoCounts::of(&items);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.remaining, 2);
        assert_eq!(TodoCounts::of(&[]), TodoCounts::default());
    }

    #[test]
    fn filter_routes() {
        assert_eq!(Filter::from_route("#/active"), Filter::Active);
        assert_eq!(Filter::from_route("#/completed/"), Filter::Completed);
        assert_eq!(Filter::from_route("#/"), Filter::All);
        assert_eq!(Filter::from_route("#/bogus"), Filter::All);
        for filter in [Filter::All, Filter::Active, Filter::Completed] {
            assert_eq!(Filter::from_route(filter.route()), filter);
        }
    }

    #[test]
    fn filter_matches() {
        assert!(Filter::All.matches(true));
        assert!(Filter::Active.matches(false));
        assert!(!Filter::Active.matches(true));
        assert!(Filter::Completed.matches(true));
    }
}
