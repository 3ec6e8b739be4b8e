//! The interface controllers depend on.
//!
//! Controllers never know whether they are talking to a [`TodoStore`] directly
//! or to a [`ChannelTodoStore`](crate::channel::ChannelTodoStore) that relays
//! every request over a shared channel. Both implement [`TodoRepository`].

use crate::error::Result;
use crate::store::TodoStore;
use crate::types::{TodoEvent, TodoId, TodoItem};
use todomvc_core::SubscriptionId;

/// A todo collection as seen by a controller
pub trait TodoRepository {
    /// Snapshot of the collection, in display order
    fn items(&self) -> Vec<TodoItem>;

    /// Append an item titled `title`.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted.
    fn add(&self, title: &str) -> Result<TodoItem>;

    /// Write `item`'s fields to the stored item with the same id.
    ///
    /// Returns `false` if no such item exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted.
    fn update(&self, item: &TodoItem) -> Result<bool>;

    /// Remove the item with this id, returning it if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted.
    fn remove(&self, id: TodoId) -> Result<Option<TodoItem>>;

    /// Register for change notifications
    fn subscribe(&self, listener: Box<dyn Fn(&TodoEvent)>) -> SubscriptionId;

    /// Remove a registration. Returns `false` if the id is unknown.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// The item with this id
    fn get(&self, id: TodoId) -> Option<TodoItem> {
        self.items().into_iter().find(|item| item.id == id)
    }

    /// Remove every completed item, returning the removed items.
    ///
    /// # Errors
    ///
    /// Stops at the first removal that cannot be persisted.
    fn clear_completed(&self) -> Result<Vec<TodoItem>> {
        let completed: Vec<TodoId> = self
            .items()
            .iter()
            .filter(|item| item.completed)
            .map(|item| item.id)
            .collect();

        let mut removed = Vec::with_capacity(completed.len());
        for id in completed {
            removed.extend(self.remove(id)?);
        }
        Ok(removed)
    }
}

impl TodoRepository for TodoStore {
    fn items(&self) -> Vec<TodoItem> {
        self.list()
    }

    fn add(&self, title: &str) -> Result<TodoItem> {
        Self::add(self, title)
    }

    fn update(&self, item: &TodoItem) -> Result<bool> {
        Self::update(self, item)
    }

    fn remove(&self, id: TodoId) -> Result<Option<TodoItem>> {
        Self::remove(self, id)
    }

    fn subscribe(&self, listener: Box<dyn Fn(&TodoEvent)>) -> SubscriptionId {
        self.events().subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events().unsubscribe(id)
    }

    fn get(&self, id: TodoId) -> Option<TodoItem> {
        Self::get(self, id)
    }

    fn clear_completed(&self) -> Result<Vec<TodoItem>> {
        Self::clear_completed(self)
    }
}
