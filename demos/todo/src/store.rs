//! The authoritative todo collection.
//!
//! [`TodoStore`] owns the ordered list of items, writes the whole list to
//! storage after every mutation, and announces each committed mutation on its
//! own [`EventChannel`].
//!
//! A mutation is applied in three steps:
//!
//! 1. Build the next collection
//! 2. Persist it (a failure returns `Err` and changes nothing)
//! 3. Swap it in, then notify subscribers
//!
//! No borrow is held during step 3, so subscribers may call back into the
//! store. A mutation made from inside a notification is committed at once, but
//! its own notification waits until the current one has reached every
//! subscriber, so all subscribers see notifications in commit order.

use crate::config::TodoConfig;
use crate::error::Result;
use crate::types::{TodoEvent, TodoId, TodoItem, TodoRecord};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use todomvc_core::metrics::{STORAGE_WRITES_TOTAL, STORE_ITEMS, STORE_MUTATIONS_TOTAL, STORE_NOOPS_TOTAL};
use todomvc_core::{EventChannel, KeyValueStorage, SubscriptionId};

struct StoreInner {
    key: String,
    storage: Rc<dyn KeyValueStorage>,
    items: RefCell<Vec<TodoItem>>,
    next_id: Cell<u64>,
    events: EventChannel<TodoEvent>,
    pending: RefCell<VecDeque<TodoEvent>>,
    dispatching: Cell<bool>,
}

/// Shared handle to a todo collection.
///
/// Cloning yields another handle to the same collection.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use todomvc::{TodoConfig, TodoStore};
/// use todomvc_testing::InMemoryStorage;
///
/// # fn main() -> todomvc::Result<()> {
/// let store = TodoStore::open(Rc::new(InMemoryStorage::new()), &TodoConfig::default());
///
/// let item = store.add("Buy milk")?;
/// store.update(&item.clone().with_completed(true))?;
///
/// assert!(store.get(item.id).is_some_and(|item| item.completed));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TodoStore {
    inner: Rc<StoreInner>,
}

impl fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoStore")
            .field("key", &self.inner.key)
            .field("items", &self.inner.items.borrow().len())
            .finish_non_exhaustive()
    }
}

impl TodoStore {
    /// Open the collection persisted under `config.storage_key`.
    ///
    /// Missing, unreadable, or malformed data yields an empty collection.
    #[must_use]
    pub fn open(storage: Rc<dyn KeyValueStorage>, config: &TodoConfig) -> Self {
        let key = config.storage_key.clone();
        let records = load_records(storage.as_ref(), &key);

        let items: Vec<TodoItem> = records
            .into_iter()
            .zip(0_u64..)
            .map(|(record, raw)| TodoItem {
                id: TodoId::new(raw),
                title: record.title,
                completed: record.completed,
            })
            .collect();
        let next_id = items.len() as u64;

        tracing::debug!(key = %key, items = items.len(), "Opened todo store");

        Self {
            inner: Rc::new(StoreInner {
                events: EventChannel::new(format!("store:{key}")),
                key,
                storage,
                items: RefCell::new(items),
                next_id: Cell::new(next_id),
                pending: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
            }),
        }
    }

    /// The storage key this store persists under
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Snapshot of the collection, in display order
    #[must_use]
    pub fn list(&self) -> Vec<TodoItem> {
        self.inner.items.borrow().clone()
    }

    /// The item with this id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<TodoItem> {
        self.inner
            .items
            .borrow()
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// Whether the collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// The channel carrying this store's notifications
    #[must_use]
    pub fn events(&self) -> &EventChannel<TodoEvent> {
        &self.inner.events
    }

    /// Subscribe to every notification
    pub fn subscribe(&self, listener: impl Fn(&TodoEvent) + 'static) -> SubscriptionId {
        self.inner.events.subscribe(listener)
    }

    /// Remove a subscription
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.events.unsubscribe(id)
    }

    /// Append an item with a fresh id.
    ///
    /// The title is stored as given; callers trim and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted. The item is
    /// then not added.
    #[tracing::instrument(skip(self, title), name = "todo_store_add")]
    pub fn add(&self, title: impl Into<String>) -> Result<TodoItem> {
        let id = TodoId::new(self.inner.next_id.get());
        self.inner.next_id.set(id.as_u64() + 1);
        let item = TodoItem::new(id, title);

        let mut next = self.list();
        next.push(item.clone());
        self.commit(next, "add")?;

        tracing::debug!(%id, "Added todo");
        self.emit(TodoEvent::Added(item.clone()));
        Ok(item)
    }

    /// Write `item`'s title and completed flag to the stored item with the same id.
    ///
    /// Returns `false` without touching storage if no stored item has that id.
    /// A write is persisted and announced even if the fields are unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted.
    #[tracing::instrument(skip(self, item), fields(id = %item.id), name = "todo_store_update")]
    pub fn update(&self, item: &TodoItem) -> Result<bool> {
        let mut next = self.list();
        let Some(slot) = next.iter_mut().find(|stored| stored.id == item.id) else {
            tracing::debug!("Update ignored: unknown todo");
            metrics::counter!(STORE_NOOPS_TOTAL, "operation" => "update").increment(1);
            return Ok(false);
        };
        slot.title.clone_from(&item.title);
        slot.completed = item.completed;
        let updated = slot.clone();
        self.commit(next, "update")?;

        self.emit(TodoEvent::Updated(updated));
        Ok(true)
    }

    /// Remove the item with this id.
    ///
    /// Returns `None` without touching storage if no stored item has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted. The item is
    /// then not removed.
    #[tracing::instrument(skip(self), name = "todo_store_remove")]
    pub fn remove(&self, id: TodoId) -> Result<Option<TodoItem>> {
        let mut next = self.list();
        let Some(position) = next.iter().position(|item| item.id == id) else {
            tracing::debug!("Remove ignored: unknown todo");
            metrics::counter!(STORE_NOOPS_TOTAL, "operation" => "remove").increment(1);
            return Ok(None);
        };
        let removed = next.remove(position);
        self.commit(next, "remove")?;

        self.emit(TodoEvent::Removed(removed.clone()));
        Ok(Some(removed))
    }

    /// Remove every completed item, one at a time, in display order.
    ///
    /// Ids are collected before anything is removed, so removals cannot skip
    /// items. Each removal is persisted and announced on its own.
    ///
    /// # Errors
    ///
    /// Stops at the first removal that cannot be persisted; items removed
    /// before it stay removed.
    pub fn clear_completed(&self) -> Result<Vec<TodoItem>> {
        let completed: Vec<TodoId> = self
            .inner
            .items
            .borrow()
            .iter()
            .filter(|item| item.completed)
            .map(|item| item.id)
            .collect();

        let mut removed = Vec::with_capacity(completed.len());
        for id in completed {
            if let Some(item) = self.remove(id)? {
                removed.push(item);
            }
        }
        tracing::debug!(count = removed.len(), "Cleared completed todos");
        Ok(removed)
    }

    #[allow(clippy::cast_precision_loss)]
    fn commit(&self, next: Vec<TodoItem>, operation: &'static str) -> Result<()> {
        if let Err(e) = self.persist(&next) {
            tracing::warn!(operation, error = %e, "Persisting todos failed");
            metrics::counter!(STORAGE_WRITES_TOTAL, "outcome" => "failed").increment(1);
            return Err(e);
        }
        metrics::counter!(STORAGE_WRITES_TOTAL, "outcome" => "ok").increment(1);
        metrics::counter!(STORE_MUTATIONS_TOTAL, "operation" => operation).increment(1);
        metrics::gauge!(STORE_ITEMS).set(next.len() as f64);

        *self.inner.items.borrow_mut() = next;
        Ok(())
    }

    /// Queue `event` and, unless a dispatch is already running, deliver the
    /// queue in order
    fn emit(&self, event: TodoEvent) {
        self.inner.pending.borrow_mut().push_back(event);
        if self.inner.dispatching.replace(true) {
            tracing::trace!("Notification queued behind the current dispatch");
            return;
        }

        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(event) = next else { break };
            self.inner.events.publish(event);
        }
        self.inner.dispatching.set(false);
    }

    fn persist(&self, items: &[TodoItem]) -> Result<()> {
        let records: Vec<TodoRecord> = items.iter().map(TodoItem::to_record).collect();
        let encoded = serde_json::to_string(&records)?;
        self.inner.storage.set_item(&self.inner.key, &encoded)?;
        Ok(())
    }
}

fn load_records(storage: &dyn KeyValueStorage, key: &str) -> Vec<TodoRecord> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Could not read persisted todos, starting empty");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "Discarding malformed persisted todos");
        Vec::new()
    })
}
