//! Channel-mediated wiring.
//!
//! In this wiring, controllers never hold the store. Instead:
//!
//! - A [`StoreBridge`] owns the [`TodoStore`]. It executes command messages
//!   published on a hub channel and republishes the store's notifications as
//!   event messages.
//! - A [`ChannelTodoStore`] implements [`TodoRepository`] by publishing
//!   commands and mirroring the events it receives.
//!
//! Dispatch is synchronous, so by the time `publish` returns the bridge has
//! answered every command with either `CommandHandled` or `PersistenceFailed`.
//! The adapter turns a failure into an `Err` for its caller, and treats a
//! command nobody answered as sent to a channel with no store.
//!
//! ```text
//! ListController ──► ChannelTodoStore ──AddTodo──► channel ──► StoreBridge ──► TodoStore
//!                         ▲                                        │
//!                         └───────────── TodoAdded ◄── channel ◄───┘
//! ```

use crate::error::{Result, TodoError};
use crate::messages::TodoMessage;
use crate::repository::TodoRepository;
use crate::store::TodoStore;
use crate::types::{TodoEvent, TodoId, TodoItem};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use todomvc_core::{Context, EventChannel, Message, SubscriptionId};

/// Context the bridge subscribes and publishes under, so it never receives
/// its own events
pub const BRIDGE_CONTEXT: Context = Context::new("store-bridge");

/// Serves a [`TodoStore`] over a channel.
///
/// Dropping the bridge detaches it from both the store and the channel.
pub struct StoreBridge {
    store: TodoStore,
    channel: EventChannel<TodoMessage>,
    commands: SubscriptionId,
    forwarding: SubscriptionId,
}

impl fmt::Debug for StoreBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreBridge")
            .field("channel", &self.channel.name())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl StoreBridge {
    /// Start serving `store` on `channel`
    #[must_use]
    pub fn attach(store: TodoStore, channel: &EventChannel<TodoMessage>) -> Self {
        let outbound = channel.clone();
        let forwarding = store.subscribe(move |event: &TodoEvent| {
            outbound.publish_from(BRIDGE_CONTEXT, TodoMessage::from(event.clone()));
        });

        let handler_store = store.clone();
        let replies = channel.clone();
        let commands = channel.subscribe_in(BRIDGE_CONTEXT, move |message: &TodoMessage| {
            execute(&handler_store, &replies, message);
        });

        tracing::debug!(channel = channel.name(), "Store bridge attached");

        Self {
            store,
            channel: channel.clone(),
            commands,
            forwarding,
        }
    }

    /// The store being served
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }
}

impl Drop for StoreBridge {
    fn drop(&mut self) {
        self.channel.unsubscribe(self.commands);
        self.store.unsubscribe(self.forwarding);
        tracing::debug!(channel = self.channel.name(), "Store bridge detached");
    }
}

fn execute(store: &TodoStore, channel: &EventChannel<TodoMessage>, message: &TodoMessage) {
    let outcome = match message {
        TodoMessage::SyncRequested => {
            channel.publish_from(BRIDGE_CONTEXT, TodoMessage::Synced { items: store.list() });
            return;
        }
        TodoMessage::AddTodo { title } => store.add(title.as_str()).map(|item| vec![item]),
        TodoMessage::UpdateTodo { item } => store
            .update(item)
            .map(|written| if written { vec![item.clone()] } else { Vec::new() }),
        TodoMessage::RemoveTodo { id } => store
            .remove(*id)
            .map(|removed| removed.into_iter().collect()),
        TodoMessage::ClearCompleted => store.clear_completed(),
        _ => return,
    };

    let reply = match outcome {
        Ok(items) => TodoMessage::CommandHandled {
            command: message.name(),
            items,
        },
        Err(e) => {
            tracing::error!(command = message.name(), error = %e, "Todo command failed");
            TodoMessage::PersistenceFailed {
                command: message.name(),
                reason: e.to_string(),
            }
        }
    };
    channel.publish_from(BRIDGE_CONTEXT, reply);
}

/// How the bridge answered a request
enum Reply {
    Handled(Vec<TodoItem>),
    Failed {
        command: &'static str,
        reason: String,
    },
}

struct AdapterInner {
    channel: EventChannel<TodoMessage>,
    mirror: RefCell<Vec<TodoItem>>,
    events: EventChannel<TodoEvent>,
    // One slot per request in flight; the last reply received fills it
    frames: RefCell<Vec<Option<Reply>>>,
    subscriptions: RefCell<Vec<SubscriptionId>>,
}

impl AdapterInner {
    fn receive(&self, message: &TodoMessage) {
        match message {
            TodoMessage::Synced { items } => {
                self.mirror.borrow_mut().clone_from(items);
                tracing::trace!(items = items.len(), "Mirror synced");
            }
            TodoMessage::CommandHandled { items, .. } => {
                self.answer(Reply::Handled(items.clone()));
            }
            TodoMessage::PersistenceFailed { command, reason } => {
                self.answer(Reply::Failed {
                    command: *command,
                    reason: reason.clone(),
                });
            }
            other => {
                if let Some(event) = other.as_todo_event() {
                    self.apply(&event);
                    self.events.publish(event);
                }
            }
        }
    }

    fn answer(&self, reply: Reply) {
        if let Some(frame) = self.frames.borrow_mut().last_mut() {
            *frame = Some(reply);
        }
    }

    fn apply(&self, event: &TodoEvent) {
        let mut mirror = self.mirror.borrow_mut();
        match event {
            TodoEvent::Added(item) => {
                if mirror.iter().all(|existing| existing.id != item.id) {
                    mirror.push(item.clone());
                }
            }
            TodoEvent::Updated(item) => {
                if let Some(existing) = mirror.iter_mut().find(|existing| existing.id == item.id) {
                    existing.clone_from(item);
                }
            }
            TodoEvent::Removed(item) => mirror.retain(|existing| existing.id != item.id),
        }
    }
}

impl Drop for AdapterInner {
    fn drop(&mut self) {
        for id in self.subscriptions.get_mut().drain(..) {
            self.channel.unsubscribe(id);
        }
    }
}

/// A [`TodoRepository`] that reaches its store only through a channel.
///
/// Reads are served from a mirror kept current by the events the bridge
/// publishes. Every write is a command; the call returns once the bridge has
/// answered.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use todomvc::{ChannelTodoStore, StoreBridge, TodoConfig, TodoRepository, TodoStore};
/// use todomvc_core::EventHub;
/// use todomvc_testing::InMemoryStorage;
///
/// # fn main() -> todomvc::Result<()> {
/// let hub = EventHub::new();
/// let channel = hub.channel("todos");
/// let store = TodoStore::open(Rc::new(InMemoryStorage::new()), &TodoConfig::default());
///
/// let _bridge = StoreBridge::attach(store.clone(), &channel);
/// let remote = ChannelTodoStore::connect(&channel);
///
/// remote.add("Buy milk")?;
/// assert_eq!(store.len(), 1);
/// assert_eq!(remote.items(), store.list());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ChannelTodoStore {
    inner: Rc<AdapterInner>,
}

impl fmt::Debug for ChannelTodoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelTodoStore")
            .field("channel", &self.inner.channel.name())
            .field("items", &self.inner.mirror.borrow().len())
            .finish_non_exhaustive()
    }
}

impl ChannelTodoStore {
    const REPLIES: [&'static str; 6] = [
        "synced",
        "todo-added",
        "todo-updated",
        "todo-removed",
        "command-handled",
        "persistence-failed",
    ];

    /// Subscribe to `channel` and request the current collection.
    ///
    /// If no bridge is attached yet, the mirror starts empty.
    #[must_use]
    pub fn connect(channel: &EventChannel<TodoMessage>) -> Self {
        let inner = Rc::new(AdapterInner {
            channel: channel.clone(),
            mirror: RefCell::new(Vec::new()),
            events: EventChannel::new(format!("mirror:{}", channel.name())),
            frames: RefCell::new(Vec::new()),
            subscriptions: RefCell::new(Vec::new()),
        });

        for name in Self::REPLIES {
            let weak: Weak<AdapterInner> = Rc::downgrade(&inner);
            let id = channel.on(name, move |message: &TodoMessage| {
                if let Some(inner) = weak.upgrade() {
                    inner.receive(message);
                }
            });
            inner.subscriptions.borrow_mut().push(id);
        }

        if channel.publish(TodoMessage::SyncRequested) == 0 {
            tracing::warn!(channel = channel.name(), "No store attached, starting with an empty mirror");
        }

        Self { inner }
    }

    /// The channel commands are published on
    #[must_use]
    pub fn channel(&self) -> &EventChannel<TodoMessage> {
        &self.inner.channel
    }

    /// Publish `command` and return the items the bridge reports it touched.
    ///
    /// Other subscribers on the channel do not count as an answer: without a
    /// `CommandHandled` or `PersistenceFailed` reply the store is detached.
    fn request(&self, command: TodoMessage) -> Result<Vec<TodoItem>> {
        let name = command.name();
        self.inner.frames.borrow_mut().push(None);
        let delivered = self.inner.channel.publish(command);
        let reply = self.inner.frames.borrow_mut().pop().flatten();

        match reply {
            Some(Reply::Handled(items)) => Ok(items),
            Some(Reply::Failed { command, reason }) => Err(TodoError::Reported { command, reason }),
            None => {
                tracing::warn!(
                    channel = self.inner.channel.name(),
                    command = name,
                    delivered,
                    "Command went unanswered"
                );
                Err(self.detached())
            }
        }
    }

    fn detached(&self) -> TodoError {
        TodoError::Detached(self.inner.channel.name().to_string())
    }
}

impl TodoRepository for ChannelTodoStore {
    fn items(&self) -> Vec<TodoItem> {
        self.inner.mirror.borrow().clone()
    }

    fn add(&self, title: &str) -> Result<TodoItem> {
        let items = self.request(TodoMessage::AddTodo {
            title: title.to_string(),
        })?;
        items.into_iter().next().ok_or_else(|| self.detached())
    }

    fn update(&self, item: &TodoItem) -> Result<bool> {
        let items = self.request(TodoMessage::UpdateTodo { item: item.clone() })?;
        Ok(!items.is_empty())
    }

    fn remove(&self, id: TodoId) -> Result<Option<TodoItem>> {
        let items = self.request(TodoMessage::RemoveTodo { id })?;
        Ok(items.into_iter().next())
    }

    fn subscribe(&self, listener: Box<dyn Fn(&TodoEvent)>) -> SubscriptionId {
        self.inner.events.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.events.unsubscribe(id)
    }

    fn clear_completed(&self) -> Result<Vec<TodoItem>> {
        self.request(TodoMessage::ClearCompleted)
    }
}
