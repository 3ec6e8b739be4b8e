//! Typed publish/subscribe channels for decoupled components.
//!
//! This module provides [`EventChannel`], a synchronous, same-thread channel
//! carrying a closed set of [`Message`] variants, and [`EventHub`], which hands
//! out named channels so that components sharing nothing but the hub can still
//! talk to each other.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   publish    ┌──────────────────┐
//! │  Publisher  │─────────────▶│   EventChannel   │
//! └─────────────┘              │  (snapshot subs) │
//!                              └────────┬─────────┘
//!                                       │ in subscription order
//!                          ┌────────────┼────────────┐
//!                          ▼            ▼            ▼
//!                     ┌────────┐   ┌────────┐   ┌────────┐
//!                     │ List   │   │ Filter │   │ Bridge │
//!                     └────────┘   └────────┘   └────────┘
//! ```
//!
//! # Key Principles
//!
//! - **Synchronous**: `publish` returns only after every listener ran
//! - **Ordered**: listeners run in the order they subscribed
//! - **Re-entrant**: the subscriber list is snapshotted before dispatch, so a
//!   listener may publish, subscribe, or unsubscribe while being called
//! - **No buffering**: publishing with no subscribers is a no-op
//! - **Isolated**: channels obtained under different names never share messages
//!
//! # Example
//!
//! ```rust,ignore
//! let hub = EventHub::<TodoMessage>::new();
//! let todos = hub.channel("todos");
//!
//! let id = todos.on("todo-added", |message| tracing::info!(?message, "added"));
//! todos.publish(TodoMessage::TodoAdded { item });
//! assert!(todos.unsubscribe(id));
//! ```

use crate::message::Message;
use crate::metrics::CHANNEL_MESSAGES_TOTAL;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Listener invoked for every delivered message
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Handle returned by every subscription, used to unsubscribe deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a `SubscriptionId` from a raw value
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

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Tag identifying who subscribed or who is publishing.
///
/// Publishing with [`EventChannel::publish_from`] skips every subscriber that
/// registered under the same context. Suppressing self-echo is always the
/// caller's choice; plain [`EventChannel::publish`] reaches everyone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Context(&'static str);

impl Context {
    /// Creates a named context
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the context name
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

struct Subscriber<E> {
    id: SubscriptionId,
    context: Option<Context>,
    filter: Option<&'static str>,
    listener: Listener<E>,
}

impl<E> Subscriber<E> {
    fn accepts(&self, name: &str, origin: Option<Context>) -> bool {
        if origin.is_some() && self.context == origin {
            return false;
        }
        self.filter.is_none_or(|filter| filter == name)
    }
}

struct ChannelInner<E> {
    name: String,
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<Subscriber<E>>>,
}

/// A named publish/subscribe channel for one message type.
///
/// Cloning an `EventChannel` yields another handle to the same channel; all
/// handles share one subscriber list.
pub struct EventChannel<E: Message> {
    inner: Rc<ChannelInner<E>>,
}

impl<E: Message> Clone for EventChannel<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: Message> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("name", &self.inner.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E: Message> EventChannel<E> {
    /// Creates a standalone channel
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                name: name.into(),
                next_id: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Returns the channel name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Subscribe to every message published on this channel
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> SubscriptionId {
        self.register(None, None, Rc::new(listener))
    }

    /// Subscribe to messages with the given name only
    pub fn on(&self, name: &'static str, listener: impl Fn(&E) + 'static) -> SubscriptionId {
        self.register(None, Some(name), Rc::new(listener))
    }

    /// Subscribe to every message, tagged with `context`
    pub fn subscribe_in(
        &self,
        context: Context,
        listener: impl Fn(&E) + 'static,
    ) -> SubscriptionId {
        self.register(Some(context), None, Rc::new(listener))
    }

    /// Subscribe to messages with the given name, tagged with `context`
    pub fn on_in(
        &self,
        context: Context,
        name: &'static str,
        listener: impl Fn(&E) + 'static,
    ) -> SubscriptionId {
        self.register(Some(context), Some(name), Rc::new(listener))
    }

    /// Remove a subscription.
    ///
    /// Returns `false` if the id is unknown (already removed, or issued by
    /// another channel).
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != id);
        let removed = subscribers.len() != before;
        if removed {
            tracing::trace!(channel = %self.inner.name, %id, "Unsubscribed");
        }
        removed
    }

    /// Number of live subscriptions
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Deliver `message` to every matching subscriber.
    ///
    /// Returns the number of listeners invoked.
    pub fn publish(&self, message: E) -> usize {
        self.dispatch(&message, None)
    }

    /// Deliver `message` to every matching subscriber not registered under `origin`.
    pub fn publish_from(&self, origin: Context, message: E) -> usize {
        self.dispatch(&message, Some(origin))
    }

    fn register(
        &self,
        context: Option<Context>,
        filter: Option<&'static str>,
        listener: Listener<E>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        self.inner.subscribers.borrow_mut().push(Subscriber {
            id,
            context,
            filter,
            listener,
        });

        tracing::trace!(
            channel = %self.inner.name,
            %id,
            filter = filter.unwrap_or("*"),
            "Subscribed"
        );
        id
    }

    fn dispatch(&self, message: &E, origin: Option<Context>) -> usize {
        let name = message.name();

        // Snapshot before calling out: listeners may mutate the list.
        let targets: SmallVec<[Listener<E>; 8]> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .filter(|subscriber| subscriber.accepts(name, origin))
            .map(|subscriber| Rc::clone(&subscriber.listener))
            .collect();

        tracing::trace!(
            channel = %self.inner.name,
            message = name,
            listeners = targets.len(),
            "Dispatching"
        );
        metrics::counter!(
            CHANNEL_MESSAGES_TOTAL,
            "channel" => self.inner.name.clone(),
            "message" => name
        )
        .increment(1);

        for listener in &targets {
            listener(message);
        }
        targets.len()
    }
}

/// Registry of named channels.
///
/// Replaces runtime service lookup: build one hub, pass it to every component
/// that needs to communicate, and let each ask for the channel it uses.
pub struct EventHub<E: Message> {
    channels: Rc<RefCell<HashMap<String, EventChannel<E>>>>,
}

impl<E: Message> Clone for EventHub<E> {
    fn clone(&self) -> Self {
        Self {
            channels: Rc::clone(&self.channels),
        }
    }
}

impl<E: Message> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Message> fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = self.channels.borrow();
        let mut names: Vec<&String> = channels.keys().collect();
        names.sort();
        f.debug_struct("EventHub").field("channels", &names).finish()
    }
}

impl<E: Message> EventHub<E> {
    /// Creates an empty hub
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Returns the channel registered under `name`, creating it if absent
    pub fn channel(&self, name: &str) -> EventChannel<E> {
        self.channels
            .borrow_mut()
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(channel = name, "Creating channel");
                EventChannel::new(name)
            })
            .clone()
    }

    /// Whether a channel with this name has been created
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.channels.borrow().contains_key(name)
    }
}
