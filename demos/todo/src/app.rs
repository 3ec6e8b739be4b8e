//! Wiring a complete todo application.
//!
//! Dependencies are passed in through [`TodoEnvironment`] rather than looked up
//! by name, so tests substitute storage and hub freely.

use crate::channel::{ChannelTodoStore, StoreBridge};
use crate::config::{TodoConfig, Wiring};
use crate::controllers::{FilterController, InputController, ListController};
use crate::messages::TodoMessage;
use crate::repository::TodoRepository;
use crate::store::TodoStore;
use std::fmt;
use std::rc::Rc;
use todomvc_core::{EventHub, KeyValueStorage};

/// External collaborators of a todo application
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Where the collection is persisted
    pub storage: Rc<dyn KeyValueStorage>,
    /// Channels shared between components
    pub hub: EventHub<TodoMessage>,
}

impl TodoEnvironment {
    /// Environment with a fresh hub
    #[must_use]
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            hub: EventHub::new(),
        }
    }

    /// Use an existing hub
    #[must_use]
    pub fn with_hub(mut self, hub: EventHub<TodoMessage>) -> Self {
        self.hub = hub;
        self
    }
}

impl fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

/// A store and the three controllers observing it.
///
/// Fields drop in declaration order: the controllers detach before the
/// repository, and the bridge goes last.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use todomvc::{TodoApp, TodoConfig, TodoEnvironment};
/// use todomvc_testing::InMemoryStorage;
///
/// # fn main() -> todomvc::Result<()> {
/// let env = TodoEnvironment::new(Rc::new(InMemoryStorage::new()));
/// let app = TodoApp::new(&env, &TodoConfig::default());
///
/// app.input().set_text("write spec");
/// app.input().submit()?;
///
/// assert_eq!(app.filter().remaining().get(), 1);
/// # Ok(())
/// # }
/// ```
pub struct TodoApp {
    input: InputController,
    list: ListController,
    filter: FilterController,
    repository: Rc<dyn TodoRepository>,
    bridge: Option<StoreBridge>,
    wiring: Wiring,
}

impl fmt::Debug for TodoApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoApp")
            .field("wiring", &self.wiring)
            .field("input", &self.input)
            .field("list", &self.list)
            .field("filter", &self.filter)
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}

impl TodoApp {
    /// Wire an application the way `config.wiring` says
    #[must_use]
    pub fn new(env: &TodoEnvironment, config: &TodoConfig) -> Self {
        match config.wiring {
            Wiring::Direct => Self::direct(env, config),
            Wiring::Channel => Self::channelled(env, config),
        }
    }

    /// Controllers call the store directly
    #[must_use]
    pub fn direct(env: &TodoEnvironment, config: &TodoConfig) -> Self {
        let store = TodoStore::open(Rc::clone(&env.storage), config);
        tracing::info!(key = store.storage_key(), items = store.len(), "Direct wiring");
        Self::assemble(Rc::new(store), None, Wiring::Direct)
    }

    /// Controllers reach the store only through the hub channel
    #[must_use]
    pub fn channelled(env: &TodoEnvironment, config: &TodoConfig) -> Self {
        let channel = env.hub.channel(&config.channel_name);
        let store = TodoStore::open(Rc::clone(&env.storage), config);
        tracing::info!(
            key = store.storage_key(),
            channel = channel.name(),
            items = store.len(),
            "Channel wiring"
        );

        let bridge = StoreBridge::attach(store, &channel);
        let remote = ChannelTodoStore::connect(&channel);
        Self::assemble(Rc::new(remote), Some(bridge), Wiring::Channel)
    }

    fn assemble(
        repository: Rc<dyn TodoRepository>,
        bridge: Option<StoreBridge>,
        wiring: Wiring,
    ) -> Self {
        Self {
            input: InputController::new(Rc::clone(&repository)),
            list: ListController::new(Rc::clone(&repository)),
            filter: FilterController::new(Rc::clone(&repository)),
            repository,
            bridge,
            wiring,
        }
    }

    /// The new-todo field
    #[must_use]
    pub const fn input(&self) -> &InputController {
        &self.input
    }

    /// The todo list
    #[must_use]
    pub const fn list(&self) -> &ListController {
        &self.list
    }

    /// The footer
    #[must_use]
    pub const fn filter(&self) -> &FilterController {
        &self.filter
    }

    /// What the controllers talk to
    #[must_use]
    pub fn repository(&self) -> &dyn TodoRepository {
        self.repository.as_ref()
    }

    /// How this application is wired
    #[must_use]
    pub const fn wiring(&self) -> Wiring {
        self.wiring
    }
}
