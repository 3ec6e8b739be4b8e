//! The footer: counts, filter selection, and "clear completed".

use crate::error::Result;
use crate::repository::TodoRepository;
use crate::types::{Filter, TodoCounts, TodoEvent, TodoItem};
use std::fmt;
use std::rc::{Rc, Weak};
use todomvc_core::{Observable, SubscriptionId};

struct FilterState {
    repository: Rc<dyn TodoRepository>,
    total: Observable<usize>,
    completed: Observable<usize>,
    remaining: Observable<usize>,
    filter: Observable<Filter>,
}

impl FilterState {
    // Counts always come from the repository, never from event payloads
    fn recount(&self) {
        let counts = TodoCounts::of(&self.repository.items());
        self.total.set(counts.total);
        self.completed.set(counts.completed);
        self.remaining.set(counts.remaining);
    }
}

/// Derives counts from the collection and tracks the selected filter
pub struct FilterController {
    state: Rc<FilterState>,
    subscription: SubscriptionId,
}

impl fmt::Debug for FilterController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterController")
            .field("counts", &self.counts())
            .field("filter", &self.state.filter.get())
            .finish_non_exhaustive()
    }
}

impl FilterController {
    /// Count the repository's current items and follow its changes
    #[must_use]
    pub fn new(repository: Rc<dyn TodoRepository>) -> Self {
        let state = Rc::new(FilterState {
            repository: Rc::clone(&repository),
            total: Observable::new(0),
            completed: Observable::new(0),
            remaining: Observable::new(0),
            filter: Observable::new(Filter::All),
        });
        state.recount();

        let weak: Weak<FilterState> = Rc::downgrade(&state);
        let subscription = repository.subscribe(Box::new(move |_: &TodoEvent| {
            if let Some(state) = weak.upgrade() {
                state.recount();
            }
        }));

        Self { state, subscription }
    }

    /// Number of items
    #[must_use]
    pub fn total(&self) -> &Observable<usize> {
        &self.state.total
    }

    /// Number of completed items
    #[must_use]
    pub fn completed(&self) -> &Observable<usize> {
        &self.state.completed
    }

    /// Number of items still to do
    #[must_use]
    pub fn remaining(&self) -> &Observable<usize> {
        &self.state.remaining
    }

    /// The selected filter
    #[must_use]
    pub fn filter(&self) -> &Observable<Filter> {
        &self.state.filter
    }

    /// All three counts at once
    #[must_use]
    pub fn counts(&self) -> TodoCounts {
        TodoCounts {
            total: self.state.total.get(),
            completed: self.state.completed.get(),
            remaining: self.state.remaining.get(),
        }
    }

    /// Select a filter. Returns `true` if the selection changed.
    pub fn select(&self, filter: Filter) -> bool {
        self.state.filter.set(filter)
    }

    /// Select the filter named by a route such as `#/active`
    pub fn select_route(&self, route: &str) -> bool {
        self.select(Filter::from_route(route))
    }

    /// Remove every completed item.
    ///
    /// # Errors
    ///
    /// Returns the repository's error if a removal cannot be persisted.
    pub fn clear_completed(&self) -> Result<Vec<TodoItem>> {
        let removed = self.state.repository.clear_completed()?;
        tracing::debug!(count = removed.len(), "Cleared completed todos");
        Ok(removed)
    }
}

impl Drop for FilterController {
    fn drop(&mut self) {
        self.state.repository.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::TodoConfig;
    use crate::store::TodoStore;
    use std::cell::RefCell;
    use todomvc_testing::InMemoryStorage;

    fn controller() -> (TodoStore, FilterController) {
        let store = TodoStore::open(Rc::new(InMemoryStorage::new()), &TodoConfig::default());
        let filter = FilterController::new(Rc::new(store.clone()));
        (store, filter)
    }

    #[test]
    fn counts_follow_the_store() {
        let (store, filter) = controller();
        assert_eq!(filter.counts(), TodoCounts::default());

        let a = store.add("a").unwrap();
        store.add("b").unwrap();
        store.update(&a.with_completed(true)).unwrap();

        assert_eq!(
            filter.counts(),
            TodoCounts {
                total: 2,
                completed: 1,
                remaining: 1,
            }
        );
    }

    #[test]
    fn clear_completed_leaves_active_items() {
        let (store, filter) = controller();
        let a = store.add("a").unwrap();
        let b = store.add("b").unwrap();
        let c = store.add("c").unwrap();
        store.update(&a.clone().with_completed(true)).unwrap();
        store.update(&c.clone().with_completed(true)).unwrap();

        let removed = filter.clear_completed().unwrap();

        assert_eq!(removed.len(), 2);
        assert_eq!(store.list(), vec![b]);
        assert_eq!(filter.total().get(), 1);
        assert_eq!(filter.completed().get(), 0);
        assert_eq!(filter.remaining().get(), 1);
    }

    #[test]
    fn count_fields_notify_only_on_change() {
        let (store, filter) = controller();
        let item = store.add("a").unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        filter
            .remaining()
            .subscribe(move |value| sink.borrow_mut().push(*value));

        // Title change leaves the counts alone
        store.update(&item.clone().with_title("b")).unwrap();
        store.update(&item.with_completed(true)).unwrap();

        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn select_by_route() {
        let (_store, filter) = controller();
        assert_eq!(filter.filter().get(), Filter::All);

        assert!(filter.select_route("#/active"));
        assert_eq!(filter.filter().get(), Filter::Active);
        assert!(!filter.select(Filter::Active));
        assert!(filter.select_route("#/"));
        assert_eq!(filter.filter().get(), Filter::All);
    }
}
