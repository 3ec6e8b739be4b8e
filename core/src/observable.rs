//! Observable values for the view boundary.
//!
//! Controllers expose their state as [`Observable`] fields. A rendering
//! layer reads them with [`Observable::get`] and re-renders from a
//! [`Observable::subscribe`] callback.
//!
//! Listeners fire only when a write changes the value. Writing an equal value
//! is silent.

use crate::event_bus::SubscriptionId;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type ChangeListener<T> = Rc<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: RefCell<T>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, ChangeListener<T>)>>,
}

/// A shared, observable value.
///
/// Cloning yields another handle to the same value.
///
/// # Example
///
/// ```
/// use todomvc_core::Observable;
///
/// let remaining = Observable::new(0_usize);
/// remaining.subscribe(|value| println!("{value} items left"));
///
/// assert!(remaining.set(2));
/// assert!(!remaining.set(2)); // unchanged, listeners not called
/// assert_eq!(remaining.get(), 2);
/// ```
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Creates an observable holding `value`
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                value: RefCell::new(value),
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Returns a copy of the current value
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Reads the current value without cloning it
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&*self.inner.value.borrow())
    }

    /// Replace the value. Returns `true` (and notifies) if it changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.notify();
        true
    }

    /// Mutate the value in place. Returns `true` (and notifies) if it changed.
    pub fn update(&self, change: impl FnOnce(&mut T)) -> bool {
        let changed = {
            let mut current = self.inner.value.borrow_mut();
            let before = current.clone();
            change(&mut *current);
            *current != before
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Register a change listener
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new(self.inner.next_id.get());
        self.inner.next_id.set(id.as_u64() + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a change listener. Returns `false` if the id is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    fn notify(&self) {
        let value = self.get();
        let listeners: SmallVec<[ChangeListener<T>; 4]> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in &listeners {
            listener(&value);
        }
    }
}
