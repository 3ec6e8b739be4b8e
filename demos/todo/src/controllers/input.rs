//! The new-todo text field.

use crate::error::Result;
use crate::repository::TodoRepository;
use crate::types::TodoItem;
use std::fmt;
use std::rc::Rc;
use todomvc_core::Observable;

/// Turns the text field into new items
pub struct InputController {
    repository: Rc<dyn TodoRepository>,
    text: Observable<String>,
}

impl fmt::Debug for InputController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputController")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl InputController {
    /// Create a controller with an empty field
    #[must_use]
    pub fn new(repository: Rc<dyn TodoRepository>) -> Self {
        Self {
            repository,
            text: Observable::new(String::new()),
        }
    }

    /// The field's current text
    #[must_use]
    pub const fn text(&self) -> &Observable<String> {
        &self.text
    }

    /// Replace the field's text
    pub fn set_text(&self, text: impl Into<String>) {
        self.text.set(text.into());
    }

    /// Commit the field.
    ///
    /// A title that is empty after trimming creates nothing. The field is
    /// cleared either way, even if the item cannot be persisted.
    ///
    /// # Errors
    ///
    /// Returns the repository's error if the new item cannot be persisted.
    pub fn submit(&self) -> Result<Option<TodoItem>> {
        let title = self.text.with(|text| text.trim().to_string());

        let outcome = if title.is_empty() {
            tracing::debug!("Ignoring blank todo title");
            Ok(None)
        } else {
            self.repository.add(&title).map(Some)
        };

        self.text.set(String::new());
        outcome
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::TodoConfig;
    use crate::store::TodoStore;
    use todomvc_testing::{FailingStorage, InMemoryStorage};

    fn controller() -> (TodoStore, InputController) {
        let store = TodoStore::open(Rc::new(InMemoryStorage::new()), &TodoConfig::default());
        let input = InputController::new(Rc::new(store.clone()));
        (store, input)
    }

    #[test]
    fn submit_trims_and_adds() {
        let (store, input) = controller();
        input.set_text("  write spec \t");

        let item = input.submit().unwrap().unwrap();

        assert_eq!(item.title, "write spec");
        assert!(!item.completed);
        assert_eq!(store.list(), vec![item]);
        assert_eq!(input.text().get(), "");
    }

    #[test]
    fn blank_submit_clears_without_adding() {
        let (store, input) = controller();
        input.set_text("   ");

        assert_eq!(input.submit().unwrap(), None);
        assert!(store.is_empty());
        assert_eq!(input.text().get(), "");
    }

    #[test]
    fn failed_submit_still_clears() {
        let storage = Rc::new(FailingStorage::always());
        let store = TodoStore::open(storage, &TodoConfig::default());
        let input = InputController::new(Rc::new(store.clone()));
        input.set_text("write spec");

        assert!(input.submit().is_err());
        assert!(store.is_empty());
        assert_eq!(input.text().get(), "");
    }
}
