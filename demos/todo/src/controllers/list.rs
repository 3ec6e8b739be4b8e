//! The todo list.
//!
//! [`ListController`] projects the repository's items into [`ViewItem`]s and
//! relays per-item intents (toggle, edit, remove) back to the repository.
//!
//! The projection is only ever changed by repository notifications, with one
//! exception: the title of an item being edited holds the in-progress text
//! until the edit is saved or cancelled.

use crate::error::Result;
use crate::repository::TodoRepository;
use crate::types::{Filter, TodoEvent, TodoId, TodoItem};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use todomvc_core::{Observable, SubscriptionId};

/// Per-item state a renderer binds to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewItem {
    /// Id of the underlying item
    pub id: TodoId,
    /// Displayed title (the edit text while editing)
    pub title: String,
    /// Whether the item is completed
    pub completed: bool,
    /// Whether the item is being edited
    pub editing: bool,
}

impl From<&TodoItem> for ViewItem {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            completed: item.completed,
            editing: false,
        }
    }
}

struct ListState {
    repository: Rc<dyn TodoRepository>,
    items: Observable<Vec<ViewItem>>,
    all_completed: Observable<bool>,
    // Title captured when editing began, for cancel
    originals: RefCell<HashMap<TodoId, String>>,
}

impl ListState {
    fn apply(&self, event: &TodoEvent) {
        match event {
            TodoEvent::Added(item) => {
                self.items.update(|items| {
                    if items.iter().all(|view| view.id != item.id) {
                        items.push(ViewItem::from(item));
                    }
                });
            }
            TodoEvent::Updated(item) => {
                self.items.update(|items| {
                    if let Some(view) = items.iter_mut().find(|view| view.id == item.id) {
                        view.completed = item.completed;
                        if !view.editing {
                            view.title.clone_from(&item.title);
                        }
                    }
                });
            }
            TodoEvent::Removed(item) => {
                self.originals.borrow_mut().remove(&item.id);
                self.items.update(|items| items.retain(|view| view.id != item.id));
            }
        }
        self.refresh_all_completed();
    }

    fn refresh_all_completed(&self) {
        let all = self.items.with(|items| items.iter().all(|view| view.completed));
        self.all_completed.set(all);
    }

    fn view(&self, id: TodoId) -> Option<ViewItem> {
        self.items
            .with(|items| items.iter().find(|view| view.id == id).cloned())
    }

    fn edit_view(&self, id: TodoId, change: impl FnOnce(&mut ViewItem)) -> bool {
        self.items.update(|items| {
            if let Some(view) = items.iter_mut().find(|view| view.id == id) {
                change(view);
            }
        })
    }
}

/// Projects the collection and relays per-item intents
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use todomvc::{ListController, TodoConfig, TodoRepository, TodoStore};
/// use todomvc_testing::InMemoryStorage;
///
/// # fn main() -> todomvc::Result<()> {
/// let store = TodoStore::open(Rc::new(InMemoryStorage::new()), &TodoConfig::default());
/// let list = ListController::new(Rc::new(store.clone()));
///
/// let item = store.add("Buy milk")?;
/// list.toggle_complete(item.id)?;
///
/// assert!(list.all_completed());
/// # Ok(())
/// # }
/// ```
pub struct ListController {
    state: Rc<ListState>,
    subscription: SubscriptionId,
}

impl fmt::Debug for ListController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListController")
            .field("items", &self.state.items)
            .field("all_completed", &self.state.all_completed)
            .finish_non_exhaustive()
    }
}

impl ListController {
    /// Project the repository's current items and follow its changes
    #[must_use]
    pub fn new(repository: Rc<dyn TodoRepository>) -> Self {
        let items: Vec<ViewItem> = repository.items().iter().map(ViewItem::from).collect();
        let all_completed = items.iter().all(|view| view.completed);

        let state = Rc::new(ListState {
            repository: Rc::clone(&repository),
            items: Observable::new(items),
            all_completed: Observable::new(all_completed),
            originals: RefCell::new(HashMap::new()),
        });

        let weak: Weak<ListState> = Rc::downgrade(&state);
        let subscription = repository.subscribe(Box::new(move |event: &TodoEvent| {
            if let Some(state) = weak.upgrade() {
                state.apply(event);
            }
        }));

        Self { state, subscription }
    }

    /// The projected items, in display order
    #[must_use]
    pub fn items(&self) -> &Observable<Vec<ViewItem>> {
        &self.state.items
    }

    /// Whether every item is completed (`true` for an empty list)
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.state.all_completed.get()
    }

    /// The bindable form of [`ListController::all_completed`]
    #[must_use]
    pub fn all_completed_field(&self) -> &Observable<bool> {
        &self.state.all_completed
    }

    /// Projected items the filter shows
    #[must_use]
    pub fn visible_items(&self, filter: Filter) -> Vec<ViewItem> {
        self.state.items.with(|items| {
            items
                .iter()
                .filter(|view| filter.matches(view.completed))
                .cloned()
                .collect()
        })
    }

    /// Flip an item's completed flag.
    ///
    /// Returns `false` if the item is unknown.
    ///
    /// # Errors
    ///
    /// Returns the repository's error if the change cannot be persisted.
    pub fn toggle_complete(&self, id: TodoId) -> Result<bool> {
        let Some(item) = self.state.repository.get(id) else {
            return Ok(false);
        };
        let completed = !item.completed;
        self.state.repository.update(&item.with_completed(completed))
    }

    /// Remove an item.
    ///
    /// # Errors
    ///
    /// Returns the repository's error if the change cannot be persisted.
    pub fn remove(&self, id: TodoId) -> Result<Option<TodoItem>> {
        self.state.repository.remove(id)
    }

    /// Start editing an item. Returns `false` if the item is unknown.
    pub fn edit_item(&self, id: TodoId) -> bool {
        let Some(view) = self.state.view(id) else {
            return false;
        };
        if !view.editing {
            self.state.originals.borrow_mut().insert(id, view.title);
            self.state.edit_view(id, |view| view.editing = true);
        }
        true
    }

    /// Replace the in-progress title of an item being edited.
    ///
    /// Returns `false` if the item is not being edited.
    pub fn set_edit_text(&self, id: TodoId, text: impl Into<String>) -> bool {
        if !self.is_editing(id) {
            return false;
        }
        let text = text.into();
        self.state.edit_view(id, |view| view.title = text);
        true
    }

    /// Finish editing an item.
    ///
    /// The in-progress title is trimmed. An empty title removes the item;
    /// otherwise the title is written to the repository. Does nothing unless
    /// the item is being edited.
    ///
    /// # Errors
    ///
    /// Returns the repository's error if the change cannot be persisted. The
    /// item then shows its title from before the edit.
    pub fn save_edit(&self, id: TodoId) -> Result<()> {
        let Some(view) = self.state.view(id).filter(|view| view.editing) else {
            return Ok(());
        };
        let original = self.state.originals.borrow_mut().remove(&id);
        let title = view.title.trim().to_string();

        self.state.edit_view(id, |view| {
            view.editing = false;
            view.title.clone_from(&title);
        });

        let outcome = if title.is_empty() {
            self.state.repository.remove(id).map(drop)
        } else {
            match self.state.repository.get(id) {
                Some(item) => self.state.repository.update(&item.with_title(title)).map(drop),
                None => Ok(()),
            }
        };

        if let Err(e) = outcome {
            tracing::warn!(%id, error = %e, "Saving edit failed, reverting title");
            if let Some(original) = original {
                self.state.edit_view(id, |view| view.title = original);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Abandon editing an item and restore its title.
    ///
    /// Returns `false` if the item is not being edited.
    pub fn cancel_edit(&self, id: TodoId) -> bool {
        if !self.is_editing(id) {
            return false;
        }
        let original = self.state.originals.borrow_mut().remove(&id);
        self.state.edit_view(id, |view| {
            view.editing = false;
            if let Some(original) = original {
                view.title = original;
            }
        });
        true
    }

    /// Write `completed` to every item.
    ///
    /// Every item is written, including items already at `completed`, so
    /// each produces an update notification. Returns the number of items
    /// written.
    ///
    /// # Errors
    ///
    /// Stops at the first write that cannot be persisted.
    pub fn set_all_completed(&self, completed: bool) -> Result<usize> {
        let items = self.state.repository.items();
        let mut written = 0;
        for item in items {
            if self.state.repository.update(&item.with_completed(completed))? {
                written += 1;
            }
        }
        tracing::debug!(completed, written, "Set all todos");
        Ok(written)
    }

    fn is_editing(&self, id: TodoId) -> bool {
        self.state.view(id).is_some_and(|view| view.editing)
    }
}

impl Drop for ListController {
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
    use todomvc_testing::{FailingStorage, InMemoryStorage, MessageRecorder};

    fn controller() -> (TodoStore, ListController) {
        let store = TodoStore::open(Rc::new(InMemoryStorage::new()), &TodoConfig::default());
        let list = ListController::new(Rc::new(store.clone()));
        (store, list)
    }

    fn titles(list: &ListController) -> Vec<String> {
        list.items().get().into_iter().map(|view| view.title).collect()
    }

    #[test]
    fn projects_existing_items_on_construction() {
        let storage = Rc::new(InMemoryStorage::with_item(
            "todos-rust",
            r#"[{"title":"a","completed":true},{"title":"b","completed":false}]"#,
        ));
        let store = TodoStore::open(storage, &TodoConfig::default());
        let list = ListController::new(Rc::new(store));

        assert_eq!(titles(&list), vec!["a", "b"]);
        assert!(!list.all_completed());
    }

    #[test]
    fn follows_additions_and_removals() {
        let (store, list) = controller();
        let a = store.add("a").unwrap();
        store.add("b").unwrap();
        store.add("c").unwrap();
        assert_eq!(titles(&list), vec!["a", "b", "c"]);

        store.remove(a.id).unwrap();
        assert_eq!(titles(&list), vec!["b", "c"]);
    }

    #[test]
    fn toggle_complete_updates_projection() {
        let (store, list) = controller();
        let item = store.add("a").unwrap();

        assert!(list.toggle_complete(item.id).unwrap());
        assert!(list.items().get()[0].completed);
        assert!(store.get(item.id).unwrap().completed);
        assert!(list.all_completed());

        assert!(list.toggle_complete(item.id).unwrap());
        assert!(!list.all_completed());
        assert!(!list.toggle_complete(TodoId::new(99)).unwrap());
    }

    #[test]
    fn empty_list_reads_all_completed() {
        let (_store, list) = controller();
        assert!(list.all_completed());
    }

    #[test]
    fn save_edit_trims_and_writes() {
        let (store, list) = controller();
        let item = store.add("a").unwrap();

        assert!(list.edit_item(item.id));
        assert!(list.set_edit_text(item.id, "  renamed  "));
        list.save_edit(item.id).unwrap();

        let view = &list.items().get()[0];
        assert_eq!(view.title, "renamed");
        assert!(!view.editing);
        assert_eq!(store.get(item.id).unwrap().title, "renamed");
    }

    #[test]
    fn save_edit_with_blank_title_removes() {
        let (store, list) = controller();
        let item = store.add("a").unwrap();

        list.edit_item(item.id);
        list.set_edit_text(item.id, "   ");
        list.save_edit(item.id).unwrap();

        assert!(store.is_empty());
        assert!(list.items().get().is_empty());
    }

    #[test]
    fn cancel_edit_restores_title() {
        let (store, list) = controller();
        let item = store.add("a").unwrap();

        list.edit_item(item.id);
        list.set_edit_text(item.id, "scratch");
        assert_eq!(titles(&list), vec!["scratch"]);

        assert!(list.cancel_edit(item.id));
        assert_eq!(titles(&list), vec!["a"]);
        assert!(!list.items().get()[0].editing);
        assert!(!list.cancel_edit(item.id));
        assert_eq!(store.get(item.id).unwrap().title, "a");
    }

    #[test]
    fn update_while_editing_keeps_edit_text() {
        let (store, list) = controller();
        let item = store.add("a").unwrap();

        list.edit_item(item.id);
        list.set_edit_text(item.id, "draft");
        store.update(&item.clone().with_completed(true)).unwrap();

        let view = &list.items().get()[0];
        assert_eq!(view.title, "draft");
        assert!(view.completed);
        assert!(view.editing);
    }

    #[test]
    fn failed_save_reverts_title() {
        let storage = Rc::new(FailingStorage::new());
        let store = TodoStore::open(storage.clone(), &TodoConfig::default());
        let list = ListController::new(Rc::new(store.clone()));
        let item = store.add("a").unwrap();

        list.edit_item(item.id);
        list.set_edit_text(item.id, "b");
        storage.fail_writes(true);

        assert!(list.save_edit(item.id).is_err());
        assert_eq!(titles(&list), vec!["a"]);
        assert_eq!(store.get(item.id).unwrap().title, "a");
    }

    #[test]
    fn set_all_completed_writes_every_item() {
        let (store, list) = controller();
        let a = store.add("a").unwrap();
        store.add("b").unwrap();
        store.update(&a.with_completed(true)).unwrap();
        let recorder = MessageRecorder::attach(store.events());

        assert_eq!(list.set_all_completed(true).unwrap(), 2);
        assert_eq!(recorder.names(), vec!["updated", "updated"]);
        assert!(list.all_completed());

        // Writing the current value still notifies for each item
        recorder.clear();
        assert_eq!(list.set_all_completed(true).unwrap(), 2);
        assert_eq!(recorder.len(), 2);
    }

    #[test]
    fn all_completed_field_notifies_only_on_change() {
        let (store, list) = controller();
        let a = store.add("a").unwrap();
        let b = store.add("b").unwrap();

        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        list.all_completed_field()
            .subscribe(move |value| sink.borrow_mut().push(*value));

        store.update(&a.with_completed(true)).unwrap();
        store.update(&b.with_completed(true)).unwrap();
        list.set_all_completed(true).unwrap();

        assert_eq!(*changes.borrow(), vec![true]);
    }

    #[test]
    fn visible_items_by_filter() {
        let (store, list) = controller();
        let a = store.add("a").unwrap();
        store.add("b").unwrap();
        store.update(&a.with_completed(true)).unwrap();

        let names = |filter| -> Vec<String> {
            list.visible_items(filter).into_iter().map(|v| v.title).collect()
        };
        assert_eq!(names(Filter::All), vec!["a", "b"]);
        assert_eq!(names(Filter::Active), vec!["b"]);
        assert_eq!(names(Filter::Completed), vec!["a"]);
    }

    #[test]
    fn follows_store_mutated_by_an_earlier_subscriber() {
        let store = TodoStore::open(Rc::new(InMemoryStorage::new()), &TodoConfig::default());
        let handle = store.clone();
        store.subscribe(move |event| match event {
            TodoEvent::Added(item) if item.title == "done" => {
                handle.update(&item.clone().with_completed(true)).unwrap();
            }
            _ => {}
        });
        let list = ListController::new(Rc::new(store.clone()));

        let item = store.add("done").unwrap();
        store.add("open").unwrap();

        assert!(store.get(item.id).unwrap().completed);
        let projected: Vec<(String, bool)> = list
            .items()
            .get()
            .into_iter()
            .map(|view| (view.title, view.completed))
            .collect();
        assert_eq!(
            projected,
            vec![("done".to_string(), true), ("open".to_string(), false)]
        );

        store.remove(store.list()[1].id).unwrap();
        assert!(list.all_completed());
    }

    #[test]
    fn drop_unsubscribes() {
        let (store, list) = controller();
        let before = store.events().subscriber_count();
        drop(list);
        assert_eq!(store.events().subscriber_count(), before - 1);
    }
}
