//! Property tests over arbitrary operation sequences.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::rc::Rc;
use todomvc::{TodoApp, TodoConfig, TodoEnvironment, TodoRepository, TodoStore, Wiring};
use todomvc_testing::properties::{CollectionOp, blank_title, collection_ops, padded_title, seeded_items};
use todomvc_testing::InMemoryStorage;

fn wiring() -> impl Strategy<Value = Wiring> {
    prop_oneof![Just(Wiring::Direct), Just(Wiring::Channel)]
}

fn app(wiring: Wiring) -> TodoApp {
    let env = TodoEnvironment::new(Rc::new(InMemoryStorage::new()));
    TodoApp::new(&env, &TodoConfig::default().with_wiring(wiring))
}

fn seed(app: &TodoApp, items: &[(String, bool)]) {
    for (title, completed) in items {
        let item = app.repository().add(title).unwrap();
        if *completed {
            app.repository().update(&item.with_completed(true)).unwrap();
        }
    }
}

proptest! {
    /// Any add/remove sequence leaves the survivors in insertion order
    #[test]
    fn survivors_keep_insertion_order(ops in collection_ops(40)) {
        let store = TodoStore::open(Rc::new(InMemoryStorage::new()), &TodoConfig::default());
        let mut expected: Vec<String> = Vec::new();

        for op in ops {
            match op {
                CollectionOp::Add(title) => {
                    store.add(title.clone()).unwrap();
                    expected.push(title);
                }
                CollectionOp::Remove(position) if !expected.is_empty() => {
                    let index = position % expected.len();
                    let id = store.list()[index].id;
                    store.remove(id).unwrap();
                    expected.remove(index);
                }
                CollectionOp::Remove(_) | CollectionOp::Toggle(_) => {}
            }
        }

        let titles: Vec<String> = store.list().into_iter().map(|item| item.title).collect();
        prop_assert_eq!(titles, expected);
    }

    /// Counts add up after every mutation, in either wiring
    #[test]
    fn remaining_is_total_minus_completed(ops in collection_ops(30), wiring in wiring()) {
        let app = app(wiring);

        for op in ops {
            let items = app.repository().items();
            match op {
                CollectionOp::Add(title) => {
                    app.input().set_text(title);
                    app.input().submit().unwrap();
                }
                CollectionOp::Remove(position) if !items.is_empty() => {
                    app.list().remove(items[position % items.len()].id).unwrap();
                }
                CollectionOp::Toggle(position) if !items.is_empty() => {
                    app.list().toggle_complete(items[position % items.len()].id).unwrap();
                }
                CollectionOp::Remove(_) | CollectionOp::Toggle(_) => {}
            }

            let counts = app.filter().counts();
            let items = app.repository().items();
            prop_assert_eq!(counts.total, items.len());
            prop_assert_eq!(counts.completed, items.iter().filter(|i| i.completed).count());
            prop_assert_eq!(counts.remaining, counts.total - counts.completed);
            prop_assert_eq!(app.list().all_completed(), counts.remaining == 0);
            prop_assert_eq!(app.list().items().get().len(), counts.total);
        }
    }

    /// Clearing removes exactly the completed items and keeps the rest in order
    #[test]
    fn clear_completed_keeps_active_in_order(items in seeded_items(20), wiring in wiring()) {
        let app = app(wiring);
        seed(&app, &items);

        let removed = app.filter().clear_completed().unwrap();

        let expected: Vec<&str> = items
            .iter()
            .filter(|(_, completed)| !completed)
            .map(|(title, _)| title.as_str())
            .collect();
        let survivors = app.repository().items();
        let titles: Vec<&str> = survivors.iter().map(|item| item.title.as_str()).collect();

        prop_assert_eq!(titles, expected);
        prop_assert!(survivors.iter().all(|item| !item.completed));
        prop_assert_eq!(removed.len(), items.iter().filter(|(_, completed)| *completed).count());
        prop_assert_eq!(app.filter().completed().get(), 0);
    }

    /// A fresh store over the same storage lists the same titles and flags
    #[test]
    fn reopened_store_matches(items in seeded_items(15)) {
        let storage = Rc::new(InMemoryStorage::new());
        let store = TodoStore::open(storage.clone(), &TodoConfig::default());
        for (title, completed) in &items {
            let item = store.add(title.as_str()).unwrap();
            store.update(&item.with_completed(*completed)).unwrap();
        }

        let reopened = TodoStore::open(storage, &TodoConfig::default());
        let fields = |store: &TodoStore| -> Vec<(String, bool)> {
            store.list().into_iter().map(|item| (item.title, item.completed)).collect()
        };
        prop_assert_eq!(fields(&reopened), fields(&store));
        prop_assert_eq!(fields(&reopened), items);
    }

    /// Padded titles are stored trimmed; blank ones create nothing
    #[test]
    fn submit_trims_or_ignores(padded in padded_title(), blank in blank_title(), wiring in wiring()) {
        let app = app(wiring);

        app.input().set_text(blank);
        prop_assert!(app.input().submit().unwrap().is_none());

        app.input().set_text(padded.clone());
        let item = app.input().submit().unwrap().unwrap();

        prop_assert_eq!(item.title.as_str(), padded.trim());
        prop_assert_eq!(app.repository().items().len(), 1);
        prop_assert_eq!(app.input().text().get(), "");
    }
}
