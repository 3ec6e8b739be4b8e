//! Property-based testing strategies using proptest.

use proptest::prelude::*;

/// A title that is non-empty and already trimmed.
///
/// Besides letters and digits, titles draw on characters JSON must escape
/// and characters outside ASCII.
pub fn title() -> impl Strategy<Value = String> {
    r#"[a-zA-Z0-9"\\/éü日✓🚀-][a-zA-Z0-9 "\\/éü日✓🚀-]{0,18}[a-zA-Z0-9"\\/éü日✓🚀-]|[a-zA-Z0-9"\\éü日🚀]"#
}

/// A valid title surrounded by random whitespace
pub fn padded_title() -> impl Strategy<Value = String> {
    (" {0,3}", title(), "[ \t]{0,3}").prop_map(|(lead, title, tail)| format!("{lead}{title}{tail}"))
}

/// A title made only of whitespace (possibly empty)
pub fn blank_title() -> impl Strategy<Value = String> {
    "[ \t\n]{0,6}"
}

/// One operation against a todo collection.
///
/// Positions are resolved modulo the current length when the operation is
/// applied, so every generated sequence is valid for any collection size.
#[derive(Clone, Debug)]
pub enum CollectionOp {
    /// Add an item with this title
    Add(String),
    /// Remove the item at this position
    Remove(usize),
    /// Flip the completed flag of the item at this position
    Toggle(usize),
}

/// A single [`CollectionOp`], weighted toward additions
pub fn collection_op() -> impl Strategy<Value = CollectionOp> {
    prop_oneof![
        3 => title().prop_map(CollectionOp::Add),
        1 => any::<usize>().prop_map(CollectionOp::Remove),
        2 => any::<usize>().prop_map(CollectionOp::Toggle),
    ]
}

/// A sequence of up to `max` operations
pub fn collection_ops(max: usize) -> impl Strategy<Value = Vec<CollectionOp>> {
    prop::collection::vec(collection_op(), 0..=max)
}

/// Items described as `(title, completed)` pairs
pub fn seeded_items(max: usize) -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::vec((title(), any::<bool>()), 0..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn titles_are_trimmed_and_non_empty(title in title()) {
            prop_assert!(!title.is_empty());
            prop_assert_eq!(title.trim(), title.as_str());
        }

        #[test]
        fn padded_titles_trim_to_something(title in padded_title()) {
            prop_assert!(!title.trim().is_empty());
        }

        #[test]
        fn blank_titles_trim_to_nothing(title in blank_title()) {
            prop_assert!(title.trim().is_empty());
        }
    }
}
