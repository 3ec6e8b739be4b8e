//! Metric names and descriptions.
//!
//! Metrics are recorded through the [`metrics`] facade; nothing is exported
//! unless the host application installs a recorder. Call
//! [`register_metrics`] once after installing one so that descriptions are
//! attached.
//!
//! - `todomvc_channel_messages_total{channel, message}` - messages published
//! - `todomvc_store_mutations_total{operation}` - committed store mutations
//! - `todomvc_store_noops_total{operation}` - update/remove on unknown ids
//! - `todomvc_storage_writes_total{outcome}` - persistence writes
//! - `todomvc_store_items` - items currently held by the store

use metrics::{describe_counter, describe_gauge};

// Re-export metrics macros for use in other crates
pub use metrics::{counter, gauge};

/// Messages published on any channel
pub const CHANNEL_MESSAGES_TOTAL: &str = "todomvc_channel_messages_total";

/// Store mutations that were persisted and announced
pub const STORE_MUTATIONS_TOTAL: &str = "todomvc_store_mutations_total";

/// Store updates/removals that matched no item
pub const STORE_NOOPS_TOTAL: &str = "todomvc_store_noops_total";

/// Persistence writes, labelled by outcome
pub const STORAGE_WRITES_TOTAL: &str = "todomvc_storage_writes_total";

/// Current number of items in the store
pub const STORE_ITEMS: &str = "todomvc_store_items";

/// Attach descriptions to every metric above.
pub fn register_metrics() {
    describe_counter!(
        CHANNEL_MESSAGES_TOTAL,
        "Total number of messages published on event channels"
    );
    describe_counter!(
        STORE_MUTATIONS_TOTAL,
        "Total number of committed todo store mutations"
    );
    describe_counter!(
        STORE_NOOPS_TOTAL,
        "Total number of store updates or removals that matched no item"
    );
    describe_counter!(
        STORAGE_WRITES_TOTAL,
        "Total number of persistence writes by outcome"
    );
    describe_gauge!(STORE_ITEMS, "Number of todo items currently in the store");
}
