//! # TodoMVC Testing
//!
//! Testing utilities and helpers for the TodoMVC synchronization core.
//!
//! This crate provides:
//! - Storage doubles ([`InMemoryStorage`], [`FailingStorage`])
//! - A [`MessageRecorder`] capturing everything published on a channel
//! - Property-based testing strategies
//! - Test logging setup
//!
//! ## Example
//!
//! ```ignore
//! use todomvc_testing::{InMemoryStorage, MessageRecorder};
//!
//! #[test]
//! fn add_is_announced() {
//!     let storage = Rc::new(InMemoryStorage::new());
//!     let store = TodoStore::open(storage.clone(), &TodoConfig::default());
//!     let recorder = MessageRecorder::attach(store.events());
//!
//!     store.add("write spec").unwrap();
//!
//!     assert_eq!(recorder.names(), vec!["added"]);
//! }
//! ```

pub mod mocks;
pub mod properties;
pub mod recorder;

pub use mocks::{FailingStorage, InMemoryStorage};
pub use recorder::MessageRecorder;

use tracing::dispatcher::DefaultGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

/// Route `tracing` output to the test harness for the current thread.
///
/// Logs are captured until the returned guard is dropped. The level comes from
/// `RUST_LOG` and defaults to `debug`.
#[must_use]
pub fn test_tracing() -> DefaultGuard {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .finish()
        .set_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_installs_a_thread_default() {
        let silent = || {
            tracing::dispatcher::get_default(|dispatch| {
                dispatch.is::<tracing::subscriber::NoSubscriber>()
            })
        };
        assert!(silent());

        let guard = test_tracing();
        assert!(!silent());
        tracing::debug!("captured by the test writer");

        drop(guard);
        assert!(silent());
    }
}
