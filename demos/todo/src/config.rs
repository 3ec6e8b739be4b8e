//! Configuration for wiring a todo application.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default key the collection is stored under
pub const DEFAULT_STORAGE_KEY: &str = "todos-rust";

/// Default name of the shared todo channel
pub const DEFAULT_CHANNEL: &str = "todos";

/// Configuration for a todo application
///
/// # Example
///
/// ```
/// use todomvc::config::{TodoConfig, Wiring};
///
/// let config = TodoConfig::default()
///     .with_storage_key("todos-work")
///     .with_wiring(Wiring::Channel);
///
/// assert_eq!(config.storage_key, "todos-work");
/// assert_eq!(config.channel_name, "todos");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Storage key holding the serialized collection
    pub storage_key: String,
    /// Hub channel used by the channel-mediated wiring
    pub channel_name: String,
    /// How controllers reach the store
    pub wiring: Wiring,
}

impl TodoConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(storage_key: impl Into<String>, channel_name: impl Into<String>, wiring: Wiring) -> Self {
        Self {
            storage_key: storage_key.into(),
            channel_name: channel_name.into(),
            wiring,
        }
    }

    /// Set the storage key
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the channel name
    #[must_use]
    pub fn with_channel_name(mut self, name: impl Into<String>) -> Self {
        self.channel_name = name.into();
        self
    }

    /// Set the wiring strategy
    #[must_use]
    pub const fn with_wiring(mut self, wiring: Wiring) -> Self {
        self.wiring = wiring;
        self
    }
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            channel_name: DEFAULT_CHANNEL.to_string(),
            wiring: Wiring::Direct,
        }
    }
}

/// How controllers reach the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Wiring {
    /// Controllers call the store and subscribe to it directly
    #[default]
    Direct,
    /// Controllers publish commands on the hub; a bridge owns the store
    Channel,
}

/// Error type for `Wiring` parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown wiring '{0}' (expected 'direct' or 'channel')")]
pub struct ParseWiringError(String);

impl FromStr for Wiring {
    type Err = ParseWiringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "channel" => Ok(Self::Channel),
            _ => Err(ParseWiringError(s.to_string())),
        }
    }
}

impl fmt::Display for Wiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Channel => "channel",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TodoConfig::default();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.channel_name, DEFAULT_CHANNEL);
        assert_eq!(config.wiring, Wiring::Direct);
    }

    #[test]
    fn wiring_parses_case_insensitively() {
        assert_eq!("Channel".parse(), Ok(Wiring::Channel));
        assert_eq!("direct".parse(), Ok(Wiring::Direct));
        assert!("bus".parse::<Wiring>().is_err());
        assert_eq!(Wiring::Channel.to_string(), "channel");
    }
}
