//! Hub model.
//!
//! A hub is a discrete resource location with a per-time-step throughput
//! limit (its slot capacity). Hubs are identified by their position in
//! [`NetworkConfig::hubs`](super::NetworkConfig), so ids are dense in
//! `[0, H)`.

use serde::{Deserialize, Serialize};

use super::Capacity;

/// A resource location in the time-expanded network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hub {
    /// Human-readable name (diagnostics only).
    #[serde(default)]
    pub name: String,
    /// Units of flow that may occupy the hub during one time step (default: 1).
    #[serde(default = "default_capacity")]
    pub capacity: Capacity,
    /// Whether flow may stay at the hub from one time step to the next.
    ///
    /// Hubs that cannot wait model a hard requirement to move on.
    #[serde(default)]
    pub wait_capable: bool,
}

fn default_capacity() -> Capacity {
    1
}

impl Hub {
    /// Creates a hub with slot capacity 1 that does not allow waiting.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: 1,
            wait_capable: false,
        }
    }

    /// Sets the slot capacity.
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Allows flow to wait at this hub.
    pub fn waiting(mut self) -> Self {
        self.wait_capable = true;
        self
    }

    /// Sets whether flow may wait at this hub.
    pub fn with_wait(mut self, wait_capable: bool) -> Self {
        self.wait_capable = wait_capable;
        self
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new("")
    }
}
