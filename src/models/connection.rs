//! Connection models.
//!
//! Two kinds of hub-to-hub links exist:
//!
//! - [`Connection`]: ordinary link, traversed in exactly one time step.
//! - [`RestrictedConnection`]: link with an enforced transit delay. Flow
//!   on it is parked in a transit slot keyed by arrival time, so it cannot
//!   reach the destination earlier than `delay` steps after departure.

use serde::{Deserialize, Serialize};

use super::{Capacity, HubId, TimeStep};

/// Transit delay used by the reference construction.
pub const DEFAULT_RESTRICTED_DELAY: TimeStep = 2;

/// An ordinary one-step connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Departure hub.
    pub origin: HubId,
    /// Arrival hub.
    pub destination: HubId,
    /// Units of flow that may depart per time step (default: 1).
    #[serde(default = "default_capacity")]
    pub capacity: Capacity,
}

/// A delay-enforcing connection backed by transit slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictedConnection {
    /// Position in the transit id space, `[0, R)`.
    pub id: usize,
    /// Departure hub.
    pub origin: HubId,
    /// Arrival hub.
    pub destination: HubId,
    /// Time steps between departure and arrival (default: 2).
    #[serde(default = "default_delay")]
    pub delay: TimeStep,
    /// Units of flow that may depart per time step (default: 1).
    #[serde(default = "default_capacity")]
    pub capacity: Capacity,
}

fn default_capacity() -> Capacity {
    1
}

fn default_delay() -> TimeStep {
    DEFAULT_RESTRICTED_DELAY
}

impl Connection {
    /// Creates a connection with capacity 1.
    pub fn new(origin: HubId, destination: HubId) -> Self {
        Self {
            origin,
            destination,
            capacity: 1,
        }
    }

    /// Sets the per-step capacity.
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }
}

impl RestrictedConnection {
    /// Creates a restricted connection with the default delay and capacity 1.
    pub fn new(id: usize, origin: HubId, destination: HubId) -> Self {
        Self {
            id,
            origin,
            destination,
            delay: DEFAULT_RESTRICTED_DELAY,
            capacity: 1,
        }
    }

    /// Sets the transit delay.
    pub fn with_delay(mut self, delay: TimeStep) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the per-departure capacity.
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Departure times whose arrival still falls inside `[0, horizon]`.
    ///
    /// Empty when the delay exceeds the horizon.
    #[inline]
    pub fn departures(&self, horizon: TimeStep) -> std::ops::Range<TimeStep> {
        0..horizon.saturating_add(1).saturating_sub(self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_builder() {
        let c = Connection::new(1, 2).with_capacity(4);
        assert_eq!((c.origin, c.destination, c.capacity), (1, 2, 4));
    }

    #[test]
    fn test_restricted_defaults() {
        let r = RestrictedConnection::new(0, 0, 1);
        assert_eq!(r.delay, DEFAULT_RESTRICTED_DELAY);
        assert_eq!(r.capacity, 1);
    }

    #[test]
    fn test_departures() {
        let r = RestrictedConnection::new(0, 0, 1);
        assert_eq!(r.departures(3).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(r.departures(2).collect::<Vec<_>>(), vec![0]);
        assert_eq!(r.departures(1).count(), 0);

        let long = r.with_delay(7);
        assert_eq!(long.departures(3).count(), 0);

        let r = RestrictedConnection::new(0, 0, 1);
        assert_eq!(r.departures(usize::MAX), 0..usize::MAX - 1);
    }

    #[test]
    fn test_restricted_deserialize_defaults() {
        let r: RestrictedConnection =
            serde_json::from_str(r#"{"id": 3, "origin": 0, "destination": 2}"#).unwrap();
        assert_eq!(r, RestrictedConnection::new(3, 0, 2));
    }
}
