//! Network configuration.
//!
//! A [`NetworkConfig`] is everything the graph builder needs: the hubs,
//! the time horizon, both connection lists, and the capacity parameters
//! of the auxiliary edges. It is plain data; nothing here is derived from
//! a particular scenario.

use serde::{Deserialize, Serialize};

use super::{Capacity, Connection, Hub, HubId, RestrictedConnection, TimeStep};

/// Input to [`build_graph`](crate::graph::build_graph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Hubs, indexed by [`HubId`].
    pub hubs: Vec<Hub>,
    /// Last time step `T`; the graph covers `[0, T]`.
    pub horizon: TimeStep,
    /// Ordinary one-step connections.
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Delay-enforcing connections.
    #[serde(default)]
    pub restricted: Vec<RestrictedConnection>,
    /// Size `R` of the transit id space. Defaults to `restricted.len()`.
    #[serde(default)]
    pub transit_slots: Option<usize>,
    /// Capacity of wait edges. Defaults to the waiting hub's slot capacity.
    #[serde(default)]
    pub wait_capacity: Option<Capacity>,
    /// Capacity of transit → destination edges. Defaults to the
    /// restricted connection's own capacity.
    #[serde(default)]
    pub arrival_capacity: Option<Capacity>,
    /// Upper bound on outgoing edges per node; exceeding it aborts the build.
    #[serde(default)]
    pub max_out_degree: Option<usize>,
}

impl NetworkConfig {
    /// Creates an empty configuration over time steps `[0, horizon]`.
    pub fn new(horizon: TimeStep) -> Self {
        Self {
            hubs: Vec::new(),
            horizon,
            connections: Vec::new(),
            restricted: Vec::new(),
            transit_slots: None,
            wait_capacity: None,
            arrival_capacity: None,
            max_out_degree: None,
        }
    }

    /// Adds a hub. Its id is the number of hubs added before it.
    pub fn with_hub(mut self, hub: Hub) -> Self {
        self.hubs.push(hub);
        self
    }

    /// Adds several hubs.
    pub fn with_hubs(mut self, hubs: impl IntoIterator<Item = Hub>) -> Self {
        self.hubs.extend(hubs);
        self
    }

    /// Adds an ordinary connection.
    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Adds a restricted connection.
    pub fn with_restricted(mut self, connection: RestrictedConnection) -> Self {
        self.restricted.push(connection);
        self
    }

    /// Reserves a transit id space of `slots` connections.
    pub fn with_transit_slots(mut self, slots: usize) -> Self {
        self.transit_slots = Some(slots);
        self
    }

    /// Sets a uniform wait edge capacity.
    pub fn with_wait_capacity(mut self, capacity: Capacity) -> Self {
        self.wait_capacity = Some(capacity);
        self
    }

    /// Sets a uniform arrival edge capacity.
    pub fn with_arrival_capacity(mut self, capacity: Capacity) -> Self {
        self.arrival_capacity = Some(capacity);
        self
    }

    /// Limits the number of outgoing edges any node may have.
    pub fn with_max_out_degree(mut self, limit: usize) -> Self {
        self.max_out_degree = Some(limit);
        self
    }

    /// Number of hubs `H`.
    #[inline]
    pub fn hub_count(&self) -> usize {
        self.hubs.len()
    }

    /// Size `R` of the transit id space.
    #[inline]
    pub fn transit_slot_count(&self) -> usize {
        self.transit_slots.unwrap_or(self.restricted.len())
    }

    /// Wait edge capacity at `hub`.
    pub fn wait_capacity_for(&self, hub: &Hub) -> Capacity {
        self.wait_capacity.unwrap_or(hub.capacity)
    }

    /// Arrival edge capacity for `connection`.
    pub fn arrival_capacity_for(&self, connection: &RestrictedConnection) -> Capacity {
        self.arrival_capacity.unwrap_or(connection.capacity)
    }

    /// Ids of hubs that allow waiting.
    pub fn wait_capable_hubs(&self) -> impl Iterator<Item = HubId> + '_ {
        self.hubs
            .iter()
            .enumerate()
            .filter(|(_, h)| h.wait_capable)
            .map(|(id, _)| id)
    }

    /// The three-hub reference scenario.
    ///
    /// - Hubs 0 and 2 allow waiting, hub 1 does not.
    /// - Horizon `T = 3`.
    /// - Restricted connection 0: hub 0 → hub 1, delay 2.
    /// - Ordinary connection hub 1 → hub 2.
    /// - Wait and arrival edges carry capacity 100.
    pub fn three_hub_example() -> Self {
        Self::new(3)
            .with_hub(Hub::new("h0").waiting())
            .with_hub(Hub::new("h1"))
            .with_hub(Hub::new("h2").waiting())
            .with_restricted(RestrictedConnection::new(0, 0, 1))
            .with_connection(Connection::new(1, 2))
            .with_wait_capacity(100)
            .with_arrival_capacity(100)
    }
}
