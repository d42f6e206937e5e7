//! Node index space.
//!
//! Maps semantic coordinates to dense integer node ids:
//!
//! ```text
//! [0, 2·H·(T+1))                      entry/exit pairs, ordered by (time, hub)
//! [2·H·(T+1), 2·H·(T+1) + R·(T+1))    transit slots, ordered by (arrival, connection)
//! ```
//!
//! Entry ids are even and exit ids odd, so a hub-time instant occupies two
//! adjacent ids. The ranges are disjoint and contiguous, which lets the
//! adjacency structure be a flat array indexed directly by node id.

use serde::{Deserialize, Serialize};

use crate::error::{Coordinate, GraphError, GraphResult};
use crate::models::{HubId, NetworkConfig, TimeStep};

use super::NodeId;

/// Dimensions of a time-expanded graph and the id arithmetic over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIndex {
    hubs: usize,
    horizon: TimeStep,
    transit_slots: usize,
}

/// Decoded meaning of a node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Flow arriving at `hub` during `time`.
    Entry { hub: HubId, time: TimeStep },
    /// Flow leaving `hub` after `time`.
    Exit { hub: HubId, time: TimeStep },
    /// Flow in transit on a restricted connection, due at `arrival`.
    Transit { connection: usize, arrival: TimeStep },
}

impl NodeIndex {
    /// Creates an index space for `hubs` hubs over `[0, horizon]` with
    /// `transit_slots` restricted connections.
    pub fn new(hubs: usize, horizon: TimeStep, transit_slots: usize) -> Self {
        Self {
            hubs,
            horizon,
            transit_slots,
        }
    }

    /// Index space matching a configuration.
    pub fn for_config(config: &NetworkConfig) -> Self {
        Self::new(
            config.hub_count(),
            config.horizon,
            config.transit_slot_count(),
        )
    }

    /// Number of hubs `H`.
    #[inline]
    pub fn hubs(&self) -> usize {
        self.hubs
    }

    /// Last time step `T`.
    #[inline]
    pub fn horizon(&self) -> TimeStep {
        self.horizon
    }

    /// Size `R` of the transit id space.
    #[inline]
    pub fn transit_slots(&self) -> usize {
        self.transit_slots
    }

    /// Number of time steps, `T + 1`.
    #[inline]
    pub fn time_steps(&self) -> usize {
        self.horizon.saturating_add(1)
    }

    /// Number of entry and exit nodes, `2·H·(T+1)`.
    ///
    /// This is also the first transit id.
    #[inline]
    pub fn split_node_count(&self) -> usize {
        self.hubs.saturating_mul(self.time_steps()).saturating_mul(2)
    }

    /// First transit id.
    #[inline]
    pub fn transit_offset(&self) -> NodeId {
        self.split_node_count()
    }

    /// Number of transit nodes, `R·(T+1)`.
    #[inline]
    pub fn transit_node_count(&self) -> usize {
        self.transit_slots.saturating_mul(self.time_steps())
    }

    /// Total number of nodes.
    ///
    /// Saturates at `usize::MAX`; see [`checked_node_count`](Self::checked_node_count).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.split_node_count().saturating_add(self.transit_node_count())
    }

    /// Total number of nodes, or `None` if it does not fit in `usize`.
    pub fn checked_node_count(&self) -> Option<usize> {
        let steps = self.horizon.checked_add(1)?;
        let split = self.hubs.checked_mul(steps)?.checked_mul(2)?;
        split.checked_add(self.transit_slots.checked_mul(steps)?)
    }

    /// Linear position of a hub-time instant, `time·H + hub`.
    pub fn hub_time(&self, hub: HubId, time: TimeStep) -> GraphResult<usize> {
        check(Coordinate::Hub, hub, self.hubs)?;
        check(Coordinate::Time, time, self.time_steps())?;
        Ok(time * self.hubs + hub)
    }

    /// Entry node of `(hub, time)`.
    pub fn entry_node(&self, hub: HubId, time: TimeStep) -> GraphResult<NodeId> {
        Ok(2 * self.hub_time(hub, time)?)
    }

    /// Exit node of `(hub, time)`.
    pub fn exit_node(&self, hub: HubId, time: TimeStep) -> GraphResult<NodeId> {
        Ok(2 * self.hub_time(hub, time)? + 1)
    }

    /// Transit slot of restricted connection `connection` arriving at `arrival`.
    pub fn transit_node(&self, connection: usize, arrival: TimeStep) -> GraphResult<NodeId> {
        check(Coordinate::Connection, connection, self.transit_slots)?;
        check(Coordinate::Time, arrival, self.time_steps())?;
        Ok(self.transit_offset() + arrival * self.transit_slots + connection)
    }

    /// Decodes a node id. `None` for ids outside `[0, node_count)`.
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        if node < self.split_node_count() {
            let linear = node / 2;
            let (hub, time) = (linear % self.hubs, linear / self.hubs);
            Some(if node % 2 == 0 {
                NodeKind::Entry { hub, time }
            } else {
                NodeKind::Exit { hub, time }
            })
        } else if node < self.node_count() {
            let rel = node - self.transit_offset();
            Some(NodeKind::Transit {
                connection: rel % self.transit_slots,
                arrival: rel / self.transit_slots,
            })
        } else {
            None
        }
    }
}

#[inline]
fn check(coordinate: Coordinate, value: usize, bound: usize) -> GraphResult<()> {
    if value < bound {
        Ok(())
    } else {
        Err(GraphError::OutOfRangeCoordinate {
            coordinate,
            value,
            bound,
        })
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Entry { hub, time } => write!(f, "in(hub {hub}, t={time})"),
            NodeKind::Exit { hub, time } => write!(f, "out(hub {hub}, t={time})"),
            NodeKind::Transit {
                connection,
                arrival,
            } => write!(f, "transit(conn {connection}, arrives t={arrival})"),
        }
    }
}
