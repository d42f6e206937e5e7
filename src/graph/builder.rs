//! Time-expanded graph construction.
//!
//! # Algorithm
//!
//! Four passes over bounded integer ranges, each emitting one edge
//! category:
//!
//! 1. **Split**: `in(u,t) → out(u,t)` for every hub and `t ∈ [0,T]`, with
//!    the hub's slot capacity. This turns the vertex capacity "flow that
//!    may occupy hub `u` at time `t`" into an edge capacity.
//! 2. **Wait**: `out(u,t) → in(u,t+1)` for wait-capable hubs, `t ∈ [0,T)`.
//! 3. **Restricted**: for departures with `t + d ≤ T`,
//!    `out(o,t) → transit(id,t+d) → in(dst,t+d)`. The transit slot is the
//!    only route from origin to destination on this connection, so the
//!    delay cannot be skipped; the departure edge bounds usage per step.
//! 4. **Ordinary**: `out(o,t) → in(dst,t+1)`, `t ∈ [0,T)`.
//!
//! The passes run twice: once to count out-degrees, once to fill the
//! exactly sized CSR storage. Pass order fixes edge order within a node.
//!
//! # Complexity
//! O(H·T + R·T) time and memory.

use tracing::{debug, info, warn};

use crate::error::{GraphError, GraphResult};
use crate::models::NetworkConfig;
use crate::validation::validate_config;

use super::adjacency::{CsrFiller, DegreeCounter, EdgeKind, EdgeSink, TimeExpandedGraph};
use super::NodeIndex;

/// Builds the time-expanded graph for `config`.
///
/// The configuration is validated first; any validation failure aborts
/// with [`GraphError::InvalidConfig`]. A node exceeding
/// [`NetworkConfig::max_out_degree`] aborts with
/// [`GraphError::ConfigurationOverflow`]. No partial graph is returned.
///
/// # Example
///
/// ```
/// use u_timegraph::graph::{build_graph, EdgeKind};
/// use u_timegraph::models::NetworkConfig;
///
/// let graph = build_graph(&NetworkConfig::three_hub_example()).unwrap();
/// assert_eq!(graph.edge_count(), 25);
/// assert_eq!(graph.edge_count_by_kind(EdgeKind::Split), 12);
/// ```
pub fn build_graph(config: &NetworkConfig) -> GraphResult<TimeExpandedGraph> {
    validate_config(config).map_err(GraphError::InvalidConfig)?;

    let index = NodeIndex::for_config(config);
    let passes = Passes { config, index };

    let mut counter = DegreeCounter::new(index.node_count());
    let counts = passes.emit(&mut counter)?;
    for (kind, n) in counts {
        debug!(?kind, edges = n, "counted edges");
    }

    let mut filler: CsrFiller = counter
        .into_filler(config.max_out_degree)
        .inspect_err(|e| warn!(error = %e, "edge storage overflow"))?;
    passes.emit(&mut filler)?;
    let graph = filler.finish(index);

    info!(
        hubs = index.hubs(),
        horizon = index.horizon(),
        transit_slots = index.transit_slots(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built time-expanded graph"
    );
    Ok(graph)
}

struct Passes<'a> {
    config: &'a NetworkConfig,
    index: NodeIndex,
}

impl Passes<'_> {
    /// Runs all passes into `sink`, returning the edge count per kind.
    fn emit<S: EdgeSink>(&self, sink: &mut S) -> GraphResult<[(EdgeKind, usize); 5]> {
        let split = self.split(sink)?;
        let wait = self.wait(sink)?;
        let restricted = self.restricted(sink)?;
        let ordinary = self.ordinary(sink)?;
        Ok([
            (EdgeKind::Split, split),
            (EdgeKind::Wait, wait),
            (EdgeKind::Departure, restricted),
            (EdgeKind::Arrival, restricted),
            (EdgeKind::Ordinary, ordinary),
        ])
    }

    fn split<S: EdgeSink>(&self, sink: &mut S) -> GraphResult<usize> {
        let mut n = 0;
        for t in 0..=self.config.horizon {
            for (u, hub) in self.config.hubs.iter().enumerate() {
                let from = self.index.entry_node(u, t)?;
                let to = self.index.exit_node(u, t)?;
                sink.add_edge(from, to, hub.capacity, EdgeKind::Split)?;
                n += 1;
            }
        }
        Ok(n)
    }

    fn wait<S: EdgeSink>(&self, sink: &mut S) -> GraphResult<usize> {
        let mut n = 0;
        for t in 0..self.config.horizon {
            for u in self.config.wait_capable_hubs() {
                let capacity = self.config.wait_capacity_for(&self.config.hubs[u]);
                let from = self.index.exit_node(u, t)?;
                let to = self.index.entry_node(u, t + 1)?;
                sink.add_edge(from, to, capacity, EdgeKind::Wait)?;
                n += 1;
            }
        }
        Ok(n)
    }

    /// Emits departure/arrival pairs, returning the number of pairs.
    fn restricted<S: EdgeSink>(&self, sink: &mut S) -> GraphResult<usize> {
        let mut n = 0;
        for r in &self.config.restricted {
            let arrival_capacity = self.config.arrival_capacity_for(r);
            for t in r.departures(self.config.horizon) {
                let arrival = t + r.delay;
                let slot = self.index.transit_node(r.id, arrival)?;
                let from = self.index.exit_node(r.origin, t)?;
                let to = self.index.entry_node(r.destination, arrival)?;
                sink.add_edge(from, slot, r.capacity, EdgeKind::Departure)?;
                sink.add_edge(slot, to, arrival_capacity, EdgeKind::Arrival)?;
                n += 1;
            }
        }
        Ok(n)
    }

    fn ordinary<S: EdgeSink>(&self, sink: &mut S) -> GraphResult<usize> {
        let mut n = 0;
        for c in &self.config.connections {
            for t in 0..self.config.horizon {
                let from = self.index.exit_node(c.origin, t)?;
                let to = self.index.entry_node(c.destination, t + 1)?;
                sink.add_edge(from, to, c.capacity, EdgeKind::Ordinary)?;
                n += 1;
            }
        }
        Ok(n)
    }
}
