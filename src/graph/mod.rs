//! Time-expanded capacity graph.
//!
//! - **`index`**: pure mapping from (hub, time) and (restricted
//!   connection, arrival time) to dense node ids.
//! - **`builder`**: [`build_graph`], the single construction entry point.
//! - **`adjacency`**: the immutable CSR graph it returns.
//!
//! Each hub-time instant is split into an entry and an exit node joined
//! by one edge carrying the hub's slot capacity; restricted connections
//! route through transit slot nodes keyed by arrival time.
//!
//! # Reference
//! Ford & Fulkerson (1958), "Constructing Maximal Dynamic Flows from Static Flows"

mod adjacency;
mod builder;
mod index;

pub use adjacency::{Edge, EdgeKind, TimeExpandedGraph};
pub use builder::build_graph;
pub use index::{NodeIndex, NodeKind};

/// Dense node identifier, `[0, node_count)`.
pub type NodeId = usize;
