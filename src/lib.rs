//! Time-expanded capacity graphs for the U-Engine ecosystem.
//!
//! Models scheduling/flow problems where hubs have a per-time-step
//! throughput limit, may or may not let flow wait, and some connections
//! enforce a minimum transit delay. The output is a plain capacitated
//! adjacency structure; solving flow over it is left to an external solver.
//!
//! # Modules
//!
//! - **`models`**: Configuration types: `Hub`, `Connection`,
//!   `RestrictedConnection`, `NetworkConfig`
//! - **`validation`**: Configuration integrity checks (hub references,
//!   capacities, delays, transit id space)
//! - **`graph`**: Node id space, the graph builder, and the CSR graph
//! - **`map`**: Drone map parser and lowering into a `NetworkConfig`
//!
//! # Example
//!
//! ```
//! use u_timegraph::graph::build_graph;
//! use u_timegraph::models::{Connection, Hub, NetworkConfig, RestrictedConnection};
//!
//! let config = NetworkConfig::new(3)
//!     .with_hub(Hub::new("a").waiting())
//!     .with_hub(Hub::new("b"))
//!     .with_restricted(RestrictedConnection::new(0, 0, 1))
//!     .with_connection(Connection::new(1, 0));
//!
//! let graph = build_graph(&config).unwrap();
//! let exit = graph.index().exit_node(0, 0).unwrap();
//! graph.for_each_edge(exit, |to, cap| println!("{exit} -> {to} (cap={cap})"));
//! ```
//!
//! # References
//!
//! - Ford & Fulkerson (1962), "Flows in Networks", Ch. III
//! - Skutella (2009), "An Introduction to Network Flows Over Time"

pub mod error;
pub mod graph;
pub mod map;
pub mod models;
pub mod validation;

pub use error::{GraphError, GraphResult};
