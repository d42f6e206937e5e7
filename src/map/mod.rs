//! Drone map front end.
//!
//! Reads the line-oriented map format (hubs with coordinates, zones and
//! capacities; undirected connections with link capacities), prunes
//! blocked hubs, checks that the start hub can reach the end hub, and
//! lowers the map into a [`NetworkConfig`](crate::models::NetworkConfig).
//!
//! ```text
//! nb_drones: 2
//! start_hub: base 0 0
//! end_hub: goal 4 0
//! hub: tower 2 0 [zone=restricted max_drones=2]
//! connection: base-tower
//! connection: tower-goal [max_link_capacity=2]
//! ```

mod parser;
mod topology;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::error::GraphError;
use crate::models::Capacity;

pub use parser::parse_map;
pub use topology::{HubGraph, HubLink, MapNetwork};

/// Zone type of a map hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Zone {
    /// Costs one turn.
    #[default]
    Normal,
    /// Impassable; pruned before lowering.
    Blocked,
    /// Entering costs two turns.
    Restricted,
    /// Costs one turn, preferred over normal.
    Priority,
    /// Where all drones start.
    Start,
    /// Where all drones must arrive.
    End,
}

impl Zone {
    /// Name used in map files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Normal => "normal",
            Zone::Blocked => "blocked",
            Zone::Restricted => "restricted",
            Zone::Priority => "priority",
            Zone::Start => "start_hub",
            Zone::End => "end_hub",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = String;

    /// Parses a `zone=` metadata value. Start and end zones come from
    /// their directives and are not accepted here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Zone::Normal),
            "blocked" => Ok(Zone::Blocked),
            "restricted" => Ok(Zone::Restricted),
            "priority" => Ok(Zone::Priority),
            other => Err(format!("invalid zone type: {other}")),
        }
    }
}

/// A hub as written in a map file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHub {
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub zone: Zone,
    /// Display color name, kept verbatim.
    pub color: Option<String>,
    /// Drones the hub holds at once (default: 1).
    pub max_drones: Capacity,
}

/// An undirected link between two named hubs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConnection {
    pub a: String,
    pub b: String,
    /// Drones that may traverse the link at once, in each direction (default: 1).
    pub max_link_capacity: Capacity,
}

/// A parsed drone map.
///
/// `hubs` lists every hub in file order, including the start and end hubs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightMap {
    pub nb_drones: Capacity,
    pub start_hub: String,
    pub end_hub: String,
    pub hubs: Vec<MapHub>,
    pub connections: Vec<MapConnection>,
}

impl FlightMap {
    /// Reads and parses a map file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        parse_map(&text)
    }

    /// Looks up a hub by name.
    pub fn hub(&self, name: &str) -> Option<&MapHub> {
        self.hubs.iter().find(|h| h.name == name)
    }
}

impl FromStr for FlightMap {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_map(s)
    }
}

/// Errors raised while reading or lowering a map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("cannot read map: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("missing required directive(s): {0}")]
    Missing(String),
    #[error("duplicate hub name '{0}'")]
    DuplicateHub(String),
    #[error("connection references unknown hub '{0}'")]
    UnknownHub(String),
    #[error("{role} hub '{name}' is blocked")]
    Blocked { role: &'static str, name: String },
    #[error("no path from '{start}' to '{end}'")]
    NoPath { start: String, end: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
}
