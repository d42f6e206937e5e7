//! Static hub topology and lowering into a network configuration.
//!
//! # Lowering rules
//!
//! - Blocked hubs and every connection touching them are removed; the
//!   remaining hubs are numbered `0..` in file order.
//! - Slot capacity is `max_drones`; the start and end hubs hold the whole
//!   fleet (`nb_drones`).
//! - Every hub allows waiting.
//! - Each undirected connection yields one directed link per direction.
//!   A direction entering a restricted hub becomes a restricted
//!   connection with the default delay
//!   ([`DEFAULT_RESTRICTED_DELAY`](crate::models::DEFAULT_RESTRICTED_DELAY):
//!   one turn in transit, one on arrival); any other becomes an ordinary
//!   connection. Link capacity is `max_link_capacity`.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, info};

use super::{FlightMap, MapError, Zone};
use crate::graph::{build_graph, TimeExpandedGraph};
use crate::models::{
    Capacity, Connection, Hub, HubId, NetworkConfig, RestrictedConnection, TimeStep,
};

/// One direction of an undirected hub link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubLink {
    pub to: HubId,
    pub capacity: Capacity,
}

/// Undirected adjacency over the hubs of a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubGraph {
    adjacency: Vec<Vec<HubLink>>,
}

impl HubGraph {
    /// Builds the adjacency for `map`, with hub ids in `map.hubs` order.
    pub fn from_map(map: &FlightMap) -> Result<Self, MapError> {
        let ids = hub_ids(map);
        let mut adjacency = vec![Vec::new(); map.hubs.len()];
        for c in &map.connections {
            let a = lookup(&ids, &c.a)?;
            let b = lookup(&ids, &c.b)?;
            let capacity = c.max_link_capacity;
            adjacency[a].push(HubLink { to: b, capacity });
            adjacency[b].push(HubLink { to: a, capacity });
        }
        Ok(Self { adjacency })
    }

    /// Number of hubs.
    pub fn hub_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Links leaving `hub`.
    pub fn links(&self, hub: HubId) -> &[HubLink] {
        self.adjacency.get(hub).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `end` is reachable from `start` (breadth-first search).
    pub fn has_path(&self, start: HubId, end: HubId) -> bool {
        let n = self.hub_count();
        if start >= n || end >= n {
            return false;
        }
        if start == end {
            return true;
        }

        let mut visited = vec![false; n];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(current) = queue.pop_front() {
            for link in &self.adjacency[current] {
                if link.to == end {
                    return true;
                }
                if !visited[link.to] {
                    visited[link.to] = true;
                    queue.push_back(link.to);
                }
            }
        }
        false
    }
}

/// A map lowered into a network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapNetwork {
    pub config: NetworkConfig,
    /// Hub names, indexed by [`HubId`].
    pub hub_names: Vec<String>,
    pub start: HubId,
    pub end: HubId,
    /// Flow to route from `start` to `end`.
    pub demand: Capacity,
}

impl MapNetwork {
    /// Id of the hub called `name`.
    pub fn hub_id(&self, name: &str) -> Option<HubId> {
        self.hub_names.iter().position(|n| n == name)
    }

    /// Builds the time-expanded graph of the lowered map.
    pub fn build(&self) -> Result<TimeExpandedGraph, MapError> {
        Ok(build_graph(&self.config)?)
    }
}

impl FlightMap {
    /// Copy of the map without blocked hubs and their connections.
    pub fn pruned(&self) -> FlightMap {
        let hubs: Vec<_> = self
            .hubs
            .iter()
            .filter(|h| h.zone != Zone::Blocked)
            .cloned()
            .collect();
        let kept = |name: &str| hubs.iter().any(|h| h.name == name);
        let connections = self
            .connections
            .iter()
            .filter(|c| kept(&c.a) && kept(&c.b))
            .cloned()
            .collect();

        debug!(
            removed_hubs = self.hubs.len() - hubs.len(),
            "pruned blocked hubs"
        );
        FlightMap {
            nb_drones: self.nb_drones,
            start_hub: self.start_hub.clone(),
            end_hub: self.end_hub.clone(),
            hubs,
            connections,
        }
    }

    /// Lowers the map into a [`NetworkConfig`] over `[0, horizon]`.
    ///
    /// Fails when the start or end hub is blocked or when no path joins
    /// them once blocked hubs are gone.
    pub fn to_network(&self, horizon: TimeStep) -> Result<MapNetwork, MapError> {
        for (role, name) in [("start", &self.start_hub), ("end", &self.end_hub)] {
            if self.hub(name).map(|h| h.zone) == Some(Zone::Blocked) {
                return Err(MapError::Blocked {
                    role,
                    name: name.clone(),
                });
            }
        }

        let map = self.pruned();
        let ids = hub_ids(&map);
        let start = lookup(&ids, &map.start_hub)?;
        let end = lookup(&ids, &map.end_hub)?;

        if !HubGraph::from_map(&map)?.has_path(start, end) {
            return Err(MapError::NoPath {
                start: map.start_hub.clone(),
                end: map.end_hub.clone(),
            });
        }

        let mut config = NetworkConfig::new(horizon).with_hubs(map.hubs.iter().map(|h| {
            let capacity = match h.zone {
                Zone::Start | Zone::End => map.nb_drones,
                _ => h.max_drones,
            };
            Hub::new(h.name.clone()).with_capacity(capacity).waiting()
        }));

        for c in &map.connections {
            let a = lookup(&ids, &c.a)?;
            let b = lookup(&ids, &c.b)?;
            for (from, to) in [(a, b), (b, a)] {
                let capacity = c.max_link_capacity;
                config = if map.hubs[to].zone == Zone::Restricted {
                    let id = config.restricted.len();
                    config.with_restricted(
                        RestrictedConnection::new(id, from, to).with_capacity(capacity),
                    )
                } else {
                    config.with_connection(Connection::new(from, to).with_capacity(capacity))
                };
            }
        }

        info!(
            hubs = config.hub_count(),
            connections = config.connections.len(),
            restricted = config.restricted.len(),
            horizon,
            "lowered map"
        );
        Ok(MapNetwork {
            config,
            hub_names: map.hubs.iter().map(|h| h.name.clone()).collect(),
            start,
            end,
            demand: map.nb_drones,
        })
    }
}

fn hub_ids(map: &FlightMap) -> HashMap<&str, HubId> {
    map.hubs
        .iter()
        .enumerate()
        .map(|(id, h)| (h.name.as_str(), id))
        .collect()
}

fn lookup(ids: &HashMap<&str, HubId>, name: &str) -> Result<HubId, MapError> {
    ids.get(name)
        .copied()
        .ok_or_else(|| MapError::UnknownHub(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;
    use crate::map::parse_map;
    use crate::models::DEFAULT_RESTRICTED_DELAY;

    const FORK: &str = "\
nb_drones: 3
start_hub: start 0 0
hub: north 1 1 [zone=restricted max_drones=2]
hub: south 1 -1 [zone=blocked]
hub: mid 2 0 [zone=priority]
end_hub: goal 3 0
connection: start-north [max_link_capacity=2]
connection: start-south
connection: south-goal
connection: north-mid
connection: mid-goal
";

    #[test]
    fn test_hub_graph_adjacency() {
        let map = parse_map(FORK).unwrap();
        let g = HubGraph::from_map(&map).unwrap();
        assert_eq!(g.hub_count(), 5);
        let degrees: Vec<_> = (0..5).map(|h| g.links(h).len()).collect();
        assert_eq!(degrees, vec![2, 2, 2, 2, 2]);
        assert_eq!(g.links(0)[0], HubLink { to: 1, capacity: 2 });
        assert_eq!(g.links(1)[0], HubLink { to: 0, capacity: 2 });
        assert!(g.links(42).is_empty());
    }

    #[test]
    fn test_has_path() {
        let map = parse_map(FORK).unwrap();
        let g = HubGraph::from_map(&map).unwrap();
        assert!(g.has_path(0, 4));
        assert!(g.has_path(2, 2));
        assert!(!g.has_path(0, 9));

        let isolated = parse_map("nb_drones: 1\nstart_hub: s 0 0\nend_hub: e 1 1").unwrap();
        assert!(!HubGraph::from_map(&isolated).unwrap().has_path(0, 1));
    }

    #[test]
    fn test_pruned_reindexes() {
        let map = parse_map(FORK).unwrap().pruned();
        let names: Vec<_> = map.hubs.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["start", "north", "mid", "goal"]);
        assert_eq!(map.connections.len(), 3);
    }

    #[test]
    fn test_to_network_lowering() {
        let net = parse_map(FORK).unwrap().to_network(6).unwrap();
        let cfg = &net.config;

        assert_eq!(net.hub_names, vec!["start", "north", "mid", "goal"]);
        assert_eq!((net.start, net.end, net.demand), (0, 3, 3));
        assert_eq!(net.hub_id("mid"), Some(2));

        let caps: Vec<_> = cfg.hubs.iter().map(|h| h.capacity).collect();
        assert_eq!(caps, vec![3, 2, 1, 3]);
        assert!(cfg.hubs.iter().all(|h| h.wait_capable));

        // start→north and mid→north enter the restricted hub.
        assert_eq!(cfg.restricted.len(), 2);
        assert_eq!(cfg.restricted[0], RestrictedConnection::new(0, 0, 1).with_capacity(2));
        assert_eq!((cfg.restricted[1].origin, cfg.restricted[1].destination), (2, 1));
        assert_eq!(cfg.restricted[1].id, 1);
        assert!(cfg.restricted.iter().all(|r| r.delay == DEFAULT_RESTRICTED_DELAY));

        // north→start, north→mid, mid→goal, goal→mid.
        assert_eq!(cfg.connections.len(), 4);
        assert!(cfg.connections.contains(&Connection::new(1, 0).with_capacity(2)));
        assert!(cfg.connections.contains(&Connection::new(2, 3)));
    }

    #[test]
    fn test_lowered_map_builds() {
        let net = parse_map(FORK).unwrap().to_network(4).unwrap();
        let g = net.build().unwrap();
        // Departures t ∈ {0,1,2} for each of the two restricted links.
        assert_eq!(g.edge_count_by_kind(EdgeKind::Departure), 6);
        assert_eq!(g.edge_count_by_kind(EdgeKind::Arrival), 6);
        assert_eq!(g.edge_count_by_kind(EdgeKind::Ordinary), 4 * 4);
        assert_eq!(g.edge_count_by_kind(EdgeKind::Wait), 4 * 4);
    }

    #[test]
    fn test_blocked_endpoint_rejected() {
        let text = "nb_drones: 1\nstart_hub: s 0 0\nend_hub: e 1 1\nconnection: s-e";
        let mut map = parse_map(text).unwrap();
        map.hubs[1].zone = Zone::Blocked;
        assert!(matches!(
            map.to_network(3),
            Err(MapError::Blocked { role: "end", .. })
        ));
    }

    #[test]
    fn test_no_path_after_pruning() {
        let text = "\
nb_drones: 1
start_hub: s 0 0
hub: wall 1 0 [zone=blocked]
end_hub: e 2 0
connection: s-wall
connection: wall-e
";
        let map = parse_map(text).unwrap();
        assert!(matches!(map.to_network(5), Err(MapError::NoPath { .. })));
    }
}
