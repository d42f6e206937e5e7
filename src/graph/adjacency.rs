//! Adjacency storage.
//!
//! The graph is stored in CSR (compressed sparse row) form: `first_out[v]`
//! is the position of node `v`'s first outgoing edge in the flat `head`,
//! `capacity` and `kind` arrays, and `first_out[v + 1]` is one past its
//! last. Storage is sized exactly in two passes: the builder runs once
//! into a [`DegreeCounter`], then again into the [`CsrFiller`] it
//! produces. Within a node, edges keep the order they were added in.

use std::fmt;

use serde::Serialize;

use crate::error::{GraphError, GraphResult};
use crate::models::Capacity;

use super::{NodeId, NodeIndex};

/// Category of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Entry → exit of one hub-time instant (hub slot capacity).
    Split,
    /// Exit at `t` → entry at `t + 1` of the same hub.
    Wait,
    /// Origin exit → transit slot (first restricted stage).
    Departure,
    /// Transit slot → destination entry (second restricted stage).
    Arrival,
    /// Origin exit at `t` → destination entry at `t + 1`.
    Ordinary,
}

/// A directed capacitated edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub capacity: Capacity,
    pub kind: EdgeKind,
}

/// An immutable time-expanded capacity graph.
///
/// Produced by [`build_graph`](super::build_graph). Readers address it
/// purely by node id over `[0, node_count)`; [`index`](Self::index) is
/// only needed to interpret ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeExpandedGraph {
    index: NodeIndex,
    first_out: Vec<usize>,
    head: Vec<NodeId>,
    capacity: Vec<Capacity>,
    kind: Vec<EdgeKind>,
}

impl TimeExpandedGraph {
    /// Id space the graph was built over.
    #[inline]
    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.first_out.len() - 1
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.head.len()
    }

    /// Number of outgoing edges of `node` (0 outside the id range).
    pub fn out_degree(&self, node: NodeId) -> usize {
        let range = self.edge_range(node);
        range.end - range.start
    }

    /// Calls `visit(destination, capacity)` for every outgoing edge of
    /// `node`, in insertion order.
    pub fn for_each_edge<F>(&self, node: NodeId, mut visit: F)
    where
        F: FnMut(NodeId, Capacity),
    {
        for e in self.edge_range(node) {
            visit(self.head[e], self.capacity[e]);
        }
    }

    /// Outgoing edges of `node`, in insertion order.
    pub fn edges(&self, node: NodeId) -> impl Iterator<Item = Edge> + '_ {
        self.edge_range(node).map(move |e| Edge {
            from: node,
            to: self.head[e],
            capacity: self.capacity[e],
            kind: self.kind[e],
        })
    }

    /// Every edge, ordered by source node.
    pub fn all_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.node_count()).flat_map(move |v| self.edges(v))
    }

    /// Number of edges of the given kind.
    pub fn edge_count_by_kind(&self, kind: EdgeKind) -> usize {
        self.kind.iter().filter(|&&k| k == kind).count()
    }

    /// Edges from `from` to `to`.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = Edge> + '_ {
        self.edges(from).filter(move |e| e.to == to)
    }

    /// Whether at least one edge runs from `from` to `to`.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edges_between(from, to).next().is_some()
    }

    fn edge_range(&self, node: NodeId) -> std::ops::Range<usize> {
        if node < self.node_count() {
            self.first_out[node]..self.first_out[node + 1]
        } else {
            0..0
        }
    }
}

/// Debug listing: every node with outgoing edges, one edge per line.
impl fmt::Display for TimeExpandedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in 0..self.node_count() {
            if self.out_degree(v) == 0 {
                continue;
            }
            writeln!(f, "Node {v}:")?;
            for e in self.edges(v) {
                writeln!(f, "   -> {} (cap={})", e.to, e.capacity)?;
            }
        }
        Ok(())
    }
}

/// Receiver of edges emitted by the build passes.
pub(crate) trait EdgeSink {
    fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
        kind: EdgeKind,
    ) -> GraphResult<()>;
}

/// First pass: counts outgoing edges per node.
pub(crate) struct DegreeCounter {
    degrees: Vec<usize>,
}

impl DegreeCounter {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            degrees: vec![0; node_count],
        }
    }

    /// Allocates exact storage for the counted edges.
    ///
    /// Fails with [`GraphError::ConfigurationOverflow`] when some node's
    /// degree exceeds `limit`.
    pub(crate) fn into_filler(self, limit: Option<usize>) -> GraphResult<CsrFiller> {
        if let Some(limit) = limit {
            let over = self.degrees.iter().enumerate().find(|&(_, &d)| d > limit);
            if let Some((node, &degree)) = over {
                return Err(GraphError::ConfigurationOverflow {
                    node,
                    degree,
                    limit,
                });
            }
        }

        let mut first_out = Vec::with_capacity(self.degrees.len() + 1);
        let mut total = 0;
        first_out.push(0);
        for d in &self.degrees {
            total += d;
            first_out.push(total);
        }

        Ok(CsrFiller {
            cursor: first_out[..self.degrees.len()].to_vec(),
            first_out,
            head: vec![0; total],
            capacity: vec![0; total],
            kind: vec![EdgeKind::Split; total],
        })
    }
}

impl EdgeSink for DegreeCounter {
    fn add_edge(&mut self, from: NodeId, _: NodeId, _: Capacity, _: EdgeKind) -> GraphResult<()> {
        self.degrees[from] += 1;
        Ok(())
    }
}

/// Second pass: writes edges into storage sized by [`DegreeCounter`].
pub(crate) struct CsrFiller {
    first_out: Vec<usize>,
    cursor: Vec<usize>,
    head: Vec<NodeId>,
    capacity: Vec<Capacity>,
    kind: Vec<EdgeKind>,
}

impl CsrFiller {
    pub(crate) fn finish(self, index: NodeIndex) -> TimeExpandedGraph {
        debug_assert!(self
            .cursor
            .iter()
            .zip(&self.first_out[1..])
            .all(|(c, end)| c == end));
        TimeExpandedGraph {
            index,
            first_out: self.first_out,
            head: self.head,
            capacity: self.capacity,
            kind: self.kind,
        }
    }
}

impl EdgeSink for CsrFiller {
    fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
        kind: EdgeKind,
    ) -> GraphResult<()> {
        let (start, end) = (self.first_out[from], self.first_out[from + 1]);
        let slot = self.cursor[from];
        if slot >= end {
            return Err(GraphError::ConfigurationOverflow {
                node: from,
                degree: slot - start + 1,
                limit: end - start,
            });
        }
        self.head[slot] = to;
        self.capacity[slot] = capacity;
        self.kind[slot] = kind;
        self.cursor[from] += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> TimeExpandedGraph {
        // Two hubs, one time step, no transit slots: nodes 0..4.
        let index = NodeIndex::new(2, 0, 0);
        let edges = [
            (0, 1, 1, EdgeKind::Split),
            (2, 3, 2, EdgeKind::Split),
            (1, 2, 5, EdgeKind::Ordinary),
            (1, 3, 7, EdgeKind::Ordinary),
        ];

        let mut counter = DegreeCounter::new(index.node_count());
        for &(f, t, c, k) in &edges {
            counter.add_edge(f, t, c, k).unwrap();
        }
        let mut filler = counter.into_filler(None).unwrap();
        for &(f, t, c, k) in &edges {
            filler.add_edge(f, t, c, k).unwrap();
        }
        filler.finish(index)
    }

    #[test]
    fn test_csr_layout() {
        let g = tiny();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.out_degree(0), 1);
        assert_eq!(g.out_degree(1), 2);
        assert_eq!(g.out_degree(3), 0);
        assert_eq!(g.out_degree(99), 0);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let g = tiny();
        let mut seen = Vec::new();
        g.for_each_edge(1, |to, cap| seen.push((to, cap)));
        assert_eq!(seen, vec![(2, 5), (3, 7)]);
    }

    #[test]
    fn test_edge_queries() {
        let g = tiny();
        assert!(g.has_edge(0, 1));
        assert!(!g.has_edge(1, 0));
        assert_eq!(g.edge_count_by_kind(EdgeKind::Split), 2);
        assert_eq!(g.edge_count_by_kind(EdgeKind::Wait), 0);
        assert_eq!(g.all_edges().count(), 4);
        assert_eq!(g.edges_between(1, 3).next().unwrap().capacity, 7);
    }

    #[test]
    fn test_display_format() {
        let g = tiny();
        let expected = "Node 0:\n   -> 1 (cap=1)\n\
                        Node 1:\n   -> 2 (cap=5)\n   -> 3 (cap=7)\n\
                        Node 2:\n   -> 3 (cap=2)\n";
        assert_eq!(g.to_string(), expected);
    }

    #[test]
    fn test_degree_limit_overflow() {
        let mut counter = DegreeCounter::new(3);
        for to in [1, 2] {
            counter.add_edge(0, to, 1, EdgeKind::Ordinary).unwrap();
        }
        let err = counter.into_filler(Some(1)).err().unwrap();
        assert_eq!(
            err,
            GraphError::ConfigurationOverflow {
                node: 0,
                degree: 2,
                limit: 1
            }
        );
    }

    #[test]
    fn test_filler_rejects_uncounted_edge() {
        let mut counter = DegreeCounter::new(2);
        counter.add_edge(0, 1, 1, EdgeKind::Split).unwrap();
        let mut filler = counter.into_filler(None).unwrap();
        filler.add_edge(0, 1, 1, EdgeKind::Split).unwrap();

        let err = filler.add_edge(0, 1, 1, EdgeKind::Split).unwrap_err();
        assert!(matches!(
            err,
            GraphError::ConfigurationOverflow {
                node: 0,
                degree: 2,
                limit: 1
            }
        ));
    }
}
