// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::ops::RangeInclusive;

use crate::common::{NodeId, Result};
use crate::graph_err;

/// Directed graph over nodes `1..=n`.
///
/// Adjacency lists and the edge list both preserve insertion order, which is
/// what makes every algorithm trace in this crate deterministic. Parallel
/// edges and self-loops are stored as given; deduplication is the caller's
/// job (see [`Graph::try_add_unique_edge`]). Nodes and edges are never
/// removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    n: usize,
    adj: Vec<Vec<NodeId>>,
    edges: Vec<(NodeId, NodeId)>,
}

impl Graph {
    pub fn new(n: usize) -> Self {
        Graph {
            n,
            adj: vec![Vec::new(); n],
            edges: Vec::new(),
        }
    }

    /// Build a graph from an edge list, rejecting any endpoint outside `1..=n`.
    pub fn from_edges(n: usize, edges: &[(NodeId, NodeId)]) -> Result<Self> {
        let mut graph = Graph::new(n);
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.n
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id >= 1 && id <= self.n
    }

    pub fn node_ids(&self) -> RangeInclusive<NodeId> {
        1..=self.n
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Outgoing neighbors of `u` in insertion order. Empty for unknown ids.
    pub fn neighbors(&self, u: NodeId) -> &[NodeId] {
        if self.contains(u) {
            &self.adj[u - 1]
        } else {
            &[]
        }
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.neighbors(u).contains(&v)
    }

    /// Append a new node and return its id (`n + 1`).
    pub fn add_node(&mut self) -> NodeId {
        self.n += 1;
        self.adj.push(Vec::new());
        self.n
    }

    /// Append `u -> v`. Only the endpoint range is validated.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<()> {
        self.check_range(u, v)?;
        self.adj[u - 1].push(v);
        self.edges.push((u, v));
        Ok(())
    }

    /// Append `u -> v` unless it is a self-loop or already present, reporting
    /// which check failed.
    pub fn try_add_unique_edge(&mut self, u: NodeId, v: NodeId) -> Result<()> {
        self.check_range(u, v)?;
        if u == v {
            return graph_err!(SelfLoop, format!("{u} -> {v}"));
        }
        if self.has_edge(u, v) {
            return graph_err!(DuplicateEdge, format!("{u} -> {v}"));
        }
        self.add_edge(u, v)
    }

    /// In-degree of every node, indexed by `id - 1`.
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut indeg = vec![0; self.n];
        for &(_, v) in &self.edges {
            indeg[v - 1] += 1;
        }
        indeg
    }

    fn check_range(&self, u: NodeId, v: NodeId) -> Result<()> {
        for id in [u, v] {
            if !self.contains(id) {
                return graph_err!(
                    NodeOutOfRange,
                    format!("node {id} not in 1..={}", self.n)
                );
            }
        }
        Ok(())
    }
}
