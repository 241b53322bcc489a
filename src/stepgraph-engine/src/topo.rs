// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::VecDeque;

use crate::common::NodeId;
use crate::graph::Graph;
use crate::step::Step;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopoResult {
    /// False when the input has a cycle. `order` is then only the prefix
    /// Kahn's algorithm managed to release and is not a linearization.
    pub ok: bool,
    pub order: Vec<NodeId>,
    /// Remaining in-degree per node (`[id - 1]`) when the queue ran dry.
    /// All zero iff `ok`.
    pub in_degrees: Vec<usize>,
    pub steps: Vec<Step>,
}

impl TopoResult {
    /// The order, only if it is a full linearization.
    pub fn linearization(&self) -> Option<&[NodeId]> {
        self.ok.then_some(self.order.as_slice())
    }
}

/// Topologically sort `dag` with Kahn's algorithm.
///
/// Ties are broken by a FIFO queue seeded in increasing id order, and
/// successors are released in adjacency order.
pub fn run(dag: &Graph) -> TopoResult {
    let n = dag.node_count();
    let mut indeg = dag.in_degrees();
    let mut steps = Vec::with_capacity(2 * n + 2 * dag.edge_count());

    for u in dag.node_ids() {
        steps.push(Step::init_in_degree(u, indeg[u - 1]));
    }

    let mut queue = VecDeque::new();
    for u in dag.node_ids() {
        if indeg[u - 1] == 0 {
            queue.push_back(u);
            steps.push(Step::enqueue(u));
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        steps.push(Step::dequeue(u));
        order.push(u);

        for &v in dag.neighbors(u) {
            indeg[v - 1] -= 1;
            steps.push(Step::decrement_in_degree(u, v, indeg[v - 1]));
            if indeg[v - 1] == 0 {
                queue.push_back(v);
                steps.push(Step::enqueue(v));
            }
        }
    }

    let ok = order.len() == n;
    tracing::debug!(nodes = n, ordered = order.len(), ok, "topological sort complete");

    TopoResult {
        ok,
        order,
        in_degrees: indeg,
        steps,
    }
}
