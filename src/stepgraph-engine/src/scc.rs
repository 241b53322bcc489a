// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Strongly connected components (Tarjan), with a step trace.
//!
//! The DFS runs on an explicit frame stack so long chains cannot overflow
//! the call stack. The emitted order is identical to the textbook recursive
//! formulation: `Visit`/`PushStack` on discovery, and `PopStack`/`AssignScc`
//! pairs when a root closes its component. Neighbors are explored in
//! adjacency (insertion) order and SCC ids are handed out from 1 in the
//! order components close.

use crate::common::NodeId;
use crate::graph::Graph;
use crate::step::Step;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SccResult {
    pub scc_count: usize,
    /// `scc_ids[id - 1]` is the component of node `id`, in `1..=scc_count`.
    pub scc_ids: Vec<usize>,
    /// `scc_sizes[c - 1]` is the number of nodes in component `c`.
    pub scc_sizes: Vec<usize>,
    pub steps: Vec<Step>,
}

impl SccResult {
    pub fn scc_id(&self, node: NodeId) -> Option<usize> {
        node.checked_sub(1).and_then(|i| self.scc_ids.get(i)).copied()
    }

    pub fn scc_size(&self, scc_id: usize) -> Option<usize> {
        scc_id
            .checked_sub(1)
            .and_then(|i| self.scc_sizes.get(i))
            .copied()
    }

    /// Members of each component, ordered by SCC id then node id.
    pub fn components(&self) -> Vec<Vec<NodeId>> {
        let mut comps = vec![Vec::new(); self.scc_count];
        for (i, &c) in self.scc_ids.iter().enumerate() {
            comps[c - 1].push(i + 1);
        }
        comps
    }
}

struct Frame {
    node: NodeId,
    next: usize,
}

struct Tarjan<'a> {
    graph: &'a Graph,
    timer: usize,
    // discovery index per node, 0 = undiscovered
    index: Vec<usize>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<NodeId>,
    frames: Vec<Frame>,
    scc_ids: Vec<usize>,
    scc_sizes: Vec<usize>,
    steps: Vec<Step>,
}

impl<'a> Tarjan<'a> {
    fn new(graph: &'a Graph) -> Self {
        let n = graph.node_count();
        Tarjan {
            graph,
            timer: 0,
            index: vec![0; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::with_capacity(n),
            frames: Vec::new(),
            scc_ids: vec![0; n],
            scc_sizes: Vec::new(),
            steps: Vec::with_capacity(4 * n),
        }
    }

    fn run(mut self) -> SccResult {
        for root in self.graph.node_ids() {
            if self.index[root - 1] == 0 {
                self.dfs(root);
            }
        }

        SccResult {
            scc_count: self.scc_sizes.len(),
            scc_ids: self.scc_ids,
            scc_sizes: self.scc_sizes,
            steps: self.steps,
        }
    }

    fn discover(&mut self, u: NodeId) {
        self.timer += 1;
        self.index[u - 1] = self.timer;
        self.low[u - 1] = self.timer;
        self.steps.push(Step::visit(u));

        self.stack.push(u);
        self.on_stack[u - 1] = true;
        self.steps.push(Step::push_stack(u));

        self.frames.push(Frame { node: u, next: 0 });
    }

    fn dfs(&mut self, root: NodeId) {
        self.discover(root);

        while let Some(frame) = self.frames.last_mut() {
            let u = frame.node;
            if let Some(&v) = self.graph.neighbors(u).get(frame.next) {
                frame.next += 1;
                if self.index[v - 1] == 0 {
                    self.discover(v);
                } else if self.on_stack[v - 1] {
                    self.low[u - 1] = self.low[u - 1].min(self.index[v - 1]);
                }
                continue;
            }

            // all neighbors done: this is where the recursive call returns
            self.frames.pop();
            if self.low[u - 1] == self.index[u - 1] {
                self.close_component(u);
            }
            if let Some(parent) = self.frames.last() {
                let p = parent.node;
                self.low[p - 1] = self.low[p - 1].min(self.low[u - 1]);
            }
        }
    }

    fn close_component(&mut self, root: NodeId) {
        self.scc_sizes.push(0);
        let scc_id = self.scc_sizes.len();
        while let Some(x) = self.stack.pop() {
            self.on_stack[x - 1] = false;
            self.steps.push(Step::pop_stack(x));

            self.scc_ids[x - 1] = scc_id;
            self.scc_sizes[scc_id - 1] += 1;
            self.steps.push(Step::assign_scc(x, scc_id));

            if x == root {
                break;
            }
        }
    }
}

/// Compute the strongly connected components of `graph`.
pub fn run(graph: &Graph) -> SccResult {
    let result = Tarjan::new(graph).run();
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        scc_count = result.scc_count,
        steps = result.steps.len(),
        "scc complete"
    );
    result
}
