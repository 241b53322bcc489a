// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Client-side state reconstructed purely from a step trace.
//!
//! This is what a presentation layer keeps per node while playing a trace
//! back. It is never owned by the graph or the algorithms.

use std::collections::BTreeMap;

use crate::common::NodeId;
use crate::step::{Step, StepKind};

/// Per-node replay state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeVisual {
    pub visited: bool,
    pub on_stack: bool,
    pub queued: bool,
    pub dequeued: bool,
    pub scc: Option<usize>,
    pub in_degree: Option<usize>,
}

impl NodeVisual {
    fn clear_transient(&mut self) {
        self.visited = false;
        self.on_stack = false;
        self.queued = false;
        self.dequeued = false;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraceState {
    pub nodes: BTreeMap<NodeId, NodeVisual>,
    pub condensed_edges: Vec<(NodeId, NodeId)>,
    pub dequeue_order: Vec<NodeId>,
    /// Number of steps folded so far.
    pub applied: usize,
}

impl TraceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a whole trace into a blank state.
    pub fn replay<'a>(steps: impl IntoIterator<Item = &'a Step>) -> Self {
        let mut state = TraceState::new();
        for step in steps {
            state.apply(step);
        }
        state
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeVisual> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeVisual {
        self.nodes.entry(id).or_default()
    }

    pub fn apply(&mut self, step: &Step) {
        use StepKind::*;
        self.applied += 1;
        match step.kind {
            ResetVisualization { clear_persistent } => {
                if clear_persistent {
                    self.nodes.clear();
                    self.condensed_edges.clear();
                    self.dequeue_order.clear();
                } else {
                    self.nodes.values_mut().for_each(NodeVisual::clear_transient);
                }
            }
            Visit { u } => self.node_mut(u).visited = true,
            PushStack { u } => self.node_mut(u).on_stack = true,
            PopStack { u } => self.node_mut(u).on_stack = false,
            AssignScc { u, scc_id } => self.node_mut(u).scc = Some(scc_id),
            BuildCondensedEdge { u, v } => self.condensed_edges.push((u, v)),
            InitInDegree { u, in_degree } | DecrementInDegree { v: u, in_degree, .. } => {
                self.node_mut(u).in_degree = Some(in_degree)
            }
            Enqueue { u } => self.node_mut(u).queued = true,
            Dequeue { u } => {
                let node = self.node_mut(u);
                node.queued = false;
                node.dequeued = true;
                self.dequeue_order.push(u);
            }
        }
    }

    /// SCC id per node `1..=n`, `None` where no assignment was replayed.
    pub fn scc_ids(&self, n: usize) -> Vec<Option<usize>> {
        (1..=n)
            .map(|id| self.nodes.get(&id).and_then(|v| v.scc))
            .collect()
    }

    pub fn in_degrees(&self, n: usize) -> Vec<Option<usize>> {
        (1..=n)
            .map(|id| self.nodes.get(&id).and_then(|v| v.in_degree))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::{pipeline, scc, topo};

    #[test]
    fn test_replay_scc_matches_result() {
        let g = Graph::from_edges(5, &[(1, 2), (2, 1), (2, 3), (3, 4), (4, 5), (5, 4)]).unwrap();
        let r = scc::run(&g);
        let state = TraceState::replay(&r.steps);
        assert_eq!(
            state.scc_ids(5),
            r.scc_ids.iter().map(|&c| Some(c)).collect::<Vec<_>>()
        );
        assert!(state.nodes.values().all(|v| v.visited && !v.on_stack));
        assert_eq!(state.applied, r.steps.len());
    }

    #[test]
    fn test_replay_topo_matches_result() {
        let g = Graph::from_edges(4, &[(1, 2), (1, 3), (2, 4), (3, 4)]).unwrap();
        let r = topo::run(&g);
        let state = TraceState::replay(&r.steps);
        assert_eq!(state.dequeue_order, r.order);
        assert_eq!(state.in_degrees(4), vec![Some(0); 4]);
        assert!(state.nodes.values().all(|v| v.dequeued && !v.queued));
    }

    #[test]
    fn test_reset_transient_keeps_scc() {
        let g = Graph::from_edges(2, &[(1, 2), (2, 1)]).unwrap();
        let a = pipeline::analyze(&g);
        let scc_len = a.scc.steps.len();
        let trace = a.combined_trace();

        // up to and including the transient reset
        let state = TraceState::replay(&trace[..scc_len + 2]);
        let node = state.node(1).unwrap();
        assert!(!node.visited);
        assert_eq!(node.scc, Some(1));

        // the full trace ends on the topo phase of the condensed graph
        let state = TraceState::replay(&trace);
        assert_eq!(state.dequeue_order, vec![1]);
        assert_eq!(state.node(1).unwrap().scc, None);
        assert!(state.node(2).is_none());
    }
}
