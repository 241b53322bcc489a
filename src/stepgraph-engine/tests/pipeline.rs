// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;

use stepgraph_engine::{Graph, NodeId, StepKind, TraceState, analyze, condense, scc, topo};

fn graph(n: usize, edges: &[(NodeId, NodeId)]) -> Graph {
    Graph::from_edges(n, edges).unwrap()
}

/// reach[u - 1][v - 1]: v is reachable from u by a path of length >= 0.
fn reachability(g: &Graph) -> Vec<Vec<bool>> {
    let n = g.node_count();
    let mut reach = vec![vec![false; n]; n];
    for s in g.node_ids() {
        let mut queue = VecDeque::from([s]);
        reach[s - 1][s - 1] = true;
        while let Some(u) = queue.pop_front() {
            for &v in g.neighbors(u) {
                if !reach[s - 1][v - 1] {
                    reach[s - 1][v - 1] = true;
                    queue.push_back(v);
                }
            }
        }
    }
    reach
}

/// Textbook recursive Tarjan, emitting the same step kinds.
struct RecursiveTarjan<'a> {
    g: &'a Graph,
    timer: usize,
    index: Vec<usize>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<NodeId>,
    next_id: usize,
    steps: Vec<StepKind>,
}

impl RecursiveTarjan<'_> {
    fn trace(g: &Graph) -> Vec<StepKind> {
        let n = g.node_count();
        let mut t = RecursiveTarjan {
            g,
            timer: 0,
            index: vec![0; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next_id: 0,
            steps: Vec::new(),
        };
        for u in g.node_ids() {
            if t.index[u - 1] == 0 {
                t.visit(u);
            }
        }
        t.steps
    }

    fn visit(&mut self, u: NodeId) {
        self.timer += 1;
        self.index[u - 1] = self.timer;
        self.low[u - 1] = self.timer;
        self.steps.push(StepKind::Visit { u });
        self.stack.push(u);
        self.on_stack[u - 1] = true;
        self.steps.push(StepKind::PushStack { u });

        let g = self.g;
        for &v in g.neighbors(u) {
            if self.index[v - 1] == 0 {
                self.visit(v);
                self.low[u - 1] = self.low[u - 1].min(self.low[v - 1]);
            } else if self.on_stack[v - 1] {
                self.low[u - 1] = self.low[u - 1].min(self.index[v - 1]);
            }
        }

        if self.low[u - 1] == self.index[u - 1] {
            self.next_id += 1;
            while let Some(x) = self.stack.pop() {
                self.on_stack[x - 1] = false;
                self.steps.push(StepKind::PopStack { u: x });
                self.steps.push(StepKind::AssignScc {
                    u: x,
                    scc_id: self.next_id,
                });
                if x == u {
                    break;
                }
            }
        }
    }
}

fn assert_valid_order(g: &Graph, order: &[NodeId]) {
    assert_eq!(order.len(), g.node_count());
    let mut pos = vec![usize::MAX; g.node_count()];
    for (i, &u) in order.iter().enumerate() {
        assert_eq!(pos[u - 1], usize::MAX, "node {u} appears twice");
        pos[u - 1] = i;
    }
    for &(u, v) in g.edges() {
        assert!(pos[u - 1] < pos[v - 1], "edge {u} -> {v} out of order");
    }
}

#[test]
fn scenario_a_acyclic_chain() {
    let g = graph(4, &[(1, 2), (2, 3), (3, 4), (1, 3)]);
    let a = analyze(&g);

    assert_eq!(a.scc.scc_count, 4);
    assert_eq!(a.condensed.dag.node_count(), 4);
    assert_eq!(a.condensed.dag.edge_count(), 4);

    // isomorphic: mapping each node to its component preserves every edge
    let mapped: Vec<_> = g
        .edges()
        .iter()
        .map(|&(u, v)| (a.scc.scc_ids[u - 1], a.scc.scc_ids[v - 1]))
        .collect();
    assert_eq!(a.condensed.dag.edges(), mapped.as_slice());

    assert!(a.topo.ok);
    let order: Vec<NodeId> = a.component_order().into_iter().flatten().collect();
    assert_eq!(order, vec![1, 2, 3, 4]);
}

#[test]
fn scenario_b_single_cycle() {
    let g = graph(3, &[(1, 2), (2, 3), (3, 1)]);
    let a = analyze(&g);

    assert_eq!(a.scc.scc_count, 1);
    assert_eq!(a.scc.components(), vec![vec![1, 2, 3]]);
    assert_eq!(a.condensed.dag.node_count(), 1);
    assert_eq!(a.condensed.dag.edge_count(), 0);
    assert!(a.topo.ok);
    assert_eq!(a.topo.order, vec![1]);
}

#[test]
fn scenario_c_cycle_feeding_sink() {
    let g = graph(3, &[(1, 2), (2, 1), (2, 3)]);
    let a = analyze(&g);

    assert_eq!(a.scc.scc_count, 2);
    let cycle = a.scc.scc_ids[0];
    let sink = a.scc.scc_ids[2];
    assert_eq!(a.scc.scc_ids[1], cycle);
    assert_ne!(cycle, sink);

    assert_eq!(a.condensed.dag.edges(), &[(cycle, sink)]);
    assert!(a.topo.ok);
    assert_eq!(a.topo.order, vec![cycle, sink]);
    assert_eq!(a.component_order(), vec![vec![1, 2], vec![3]]);
}

#[test]
fn condensation_trace_only_on_first_occurrence() {
    let g = graph(4, &[(1, 3), (2, 1), (1, 2), (2, 3), (3, 4), (1, 4)]);
    let s = scc::run(&g);
    let c = condense::from_scc(&g, &s);
    let expected: Vec<_> = c
        .dag
        .edges()
        .iter()
        .map(|&(u, v)| StepKind::BuildCondensedEdge { u, v })
        .collect();
    assert_eq!(c.steps.iter().map(|s| s.kind).collect::<Vec<_>>(), expected);
    assert_eq!(c.dag.edge_count(), 3);
}

#[test]
fn trace_serializes_as_json_lines() {
    let g = graph(2, &[(1, 2)]);
    let trace = analyze(&g).combined_trace();
    let json = serde_json::to_string(&trace).unwrap();
    let back: Vec<stepgraph_engine::Step> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, trace);
}

fn arb_graph() -> impl Strategy<Value = Graph> {
    (0usize..10).prop_flat_map(|n| {
        let edges = if n == 0 {
            Just(Vec::new()).boxed()
        } else {
            prop::collection::vec((1..=n, 1..=n), 0..25).boxed()
        };
        edges.prop_map(move |edges| Graph::from_edges(n, &edges).unwrap())
    })
}

proptest! {
    #[test]
    fn prop_scc_matches_mutual_reachability(g in arb_graph()) {
        let r = scc::run(&g);
        let reach = reachability(&g);

        let ids: HashSet<usize> = r.scc_ids.iter().copied().collect();
        prop_assert_eq!(ids, (1..=r.scc_count).collect::<HashSet<_>>());
        prop_assert_eq!(r.scc_sizes.iter().sum::<usize>(), g.node_count());

        for u in g.node_ids() {
            for v in g.node_ids() {
                let same = r.scc_ids[u - 1] == r.scc_ids[v - 1];
                let mutual = reach[u - 1][v - 1] && reach[v - 1][u - 1];
                prop_assert_eq!(same, mutual, "nodes {} and {}", u, v);
            }
        }
    }

    #[test]
    fn prop_scc_trace_matches_recursive_tarjan(g in arb_graph()) {
        let kinds: Vec<StepKind> = scc::run(&g).steps.iter().map(|s| s.kind).collect();
        prop_assert_eq!(kinds, RecursiveTarjan::trace(&g));
    }

    #[test]
    fn prop_condensation_is_a_simple_dag(g in arb_graph()) {
        let s = scc::run(&g);
        let c = condense::from_scc(&g, &s);
        prop_assert_eq!(c.dag.node_count(), s.scc_count);

        let mut seen = HashSet::new();
        for &(u, v) in c.dag.edges() {
            prop_assert_ne!(u, v);
            prop_assert!(seen.insert((u, v)));
        }

        let t = topo::run(&c.dag);
        prop_assert!(t.ok);
        assert_valid_order(&c.dag, &t.order);

        // an acyclic graph condenses to itself
        let again = scc::run(&c.dag);
        prop_assert_eq!(again.scc_count, c.dag.node_count());
    }

    #[test]
    fn prop_topo_ok_iff_acyclic(g in arb_graph()) {
        let s = scc::run(&g);
        let has_self_loop = g.edges().iter().any(|&(u, v)| u == v);
        let acyclic = s.scc_count == g.node_count() && !has_self_loop;

        let t = topo::run(&g);
        prop_assert_eq!(t.ok, acyclic);
        if t.ok {
            assert_valid_order(&g, &t.order);
        } else {
            prop_assert!(t.order.len() < g.node_count());
        }
    }

    #[test]
    fn prop_replay_reproduces_results(g in arb_graph()) {
        let a = analyze(&g);

        let state = TraceState::replay(&a.scc.steps);
        let replayed: Vec<usize> = state.scc_ids(g.node_count()).into_iter().flatten().collect();
        prop_assert_eq!(&replayed, &a.scc.scc_ids);

        let state = TraceState::replay(&a.condensed.steps);
        prop_assert_eq!(state.condensed_edges.as_slice(), a.condensed.dag.edges());

        let state = TraceState::replay(&a.topo.steps);
        prop_assert_eq!(&state.dequeue_order, &a.topo.order);
        let n = a.condensed.dag.node_count();
        prop_assert_eq!(state.in_degrees(n), vec![Some(0); n]);

        // the combined log ends in the same topo state
        let combined = TraceState::replay(&a.combined_trace());
        prop_assert_eq!(&combined.dequeue_order, &a.topo.order);
    }
}
