// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashSet;

use crate::graph::Graph;
use crate::scc::SccResult;
use crate::step::Step;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CondenseResult {
    /// One node per SCC; no self-loops, no duplicate edges, acyclic.
    pub dag: Graph,
    pub steps: Vec<Step>,
}

/// Collapse every SCC of `graph` into a single node.
///
/// `scc_ids[id - 1]` must hold the component (`1..=scc_count`) of node `id`,
/// as produced by [`crate::scc::run`]. Original edges are scanned in
/// insertion order; the first edge between two distinct components emits a
/// `BuildCondensedEdge` step, later duplicates and intra-component edges are
/// dropped silently.
pub fn run(graph: &Graph, scc_ids: &[usize], scc_count: usize) -> CondenseResult {
    let mut dag = Graph::new(scc_count);
    let mut steps = Vec::new();
    let mut seen = HashSet::new();

    for &(u, v) in graph.edges() {
        let (su, sv) = (scc_ids[u - 1], scc_ids[v - 1]);
        if su == sv || !seen.insert((su, sv)) {
            continue;
        }
        // both ids are component ids in 1..=scc_count by construction
        if dag.add_edge(su, sv).is_ok() {
            steps.push(Step::condensed_edge(su, sv));
        }
    }

    tracing::debug!(
        scc_count,
        dag_edges = dag.edge_count(),
        dropped = graph.edge_count() - dag.edge_count(),
        "condensation complete"
    );

    CondenseResult { dag, steps }
}

/// Convenience wrapper over [`run`] taking the SCC result directly.
pub fn from_scc(graph: &Graph, scc: &SccResult) -> CondenseResult {
    run(graph, &scc.scc_ids, scc.scc_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scc;
    use crate::step::StepKind;

    #[test]
    fn test_condense_cycle_to_single_node() {
        let g = Graph::from_edges(3, &[(1, 2), (2, 3), (3, 1)]).unwrap();
        let c = from_scc(&g, &scc::run(&g));
        assert_eq!(c.dag.node_count(), 1);
        assert_eq!(c.dag.edge_count(), 0);
        assert!(c.steps.is_empty());
    }

    #[test]
    fn test_condense_dedups_in_insertion_order() {
        // components: {3, 4} closes first (id 1), then {1, 2} (id 2)
        let g = Graph::from_edges(4, &[(1, 2), (2, 1), (2, 3), (3, 4), (4, 3), (1, 4), (2, 4)])
            .unwrap();
        let s = scc::run(&g);
        assert_eq!(s.scc_ids, vec![2, 2, 1, 1]);

        let c = from_scc(&g, &s);
        assert_eq!(c.dag.edges(), &[(2, 1)]);
        assert_eq!(c.steps.len(), 1);
        assert_eq!(c.steps[0].kind, StepKind::BuildCondensedEdge { u: 2, v: 1 });
    }

    #[test]
    fn test_condense_uses_given_assignment() {
        let g = Graph::from_edges(4, &[(1, 2), (3, 4), (2, 3), (4, 1)]).unwrap();
        // caller-supplied grouping: {1,2} -> 1, {3,4} -> 2
        let c = run(&g, &[1, 1, 2, 2], 2);
        assert_eq!(c.dag.edges(), &[(1, 2), (2, 1)]);
        assert_eq!(
            c.steps.iter().map(|s| s.kind).collect::<Vec<_>>(),
            vec![
                StepKind::BuildCondensedEdge { u: 1, v: 2 },
                StepKind::BuildCondensedEdge { u: 2, v: 1 },
            ]
        );
    }

    #[test]
    fn test_condense_empty() {
        let g = Graph::new(0);
        let c = from_scc(&g, &scc::run(&g));
        assert!(c.dag.is_empty());
        assert!(c.steps.is_empty());
    }
}
