// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! SCC -> condensation -> topological sort, run back to back.

use crate::common::NodeId;
use crate::condense::{self, CondenseResult};
use crate::graph::Graph;
use crate::scc::{self, SccResult};
use crate::step::Step;
use crate::topo::{self, TopoResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    pub scc: SccResult,
    pub condensed: CondenseResult,
    pub topo: TopoResult,
}

impl Analysis {
    /// All three traces as one replayable log.
    ///
    /// Each phase starts with a reset: the condensation phase keeps the SCC
    /// assignment on screen, while the topological phase clears it because
    /// its node ids are component ids rather than original node ids.
    pub fn combined_trace(&self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(
            3 + self.scc.steps.len() + self.condensed.steps.len() + self.topo.steps.len(),
        );
        steps.push(Step::reset(true));
        steps.extend(self.scc.steps.iter().cloned());
        steps.push(Step::reset(false));
        steps.extend(self.condensed.steps.iter().cloned());
        steps.push(Step::reset(true));
        steps.extend(self.topo.steps.iter().cloned());
        steps
    }

    /// The topological order expanded back to original node ids: one group
    /// of members per component, in component order.
    pub fn component_order(&self) -> Vec<Vec<NodeId>> {
        let comps = self.scc.components();
        self.topo
            .order
            .iter()
            .map(|&c| comps[c - 1].clone())
            .collect()
    }
}

pub fn analyze(graph: &Graph) -> Analysis {
    let scc = scc::run(graph);
    let condensed = condense::from_scc(graph, &scc);
    let topo = topo::run(&condensed.dag);
    Analysis {
        scc,
        condensed,
        topo,
    }
}
