// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The event log shared by every traced algorithm.
//!
//! A trace is a `Vec<Step>` in exactly the order the algorithm performed the
//! corresponding state transitions. Replay clients fold steps in order (see
//! [`crate::replay::TraceState`]); nothing downstream may reorder or
//! deduplicate them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    /// Clear transient per-node state, and persistent state (SCC ids,
    /// in-degrees, condensed edges, dequeue order) when `clear_persistent`.
    ResetVisualization { clear_persistent: bool },
    Visit { u: NodeId },
    PushStack { u: NodeId },
    PopStack { u: NodeId },
    AssignScc { u: NodeId, scc_id: usize },
    BuildCondensedEdge { u: NodeId, v: NodeId },
    InitInDegree { u: NodeId, in_degree: usize },
    Enqueue { u: NodeId },
    Dequeue { u: NodeId },
    DecrementInDegree { u: NodeId, v: NodeId, in_degree: usize },
}

/// A single immutable trace event. `note` is informational only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub kind: StepKind,
    pub note: String,
}

impl Step {
    pub fn new(kind: StepKind) -> Self {
        let note = kind.to_string();
        Step { kind, note }
    }

    pub fn reset(clear_persistent: bool) -> Self {
        Step::new(StepKind::ResetVisualization { clear_persistent })
    }

    pub fn visit(u: NodeId) -> Self {
        Step::new(StepKind::Visit { u })
    }

    pub fn push_stack(u: NodeId) -> Self {
        Step::new(StepKind::PushStack { u })
    }

    pub fn pop_stack(u: NodeId) -> Self {
        Step::new(StepKind::PopStack { u })
    }

    pub fn assign_scc(u: NodeId, scc_id: usize) -> Self {
        Step::new(StepKind::AssignScc { u, scc_id })
    }

    pub fn condensed_edge(u: NodeId, v: NodeId) -> Self {
        Step::new(StepKind::BuildCondensedEdge { u, v })
    }

    pub fn init_in_degree(u: NodeId, in_degree: usize) -> Self {
        Step::new(StepKind::InitInDegree { u, in_degree })
    }

    pub fn enqueue(u: NodeId) -> Self {
        Step::new(StepKind::Enqueue { u })
    }

    pub fn dequeue(u: NodeId) -> Self {
        Step::new(StepKind::Dequeue { u })
    }

    pub fn decrement_in_degree(u: NodeId, v: NodeId, in_degree: usize) -> Self {
        Step::new(StepKind::DecrementInDegree { u, v, in_degree })
    }

    /// Primary node, if the step has one.
    pub fn u(&self) -> Option<NodeId> {
        use StepKind::*;
        match self.kind {
            ResetVisualization { .. } => None,
            Visit { u }
            | PushStack { u }
            | PopStack { u }
            | AssignScc { u, .. }
            | BuildCondensedEdge { u, .. }
            | InitInDegree { u, .. }
            | Enqueue { u }
            | Dequeue { u }
            | DecrementInDegree { u, .. } => Some(u),
        }
    }

    /// Secondary node; only edge-shaped steps carry one.
    pub fn v(&self) -> Option<NodeId> {
        match self.kind {
            StepKind::BuildCondensedEdge { v, .. } | StepKind::DecrementInDegree { v, .. } => {
                Some(v)
            }
            _ => None,
        }
    }

    pub fn scc_id(&self) -> Option<usize> {
        match self.kind {
            StepKind::AssignScc { scc_id, .. } => Some(scc_id),
            _ => None,
        }
    }

    /// Integer payload: the in-degree for in-degree steps, and `1`/`0` for
    /// a persistent/transient reset.
    pub fn value(&self) -> Option<usize> {
        match self.kind {
            StepKind::InitInDegree { in_degree, .. }
            | StepKind::DecrementInDegree { in_degree, .. } => Some(in_degree),
            StepKind::ResetVisualization { clear_persistent } => Some(clear_persistent as usize),
            _ => None,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use StepKind::*;
        match *self {
            ResetVisualization {
                clear_persistent: true,
            } => write!(f, "reset all"),
            ResetVisualization {
                clear_persistent: false,
            } => write!(f, "reset transient"),
            Visit { u } => write!(f, "visit {u}"),
            PushStack { u } => write!(f, "push {u}"),
            PopStack { u } => write!(f, "pop {u}"),
            AssignScc { u, scc_id } => write!(f, "assign node {u} to SCC {scc_id}"),
            BuildCondensedEdge { u, v } => write!(f, "condensed edge SCC{u} -> SCC{v}"),
            InitInDegree { u, in_degree } => write!(f, "init indeg[{u}] = {in_degree}"),
            Enqueue { u } => write!(f, "enqueue {u}"),
            Dequeue { u } => write!(f, "dequeue {u}"),
            DecrementInDegree { v, in_degree, .. } => write!(f, "indeg[{v}]-- => {in_degree}"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.note)
    }
}
