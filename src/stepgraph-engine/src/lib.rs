// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Step-traced graph algorithms (Tarjan SCC, condensation, Kahn topological
//! sort) and an interactive force-directed layout simulator.

#![forbid(unsafe_code)]

pub mod common;
pub mod condense;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod replay;
pub mod scc;
pub mod step;
pub mod topo;

pub use self::common::{Error, ErrorCode, ErrorKind, NodeId, Result};
pub use self::condense::CondenseResult;
pub use self::graph::Graph;
pub use self::pipeline::{Analysis, analyze};
pub use self::replay::{NodeVisual, TraceState};
pub use self::scc::SccResult;
pub use self::step::{Step, StepKind};
pub use self::topo::TopoResult;
