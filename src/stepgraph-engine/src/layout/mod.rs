// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Interactive force-directed layout.
//!
//! Each tick cools the temperature, accumulates pairwise repulsion (with a
//! collision push for overlapping nodes), spring attraction along edges, and
//! a weak pull toward the arena center, scales the sum by the temperature,
//! and integrates damped, speed-limited velocities into positions clamped to
//! the arena. Pinned and dragged nodes are held in place.

pub mod config;
pub mod geometry;
pub mod simulator;

pub use self::config::LayoutConfig;
pub use self::geometry::{Position, Rect};
pub use self::simulator::{InteractionObserver, Layout, LayoutSimulator, NodeState};
