// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::LayoutConfig;
use super::geometry::{Position, Rect};
use crate::common::{NodeId, Result};
use crate::graph::Graph;

/// Maps node ids to positions.
pub type Layout = BTreeMap<NodeId, Position>;

// golden angle, used to spread fallback directions for coincident nodes
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Per-node simulation state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeState {
    pub position: Position,
    /// Displacement applied on the last tick.
    pub velocity: Position,
    pub pinned: bool,
    /// Held by an external drag; integration is suspended meanwhile.
    pub dragging: bool,
}

impl NodeState {
    fn is_fixed(&self) -> bool {
        self.pinned || self.dragging
    }
}

/// Callbacks a presentation layer invokes when the user interacts with a
/// node. Every one of them reheats the simulation.
pub trait InteractionObserver {
    fn on_drag_start(&mut self, id: NodeId);
    fn on_drag_end(&mut self, id: NodeId);
    fn on_pin_changed(&mut self, id: NodeId, pinned: bool);
}

/// Force-directed layout driven one tick at a time by an external clock.
///
/// The simulator owns positions, velocities, pin and drag flags, per-edge
/// weights, and the cooling temperature `alpha`. The graph is borrowed on
/// every call; edges are matched to weights by their index in
/// [`Graph::edges`].
///
/// A session may be handed a different graph between ticks (say, the
/// condensed graph instead of the original). If the edge list is no longer
/// an extension of the one last seen, every weight restarts from zero and
/// ramps in. Node state is kept by id; ids beyond the new node count are
/// dropped, and ids that come back later start fresh and unpinned.
pub struct LayoutSimulator {
    config: LayoutConfig,
    nodes: Vec<NodeState>,
    // edges the weights below belong to
    edges: Vec<(NodeId, NodeId)>,
    edge_weights: Vec<f64>,
    alpha: f64,
    running: bool,
    viewport: Rect,
    bounds: Rect,
    rng: StdRng,
}

impl LayoutSimulator {
    /// Start a layout session for `graph`.
    ///
    /// Nodes missing from `initial` are spread on a circle around the
    /// viewport center. Edges already in the graph start at full weight.
    pub fn new(
        graph: &Graph,
        initial: &Layout,
        viewport: Rect,
        config: LayoutConfig,
    ) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        let mut sim = LayoutSimulator {
            config,
            nodes: Vec::with_capacity(graph.node_count()),
            edges: graph.edges().to_vec(),
            edge_weights: vec![1.0; graph.edge_count()],
            alpha: 1.0,
            running: true,
            viewport,
            bounds: viewport,
            rng,
        };
        sim.bounds = sim.arena_for(graph.node_count());

        let n = graph.node_count();
        for id in graph.node_ids() {
            let position = match initial.get(&id) {
                Some(&p) => p,
                None => sim.ring_position(id, n),
            };
            sim.nodes.push(NodeState {
                position,
                ..NodeState::default()
            });
        }

        tracing::debug!(
            nodes = n,
            edges = graph.edge_count(),
            arena_width = sim.bounds.width(),
            arena_height = sim.bounds.height(),
            "layout session started"
        );
        Ok(sim)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// False once the layout has settled; only [`heat_up`](Self::heat_up)
    /// restarts it.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Arena that positions are clamped into (before the radius margin).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeState> {
        id.checked_sub(1).and_then(|i| self.nodes.get(i))
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.node(id).map(|n| n.position)
    }

    /// Snapshot of every position, consistent at tick boundaries.
    pub fn positions(&self) -> Layout {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (i + 1, n.position))
            .collect()
    }

    /// Weight of the edge at `index` in [`Graph::edges`].
    pub fn edge_weight(&self, index: usize) -> Option<f64> {
        self.edge_weights.get(index).copied()
    }

    /// Raise the temperature to at least `target` and resume ticking. This
    /// is the only way alpha ever increases.
    pub fn heat_up(&mut self, target: f64) {
        let was_running = self.running;
        self.alpha = self.alpha.max(target);
        self.running = true;
        if !was_running {
            tracing::trace!(alpha = self.alpha, "layout reheated");
        }
    }

    /// Zero all velocities and reheat to at least full temperature.
    pub fn restart(&mut self) {
        for node in &mut self.nodes {
            node.velocity = Position::ZERO;
        }
        self.heat_up(1.0);
    }

    /// Advance the simulation by one clock pulse. Returns whether the
    /// layout is still moving; a settled simulator ignores ticks.
    pub fn tick(&mut self, graph: &Graph, dt: f64) -> bool {
        if graph.node_count() != self.nodes.len() {
            self.sync_nodes(graph);
        }
        self.sync_edges(graph);

        if !self.running || self.nodes.is_empty() {
            return false;
        }

        self.alpha *= 1.0 - self.config.alpha_decay;
        if self.alpha < self.config.alpha_min {
            self.running = false;
            tracing::trace!(alpha = self.alpha, "layout settled");
            return false;
        }

        let mut forces = vec![Position::ZERO; self.nodes.len()];
        self.apply_repulsion(&mut forces);
        self.apply_springs(graph, &mut forces);
        self.apply_centering(&mut forces);
        self.integrate(&forces, dt);

        let step = self.config.edge_weight_step;
        for w in &mut self.edge_weights {
            *w = (*w + step).min(1.0);
        }

        true
    }

    fn apply_repulsion(&self, forces: &mut [Position]) {
        let config = &self.config;
        let min_dist = config.collision_distance();

        // O(n^2) over unordered pairs
        for i in 0..self.nodes.len() {
            let p1 = self.nodes[i].position;
            for j in (i + 1)..self.nodes.len() {
                let delta = p1 - self.nodes[j].position;
                let len2 = delta.length_squared();
                let len = len2.sqrt();
                let dir = if len > 0.0 {
                    delta * (1.0 / len)
                } else {
                    fallback_direction(i, j)
                };

                let mut mag = config.repulsion / len2.max(config.distance_epsilon);
                if len < min_dist {
                    mag += (min_dist - len) * config.collision_strength;
                }

                let f = dir * mag;
                forces[i] += f;
                forces[j] -= f;
            }
        }
    }

    fn apply_springs(&self, graph: &Graph, forces: &mut [Position]) {
        let config = &self.config;
        for (k, &(u, v)) in graph.edges().iter().enumerate() {
            if u == v {
                continue;
            }
            let delta = self.nodes[v - 1].position - self.nodes[u - 1].position;
            let len = delta.length_squared().max(config.distance_epsilon).sqrt();
            let dir = delta * (1.0 / len);

            let weight = self.edge_weights.get(k).copied().unwrap_or(0.0);
            let f = dir * (config.spring * weight * (len - config.rest_length));
            forces[u - 1] += f;
            forces[v - 1] -= f;
        }
    }

    fn apply_centering(&self, forces: &mut [Position]) {
        let center = self.bounds.center();
        for (node, force) in self.nodes.iter().zip(forces.iter_mut()) {
            *force += (center - node.position) * self.config.center_pull;
        }
    }

    fn integrate(&mut self, forces: &[Position], dt: f64) {
        let config = &self.config;
        let inner = self.bounds.inset(config.node_radius + config.bounds_margin);
        let alpha = self.alpha;

        for (node, &force) in self.nodes.iter_mut().zip(forces) {
            if node.is_fixed() {
                node.velocity = Position::ZERO;
                continue;
            }

            let mut velocity = (node.velocity + force * alpha * dt) * config.damping;
            let speed = velocity.length();
            if speed > config.max_speed {
                velocity *= config.max_speed / speed;
            }
            node.velocity = velocity;
            // velocity is already a per-tick displacement
            node.position = inner.clamp(node.position + velocity);
        }
    }

    /// Add `u -> v` on behalf of the user. Rejects out-of-range ids,
    /// self-loops, and edges already present. The new edge starts at weight
    /// zero and ramps in over the following ticks.
    pub fn add_edge(&mut self, graph: &mut Graph, u: NodeId, v: NodeId) -> bool {
        self.sync_edges(graph);
        match graph.try_add_unique_edge(u, v) {
            Ok(()) => {
                self.sync_edges(graph);
                self.heat_up(self.config.topology_heat);
                true
            }
            Err(err) => {
                tracing::trace!(u, v, %err, "edge rejected");
                false
            }
        }
    }

    /// Pin or unpin a node. Returns false for unknown ids.
    pub fn set_pinned(&mut self, id: NodeId, pinned: bool) -> bool {
        let Some(node) = id.checked_sub(1).and_then(|i| self.nodes.get_mut(i)) else {
            return false;
        };
        if node.pinned != pinned {
            node.pinned = pinned;
            node.velocity = Position::ZERO;
            self.heat_up(self.config.pin_heat);
        }
        true
    }

    pub fn begin_drag(&mut self, id: NodeId) {
        if let Some(node) = id.checked_sub(1).and_then(|i| self.nodes.get_mut(i)) {
            node.dragging = true;
            node.velocity = Position::ZERO;
            self.heat_up(self.config.drag_start_heat);
        }
    }

    pub fn end_drag(&mut self, id: NodeId) {
        if let Some(node) = id.checked_sub(1).and_then(|i| self.nodes.get_mut(i))
            && node.dragging
        {
            node.dragging = false;
            self.heat_up(self.config.drag_end_heat);
        }
    }

    /// Move a node directly, e.g. while it is being dragged. The position is
    /// clamped into the arena.
    pub fn set_position(&mut self, id: NodeId, position: Position) -> bool {
        let inner = self
            .bounds
            .inset(self.config.node_radius + self.config.bounds_margin);
        match id.checked_sub(1).and_then(|i| self.nodes.get_mut(i)) {
            Some(node) => {
                node.position = inner.clamp(position);
                node.velocity = Position::ZERO;
                true
            }
            None => false,
        }
    }

    /// Adopt nodes appended to `graph` since the last call, resize the
    /// arena, and reheat.
    pub fn sync_nodes(&mut self, graph: &Graph) {
        let n = graph.node_count();
        if n == self.nodes.len() {
            return;
        }
        let old = self.nodes.len();
        self.nodes.truncate(n);
        self.bounds = self.arena_for(n);
        for id in (old + 1)..=n {
            let position = self.ring_position(id, n);
            self.nodes.push(NodeState {
                position,
                ..NodeState::default()
            });
        }
        tracing::debug!(from = old, to = n, "layout node count changed");
        self.heat_up(self.config.topology_heat);
    }

    /// Edges appended to the graph behind the simulator's back ramp in like
    /// user-added ones. A graph whose edge list does not extend the known one
    /// is a different graph: all of its edges ramp in.
    fn sync_edges(&mut self, graph: &Graph) {
        let edges = graph.edges();
        let known = self.edges.len();
        if edges.len() < known || edges[..known] != self.edges[..] {
            tracing::debug!(
                from = known,
                to = edges.len(),
                "layout graph replaced, edge weights reset"
            );
            self.edges.clear();
            self.edge_weights.clear();
        }
        if self.edges.len() < edges.len() {
            self.edges.extend_from_slice(&edges[self.edges.len()..]);
            self.edge_weights.resize(edges.len(), 0.0);
        }
    }

    /// Change the visible region; the arena never gets smaller than it.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.bounds = self.arena_for(self.nodes.len());
    }

    fn arena_for(&self, n: usize) -> Rect {
        let side = (n as f64).sqrt() * self.config.rest_length * 3.0;
        Rect::centered(
            self.viewport.center(),
            side.max(self.viewport.width()),
            side.max(self.viewport.height()),
        )
    }

    fn ring_position(&mut self, id: NodeId, n: usize) -> Position {
        let angle = (id - 1) as f64 * 2.0 * PI / n.max(1) as f64;
        let radius = self.config.rest_length;
        let jitter = Position::new(
            self.rng.random::<f64>() - 0.5,
            self.rng.random::<f64>() - 0.5,
        );
        self.bounds.center() + Position::new(radius * angle.cos(), radius * angle.sin()) + jitter
    }
}

impl InteractionObserver for LayoutSimulator {
    fn on_drag_start(&mut self, id: NodeId) {
        self.begin_drag(id);
    }

    fn on_drag_end(&mut self, id: NodeId) {
        self.end_drag(id);
    }

    fn on_pin_changed(&mut self, id: NodeId, pinned: bool) {
        self.set_pinned(id, pinned);
    }
}

fn fallback_direction(i: usize, j: usize) -> Position {
    let angle = (i * 31 + j) as f64 * GOLDEN_ANGLE;
    Position::new(angle.cos(), angle.sin())
}
