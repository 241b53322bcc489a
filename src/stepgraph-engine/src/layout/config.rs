// Copyright 2026 The Stepgraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::config_err;

/// Force-directed layout parameters.
///
/// Distances are in scene units, forces in scene units per tick squared.
/// Missing fields fall back to the defaults when deserializing, so a partial
/// JSON object is a valid override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    // Forces
    /// Pairwise repulsion constant (`repulsion / dist^2`).
    pub repulsion: f64,
    /// Spring constant along edges.
    pub spring: f64,
    /// Target edge length at equilibrium.
    pub rest_length: f64,
    /// Pull toward the arena center, per unit of distance.
    pub center_pull: f64,

    // Collision
    pub node_radius: f64,
    /// Extra gap required between two node circles.
    pub collision_margin: f64,
    /// Push per unit of penetration when two nodes overlap.
    pub collision_strength: f64,

    // Integration
    /// Velocity retained per tick, in `(0, 1]`.
    pub damping: f64,
    /// Maximum displacement per tick.
    pub max_speed: f64,
    /// Default `dt` handed to `tick` by a clock driving the simulator.
    pub time_step: f64,
    /// Period of the clock driving `tick`, in milliseconds (~60 Hz by
    /// default). See [`LayoutConfig::tick_interval`].
    pub tick_interval_ms: u64,
    /// Floor on squared distance to keep forces finite.
    pub distance_epsilon: f64,

    // Cooling
    /// Fraction of alpha lost per tick.
    pub alpha_decay: f64,
    /// Below this alpha the layout is settled and ticking stops.
    pub alpha_min: f64,
    /// Weight gained per tick by a newly added edge.
    pub edge_weight_step: f64,

    // Arena
    /// Gap kept between node circles and the arena edge.
    pub bounds_margin: f64,

    // Reheat targets
    pub drag_start_heat: f64,
    pub drag_end_heat: f64,
    pub pin_heat: f64,
    pub topology_heat: f64,

    /// Seed for placing nodes that have no initial position.
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 4000.0,
            spring: 0.12,
            rest_length: 120.0,
            center_pull: 0.001,
            node_radius: 30.0,
            collision_margin: 6.0,
            collision_strength: 2.0,
            damping: 0.8,
            max_speed: 25.0,
            time_step: 1.0,
            tick_interval_ms: 16,
            distance_epsilon: 1e-3,
            alpha_decay: 0.01,
            alpha_min: 0.001,
            edge_weight_step: 0.05,
            bounds_margin: 10.0,
            drag_start_heat: 1.0,
            drag_end_heat: 0.6,
            pin_heat: 0.8,
            topology_heat: 0.8,
            seed: 42,
        }
    }
}

impl LayoutConfig {
    /// Reject values the simulator cannot run with.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("repulsion", self.repulsion),
            ("spring", self.spring),
            ("rest_length", self.rest_length),
            ("center_pull", self.center_pull),
            ("node_radius", self.node_radius),
            ("collision_margin", self.collision_margin),
            ("collision_strength", self.collision_strength),
            ("bounds_margin", self.bounds_margin),
            ("time_step", self.time_step),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return config_err!(format!("{name} must be finite and >= 0, got {value}"));
            }
        }

        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return config_err!(format!("damping must be in (0, 1], got {}", self.damping));
        }
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return config_err!(format!("max_speed must be > 0, got {}", self.max_speed));
        }
        if !(self.distance_epsilon.is_finite() && self.distance_epsilon > 0.0) {
            return config_err!(format!(
                "distance_epsilon must be > 0, got {}",
                self.distance_epsilon
            ));
        }
        if !(self.alpha_decay > 0.0 && self.alpha_decay < 1.0) {
            return config_err!(format!(
                "alpha_decay must be in (0, 1), got {}",
                self.alpha_decay
            ));
        }
        if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
            return config_err!(format!("alpha_min must be in (0, 1), got {}", self.alpha_min));
        }
        if !(self.edge_weight_step > 0.0 && self.edge_weight_step <= 1.0) {
            return config_err!(format!(
                "edge_weight_step must be in (0, 1], got {}",
                self.edge_weight_step
            ));
        }
        for (name, heat) in [
            ("drag_start_heat", self.drag_start_heat),
            ("drag_end_heat", self.drag_end_heat),
            ("pin_heat", self.pin_heat),
            ("topology_heat", self.topology_heat),
        ] {
            if !(0.0..=1.0).contains(&heat) {
                return config_err!(format!("{name} must be in [0, 1], got {heat}"));
            }
        }
        Ok(())
    }

    /// Wall-clock pause a driver should leave between two ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Minimum center-to-center distance before collision pushes kick in.
    pub fn collision_distance(&self) -> f64 {
        2.0 * self.node_radius + self.collision_margin
    }
}
