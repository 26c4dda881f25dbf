//! Paddle tuning.
//!
//! A single [`PaddleConfig`] resource drives the constraint solver, the pose
//! integrator and the blade force model. It can be loaded from RON (every
//! field falls back to its default) and must be passed through
//! [`PaddleConfig::validate`] before use; the plugin does this at build time.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::layers;
use crate::constants::{HAND_DISTANCE_CORRECTION, MIN_SHAFT_CHECK_POINTS};

/// Runtime paddle configuration resource.
#[derive(Resource, Clone, Debug, Reflect, Serialize, Deserialize, PartialEq)]
#[reflect(Resource)]
#[serde(default)]
pub struct PaddleConfig {
    /// Minimum span between the hands for the paddle to transmit force (meters).
    pub min_hand_distance: f32,
    /// Maximum span between the hands for the paddle to transmit force (meters).
    pub max_hand_distance: f32,

    /// Offset added to the water height for the submersion test (meters).
    ///
    /// Negative: the tip has to be this far below the surface.
    pub blade_depth_threshold: f32,
    /// Relative blade speed at which the stroke force saturates (m/s).
    pub max_effective_speed: f32,
    /// Force per unit of relative speed (N per m/s).
    pub force_multiplier: f32,
    /// Air drag coefficient applied while a blade is out of the water.
    pub recovery_drag: f32,
    /// Efficiency of an edge-on blade.
    pub min_efficiency: f32,
    /// Efficiency of a blade whose face is perpendicular to world up.
    pub max_efficiency: f32,

    /// Layer bits the paddle must not pass through.
    pub blocking_layers: u32,
    /// Probe radius used for the blade sweeps and overlaps (meters).
    pub blade_collision_radius: f32,
    /// Probe radius used for the shaft samples (meters).
    pub shaft_collision_radius: f32,
    /// Number of samples along the shaft, endpoints included.
    pub shaft_check_points: usize,

    /// Feature-size hint forwarded to the water oracle (meters).
    pub min_spatial_length: f32,

    /// Radius of the ripple disturbances emitted by the blades (meters).
    pub disturbance_radius: f32,
    /// Log the hand span while the paddle is inactive.
    pub show_debug_info: bool,
}

impl Default for PaddleConfig {
    fn default() -> Self {
        Self {
            min_hand_distance: 0.4,
            max_hand_distance: 1.5,
            blade_depth_threshold: -0.05,
            max_effective_speed: 2.5,
            force_multiplier: 60.0,
            recovery_drag: 0.5,
            min_efficiency: 0.1,
            max_efficiency: 1.0,
            blocking_layers: layers::DEFAULT_BLOCKING,
            blade_collision_radius: 0.08,
            shaft_collision_radius: 0.03,
            shaft_check_points: 5,
            min_spatial_length: 1.0,
            disturbance_radius: 0.25,
            show_debug_info: true,
        }
    }
}

impl PaddleConfig {
    /// Repair invariant violations in place, warning about each one.
    ///
    /// Returns `true` if anything was changed.
    pub fn validate(&mut self) -> bool {
        let mut corrected = false;

        if self.min_hand_distance >= self.max_hand_distance {
            let fixed = (self.max_hand_distance - HAND_DISTANCE_CORRECTION).max(0.0);
            log::warn!(
                "min_hand_distance ({}) must be less than max_hand_distance ({}); using {}",
                self.min_hand_distance,
                self.max_hand_distance,
                fixed
            );
            self.min_hand_distance = fixed;
            if self.min_hand_distance >= self.max_hand_distance {
                // max was at or below zero
                self.max_hand_distance = self.min_hand_distance + HAND_DISTANCE_CORRECTION;
            }
            corrected = true;
        }

        if self.shaft_check_points < MIN_SHAFT_CHECK_POINTS {
            log::warn!(
                "shaft_check_points ({}) must be at least {}",
                self.shaft_check_points,
                MIN_SHAFT_CHECK_POINTS
            );
            self.shaft_check_points = MIN_SHAFT_CHECK_POINTS;
            corrected = true;
        }

        if self.min_efficiency > self.max_efficiency {
            log::warn!(
                "min_efficiency ({}) exceeds max_efficiency ({}); swapping",
                self.min_efficiency,
                self.max_efficiency
            );
            std::mem::swap(&mut self.min_efficiency, &mut self.max_efficiency);
            corrected = true;
        }

        for (name, radius) in [
            ("blade_collision_radius", &mut self.blade_collision_radius),
            ("shaft_collision_radius", &mut self.shaft_collision_radius),
            ("disturbance_radius", &mut self.disturbance_radius),
        ] {
            if *radius < 0.0 {
                log::warn!("{name} ({radius}) must not be negative; using 0");
                *radius = 0.0;
                corrected = true;
            }
        }

        corrected
    }

    /// Builder-style [`validate`](Self::validate).
    pub fn validated(mut self) -> Self {
        self.validate();
        self
    }

    /// `true` when `hand_distance` lies within the activation band, bounds included.
    #[inline]
    pub fn is_active_span(&self, hand_distance: f32) -> bool {
        hand_distance >= self.min_hand_distance && hand_distance <= self.max_hand_distance
    }
}
