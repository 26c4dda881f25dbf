//! Water sampling.
//!
//! The blade force model treats the water as an oracle: give it a point, get
//! back the surface height and how fast the surface is moving there. The
//! oracle may decline to answer (outside its valid domain), in which case the
//! blade is skipped for that tick.
//!
//! ```text
//!   blade tip ──► sample_height ──► height, orbital velocity ─┐
//!             └─► sample_flow   ──► current (x, z) ───────────┴─► water velocity
//! ```
//!
//! [`GerstnerWater`] is the in-crate oracle: a sum of Gerstner waves plus a
//! uniform current, optionally bounded to a rectangle.

pub mod config;
pub mod physics;

use bevy::math::{Vec2, Vec3};

pub use config::{WaveConfig, WaveParams, WavePreset};
pub use physics::GerstnerWater;

/// Result of a water surface query at a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterSample {
    /// Surface height (Y coordinate)
    pub height: f32,
    /// Surface normal; unused by the force model
    pub normal: Vec3,
    /// Orbital velocity of the surface at the query point
    pub velocity: Vec3,
}

/// Source of water heights and surface motion.
pub trait WaterOracle {
    /// Height and orbital velocity at `point`, or `None` outside the valid domain.
    ///
    /// `min_feature_size` is a hint: features smaller than this may be ignored.
    fn sample_height(&self, point: Vec3, min_feature_size: f32) -> Option<WaterSample>;

    /// Horizontal current at `point` as (x, z), or `None` outside the valid domain.
    fn sample_flow(&self, point: Vec3, min_feature_size: f32) -> Option<Vec2>;

    /// Advance the oracle's clock to `seconds`, for oracles that animate.
    fn set_time(&mut self, _seconds: f32) {}
}

impl<T: WaterOracle + ?Sized> WaterOracle for Box<T> {
    fn sample_height(&self, point: Vec3, min_feature_size: f32) -> Option<WaterSample> {
        (**self).sample_height(point, min_feature_size)
    }

    fn sample_flow(&self, point: Vec3, min_feature_size: f32) -> Option<Vec2> {
        (**self).sample_flow(point, min_feature_size)
    }

    fn set_time(&mut self, seconds: f32) {
        (**self).set_time(seconds);
    }
}
