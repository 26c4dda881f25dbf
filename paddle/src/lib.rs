//! Double-bladed kayak paddle.
//!
//! Two blades follow tracked hand positions, are kept out of solid scenery,
//! and push the craft when a submerged blade moves through the water. The
//! core is plain functions over small traits ([`CollisionQuery`],
//! [`WaterOracle`], [`CraftBody`], [`PaddleDiagnostics`]); [`PaddlePlugin`]
//! wires it into a Bevy app backed by Rapier.

pub mod blade;
pub mod collision;
pub mod config;
pub mod constants;
pub mod controller;
pub mod diagnostics;
pub mod follow;
pub mod plugin;
pub mod pose;
pub mod ripple;
pub mod sets;
pub mod water;

pub use blade::{
    air_drag, blade_efficiency, distance_efficiency, process_blade, stroke_force, BladeFrame,
    BladeOutcome, BladeState, CraftBody,
};
pub use collision::{constrain, layers, shaft_blocked, CollisionQuery, StaticScene, SweepHit};
pub use config::PaddleConfig;
pub use controller::PaddleController;
pub use diagnostics::{PaddleDiagnostics, PaddleEvent, Side};
pub use follow::{follow_with_offset, FollowWithOffset};
pub use plugin::{BladeLink, PaddlePlugin, PaddleRig, PaddleWater};
pub use pose::{integrate_pose, paddle_orientation, HandPair, PaddlePose};
pub use ripple::RippleField;
pub use sets::{PaddleFixedSet, PaddleUpdateSet};
pub use water::{GerstnerWater, WaterOracle, WaterSample, WaveConfig, WavePreset};
