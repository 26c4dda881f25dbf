use std::fs;
use std::path::Path;

use bevy::prelude::*;
use paddle::{PaddleConfig, WavePreset};
use ron::de::from_str;
use serde::{Deserialize, Serialize};

/// Rigid body and collision shape of the kayak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullParams {
    /// kg, paddler included
    pub mass: f32,
    /// kg·m² about the vertical axis
    pub yaw_inertia: f32,
    /// Fraction of velocity lost per second
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Collision box, hull-local
    pub half_extents: Vec3,
    pub center: Vec3,
}

impl Default for HullParams {
    fn default() -> Self {
        Self {
            mass: 100.0,
            yaw_inertia: 60.0,
            linear_damping: 0.5,
            angular_damping: 1.5,
            half_extents: Vec3::new(0.3, 0.15, 2.0),
            center: Vec3::new(0.0, -0.1, 0.0),
        }
    }
}

/// Scripted paddler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeParams {
    /// Full left+right cycles per second
    pub cadence: f32,
    /// Distance between the hands (m)
    pub grip_span: f32,
    /// Height of the hands' midpoint above the hull origin (m)
    pub grip_height: f32,
    /// Peak height difference between the hands, per side (m)
    pub tilt: f32,
    /// Peak torso rotation (radians)
    pub sweep_angle: f32,
    /// Distance from each hand to its blade tip along the shaft (m)
    pub blade_reach: f32,
    /// Hand tracking noise amplitude (m)
    pub jitter: f32,
    /// Stop paddling after this many seconds; `None` paddles throughout
    pub stop_after: Option<f32>,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self {
            cadence: 0.5,
            grip_span: 1.2,
            grip_height: 0.4,
            tilt: 0.35,
            sweep_angle: 0.6,
            blade_reach: 1.0,
            jitter: 0.002,
            stop_after: None,
        }
    }
}

/// Static obstacle on the `WORLD` layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostParams {
    pub center: Vec3,
    pub half_extents: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub paddle: PaddleConfig,
    pub waves: WavePreset,
    pub water_level: f32,
    /// Ambient current (x, z) in m/s
    pub current: Vec2,
    pub hull: HullParams,
    pub stroke: StrokeParams,
    pub posts: Vec<PostParams>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "default".into(),
            paddle: PaddleConfig::default(),
            waves: WavePreset::Calm,
            water_level: 0.0,
            current: Vec2::ZERO,
            hull: HullParams::default(),
            stroke: StrokeParams::default(),
            posts: vec![PostParams {
                center: Vec3::new(1.4, 0.5, -8.0),
                half_extents: Vec3::new(0.15, 1.5, 0.15),
            }],
        }
    }
}

pub fn parse_scenario(contents: &str) -> Result<Scenario, Box<dyn std::error::Error>> {
    Ok(from_str(contents)?)
}

/// Load a scenario from `path`. A missing file yields the default scenario.
pub fn load_scenario(path: &Path) -> Result<Scenario, Box<dyn std::error::Error>> {
    if !path.exists() {
        info!(
            "Scenario file not found: {}. Using the default scenario.",
            path.display()
        );
        return Ok(Scenario::default());
    }

    let contents: String = fs::read_to_string(path)?;
    let scenario = parse_scenario(&contents)?;

    info!("Loaded scenario '{}' from {}", scenario.name, path.display());

    Ok(scenario)
}
