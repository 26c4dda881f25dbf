//! Blade force model.
//!
//! Runs at the fixed physics rate. Each blade's tip velocity is estimated by
//! finite differences, compared against the local water velocity, and turned
//! into one of three forces:
//!
//! - propulsion while a submerged blade is pulled back (the power stroke),
//! - drag while a submerged blade is pushed forward,
//! - horizontal air drag while the blade is out of the water (recovery).
//!
//! Forces are applied at the tip through a [`CraftBody`].

use bevy::prelude::*;

use crate::collision::CollisionQuery;
use crate::config::PaddleConfig;
use crate::constants::{AIR_DRAG_MIN_SPEED, STROKE_DEAD_BAND, SUBMERGED_DRAG_FACTOR};
use crate::diagnostics::{PaddleDiagnostics, PaddleEvent, Side};
use crate::water::WaterOracle;

/// The craft's rigid body, as far as the paddle is concerned.
pub trait CraftBody {
    /// World orientation of the craft. Its -Z axis is the craft's forward.
    fn rotation(&self) -> Quat;

    /// Apply a world-space force at a world-space point for this physics step.
    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3);
}

impl<T: CraftBody + ?Sized> CraftBody for &mut T {
    fn rotation(&self) -> Quat {
        (**self).rotation()
    }

    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        (**self).apply_force_at_point(force, point);
    }
}

/// Where a blade is this physics tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BladeFrame {
    /// Tip position: force application and submersion test point.
    pub tip: Vec3,
    /// Blade face normal, taken from the blade root's up axis.
    pub face_normal: Vec3,
}

/// Per-blade state carried across physics ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct BladeState {
    /// Tip position on the previous physics tick.
    pub last_tip: Option<Vec3>,
    /// Result of the most recent submersion test.
    pub submerged: bool,
}

impl BladeState {
    /// Record this tick's tip and return its finite-difference velocity.
    ///
    /// The first observation has no history and yields zero.
    pub fn track(&mut self, tip: Vec3, dt: f32) -> Vec3 {
        let velocity = match self.last_tip {
            Some(last) if dt > 0.0 => (tip - last) / dt,
            _ => Vec3::ZERO,
        };
        self.last_tip = Some(tip);
        velocity
    }
}

/// Velocity expressed along the craft's axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalVelocity {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
}

impl LocalVelocity {
    pub fn from_world(rotation: Quat, velocity: Vec3) -> Self {
        let local = rotation.inverse() * velocity;
        Self {
            forward: -local.z,
            right: local.x,
            up: local.y,
        }
    }
}

/// What happened to one blade on one physics tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BladeOutcome {
    /// The tip is inside blocking geometry; marked dry, no force.
    Jammed,
    /// The water oracle had no data; nothing changed.
    NoWater,
    /// Submerged; `force` is `None` inside the dead band.
    Submerged { force: Option<Vec3> },
    /// Out of the water; `drag` is `None` below the air drag threshold.
    Airborne { drag: Option<Vec3> },
}

impl BladeOutcome {
    pub fn force(&self) -> Option<Vec3> {
        match *self {
            BladeOutcome::Submerged { force } => force,
            BladeOutcome::Airborne { drag } => drag,
            BladeOutcome::Jammed | BladeOutcome::NoWater => None,
        }
    }
}

/// Efficiency from blade orientation: `lerp(min, max, cos²θ)` with θ between face normal and up.
pub fn blade_efficiency(config: &PaddleConfig, face_normal: Vec3) -> f32 {
    let alignment = face_normal.normalize_or_zero().dot(Vec3::Y).abs();
    config.min_efficiency.lerp(config.max_efficiency, alignment * alignment)
}

/// Efficiency from hand span: 0 at `min_hand_distance`, 1 at `max_hand_distance`.
pub fn distance_efficiency(config: &PaddleConfig, hand_distance: f32) -> f32 {
    let band = config.max_hand_distance - config.min_hand_distance;
    if band <= 0.0 {
        return 0.0;
    }
    ((hand_distance - config.min_hand_distance) / band).clamp(0.0, 1.0)
}

/// Signed force magnitude along the craft's forward axis for a submerged blade.
///
/// Positive: propulsion from pulling back. Negative: drag from pushing
/// forward. Zero inside the dead band.
pub fn stroke_force(config: &PaddleConfig, forward_speed: f32, efficiency: f32) -> f32 {
    if forward_speed < -STROKE_DEAD_BAND {
        let speed = (-forward_speed).clamp(0.0, config.max_effective_speed);
        speed * config.force_multiplier * efficiency
    } else if forward_speed > STROKE_DEAD_BAND {
        -(forward_speed * config.force_multiplier * SUBMERGED_DRAG_FACTOR * efficiency)
    } else {
        0.0
    }
}

/// Horizontal air drag on a blade moving faster than [`AIR_DRAG_MIN_SPEED`].
pub fn air_drag(config: &PaddleConfig, velocity: Vec3) -> Option<Vec3> {
    if velocity.length() <= AIR_DRAG_MIN_SPEED {
        return None;
    }
    Some((-velocity * config.recovery_drag).with_y(0.0))
}

/// Run the force model for one blade.
///
/// The caller gates on activation; this assumes the paddle is active.
pub fn process_blade(
    side: Side,
    config: &PaddleConfig,
    state: &mut BladeState,
    frame: BladeFrame,
    hand_distance: f32,
    dt: f32,
    collision: &impl CollisionQuery,
    water: &impl WaterOracle,
    body: &mut impl CraftBody,
    diagnostics: &mut impl PaddleDiagnostics,
) -> BladeOutcome {
    let tip = frame.tip;
    let velocity = state.track(tip, dt);

    if collision.sphere_overlap(tip, config.blade_collision_radius, config.blocking_layers) {
        state.submerged = false;
        return BladeOutcome::Jammed;
    }

    // A miss leaves `submerged` as it was.
    let Some(sample) = water.sample_height(tip, config.min_spatial_length) else {
        return BladeOutcome::NoWater;
    };

    let mut water_velocity = sample.velocity;
    if let Some(flow) = water.sample_flow(tip, config.min_spatial_length) {
        water_velocity += Vec3::new(flow.x, 0.0, flow.y);
    }

    let was_submerged = state.submerged;
    let submerged = tip.y < sample.height + config.blade_depth_threshold;
    state.submerged = submerged;

    diagnostics.record(PaddleEvent::Submersion {
        side,
        tip,
        water_height: sample.height,
        submerged,
    });

    let surface_point = tip.with_y(sample.height);

    if !submerged {
        let drag = air_drag(config, velocity);
        if let Some(drag) = drag {
            body.apply_force_at_point(drag, tip);
            diagnostics.record(PaddleEvent::Force {
                side,
                force: drag,
                point: tip,
            });
        }
        return BladeOutcome::Airborne { drag };
    }

    if !was_submerged && config.max_effective_speed > 0.0 {
        diagnostics.record(PaddleEvent::Disturbance {
            position: surface_point,
            radius: config.disturbance_radius,
            intensity: (velocity.length() / config.max_effective_speed).clamp(0.0, 1.0),
        });
    }

    let rotation = body.rotation();
    let local = LocalVelocity::from_world(rotation, velocity - water_velocity);
    let efficiency = blade_efficiency(config, frame.face_normal)
        * distance_efficiency(config, hand_distance);

    if local.forward.abs() <= STROKE_DEAD_BAND {
        return BladeOutcome::Submerged { force: None };
    }
    let magnitude = stroke_force(config, local.forward, efficiency);

    let force = rotation * Vec3::NEG_Z * magnitude;
    body.apply_force_at_point(force, tip);
    diagnostics.record(PaddleEvent::Force {
        side,
        force,
        point: tip,
    });

    if magnitude > 0.0 && config.max_effective_speed > 0.0 {
        let effective = (-local.forward).clamp(0.0, config.max_effective_speed);
        diagnostics.record(PaddleEvent::Disturbance {
            position: surface_point,
            radius: config.disturbance_radius,
            intensity: effective / config.max_effective_speed,
        });
    }

    BladeOutcome::Submerged { force: Some(force) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{layers, Obstacle, StaticScene};
    use crate::water::{GerstnerWater, WaterSample, WavePreset};

    const EPS: f32 = 1e-3;
    const DT: f32 = 0.02;

    #[derive(Default)]
    struct RecordingBody {
        rotation: Quat,
        forces: Vec<(Vec3, Vec3)>,
    }

    impl CraftBody for RecordingBody {
        fn rotation(&self) -> Quat {
            self.rotation
        }

        fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
            self.forces.push((force, point));
        }
    }

    struct NoWater;

    impl WaterOracle for NoWater {
        fn sample_height(&self, _: Vec3, _: f32) -> Option<WaterSample> {
            None
        }

        fn sample_flow(&self, _: Vec3, _: f32) -> Option<Vec2> {
            None
        }
    }

    /// Flat water moving at a fixed orbital velocity, with no flow data.
    struct NoFlow(Vec3);

    impl WaterOracle for NoFlow {
        fn sample_height(&self, _: Vec3, _: f32) -> Option<WaterSample> {
            Some(WaterSample {
                height: 0.0,
                normal: Vec3::Y,
                velocity: self.0,
            })
        }

        fn sample_flow(&self, _: Vec3, _: f32) -> Option<Vec2> {
            None
        }
    }

    fn full_efficiency() -> PaddleConfig {
        PaddleConfig {
            min_efficiency: 1.0,
            max_efficiency: 1.0,
            ..default()
        }
    }

    fn flat_water() -> GerstnerWater {
        GerstnerWater::new(WavePreset::Still.to_config(0.0))
    }

    /// Run two ticks so the second sees `velocity`.
    fn stroke(
        config: &PaddleConfig,
        state: &mut BladeState,
        start: Vec3,
        velocity: Vec3,
        water: &impl WaterOracle,
        body: &mut RecordingBody,
        events: &mut Vec<PaddleEvent>,
    ) -> BladeOutcome {
        let scene = StaticScene::default();
        state.track(start, DT);
        let frame = BladeFrame {
            tip: start + velocity * DT,
            face_normal: Vec3::Y,
        };
        process_blade(
            Side::Left,
            config,
            state,
            frame,
            config.max_hand_distance,
            DT,
            &scene,
            water,
            body,
            events,
        )
    }

    #[test]
    fn test_blade_efficiency_by_orientation() {
        let config = PaddleConfig::default();
        assert!((blade_efficiency(&config, Vec3::Y) - 1.0).abs() < 1e-6);
        assert!((blade_efficiency(&config, Vec3::NEG_Y) - 1.0).abs() < 1e-6);
        assert!((blade_efficiency(&config, Vec3::X) - 0.1).abs() < 1e-6);

        // 45 degrees: cos² = 0.5
        let tilted = Vec3::new(1.0, 1.0, 0.0);
        assert!((blade_efficiency(&config, tilted) - 0.55).abs() < 1e-5);
    }

    #[test]
    fn test_distance_efficiency_is_linear() {
        let config = PaddleConfig {
            min_hand_distance: 0.4,
            max_hand_distance: 1.4,
            ..default()
        };
        assert_eq!(distance_efficiency(&config, 0.4), 0.0);
        assert_eq!(distance_efficiency(&config, 1.4), 1.0);
        assert!((distance_efficiency(&config, 0.9) - 0.5).abs() < 1e-6);
        assert_eq!(distance_efficiency(&config, 0.1), 0.0);
        assert_eq!(distance_efficiency(&config, 3.0), 1.0);
    }

    #[test]
    fn test_stroke_force_law() {
        let config = PaddleConfig {
            max_effective_speed: 2.5,
            force_multiplier: 60.0,
            ..default()
        };
        assert!((stroke_force(&config, -2.0, 1.0) - 120.0).abs() < 1e-4);
        assert!((stroke_force(&config, 1.0, 1.0) + 18.0).abs() < 1e-4);
        // Saturates at max_effective_speed.
        assert!((stroke_force(&config, -4.0, 1.0) - 150.0).abs() < 1e-4);
        // Dead band.
        assert_eq!(stroke_force(&config, 0.05, 1.0), 0.0);
        assert_eq!(stroke_force(&config, -0.1, 1.0), 0.0);
        assert_eq!(stroke_force(&config, 0.1, 1.0), 0.0);
    }

    #[test]
    fn test_air_drag_is_horizontal() {
        let config = PaddleConfig::default();
        let drag = air_drag(&config, Vec3::new(2.0, -3.0, 1.0)).unwrap();
        assert_eq!(drag, Vec3::new(-1.0, 0.0, -0.5));
        assert!(air_drag(&config, Vec3::new(0.1, 0.1, 0.0)).is_none());
    }

    #[test]
    fn test_local_velocity_uses_craft_axes() {
        let yaw = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        // Rotated a quarter turn left, the craft's forward is world -X.
        let local = LocalVelocity::from_world(yaw, Vec3::NEG_X * 2.0);
        assert!((local.forward - 2.0).abs() < 1e-5);
        assert!(local.right.abs() < 1e-5);
    }

    #[test]
    fn test_power_stroke_propels_forward() {
        let config = full_efficiency();
        let mut state = BladeState::default();
        let mut body = RecordingBody::default();
        let mut events = Vec::new();

        let start = Vec3::new(0.8, -0.3, -0.5);
        let outcome = stroke(
            &config,
            &mut state,
            start,
            Vec3::Z * 2.0,
            &flat_water(),
            &mut body,
            &mut events,
        );

        let force = outcome.force().unwrap();
        assert!(force.distance(Vec3::NEG_Z * 120.0) < EPS);
        assert!(state.submerged);
        assert_eq!(body.forces.len(), 1);
        assert!(body.forces[0].1.distance(start + Vec3::Z * 2.0 * DT) < 1e-5);
        // Entry splash and stroke disturbance.
        let disturbances = events
            .iter()
            .filter(|e| matches!(e, PaddleEvent::Disturbance { .. }))
            .count();
        assert_eq!(disturbances, 2);
    }

    #[test]
    fn test_forward_push_drags() {
        let config = full_efficiency();
        let mut state = BladeState::default();
        let mut body = RecordingBody::default();

        let outcome = stroke(
            &config,
            &mut state,
            Vec3::new(0.8, -0.3, 0.0),
            Vec3::NEG_Z,
            &flat_water(),
            &mut body,
            &mut Vec::new(),
        );

        let force = outcome.force().unwrap();
        assert!(force.distance(Vec3::Z * 18.0) < EPS);
    }

    #[test]
    fn test_dead_band_applies_nothing() {
        let config = full_efficiency();
        let mut state = BladeState::default();
        let mut body = RecordingBody::default();

        let outcome = stroke(
            &config,
            &mut state,
            Vec3::new(0.8, -0.3, 0.0),
            Vec3::Z * 0.05,
            &flat_water(),
            &mut body,
            &mut Vec::new(),
        );

        assert_eq!(outcome, BladeOutcome::Submerged { force: None });
        assert!(body.forces.is_empty());
    }

    #[test]
    fn test_current_counts_against_blade() {
        // Blade held still in a current flowing toward the stern: relative to
        // the water it moves forward, so it drags.
        let config = full_efficiency();
        let water = GerstnerWater::new(
            WavePreset::Still
                .to_config(0.0)
                .with_current(Vec2::new(0.0, 1.0)),
        );
        let mut state = BladeState::default();
        let mut body = RecordingBody::default();

        let outcome = stroke(
            &config,
            &mut state,
            Vec3::new(0.8, -0.3, 0.0),
            Vec3::ZERO,
            &water,
            &mut body,
            &mut Vec::new(),
        );

        let force = outcome.force().unwrap();
        assert!(force.distance(Vec3::Z * 18.0) < EPS);
    }

    #[test]
    fn test_flow_miss_uses_orbital_velocity_only() {
        // Water moving toward the bow at 2 m/s, blade still: full propulsion.
        let config = full_efficiency();
        let mut state = BladeState::default();
        let mut body = RecordingBody::default();

        let outcome = stroke(
            &config,
            &mut state,
            Vec3::new(0.8, -0.3, 0.0),
            Vec3::ZERO,
            &NoFlow(Vec3::NEG_Z * 2.0),
            &mut body,
            &mut Vec::new(),
        );

        let force = outcome.force().unwrap();
        assert!(force.distance(Vec3::NEG_Z * 120.0) < EPS);
        assert!(state.submerged);
    }

    #[test]
    fn test_shallow_tip_is_not_submerged() {
        // Within the depth threshold of the surface counts as dry.
        let config = full_efficiency();
        let mut state = BladeState::default();
        let mut body = RecordingBody::default();

        let outcome = stroke(
            &config,
            &mut state,
            Vec3::new(0.8, -0.04, 0.0),
            Vec3::Z * 0.1,
            &flat_water(),
            &mut body,
            &mut Vec::new(),
        );

        assert_eq!(outcome, BladeOutcome::Airborne { drag: None });
        assert!(!state.submerged);
    }

    #[test]
    fn test_recovery_air_drag() {
        let config = full_efficiency();
        let mut state = BladeState::default();
        let mut body = RecordingBody::default();

        let outcome = stroke(
            &config,
            &mut state,
            Vec3::new(0.8, 0.5, 0.0),
            Vec3::new(0.0, 1.0, -2.0),
            &flat_water(),
            &mut body,
            &mut Vec::new(),
        );

        let drag = outcome.force().unwrap();
        assert!(drag.distance(Vec3::new(0.0, 0.0, 1.0)) < EPS);
        assert_eq!(body.forces.len(), 1);
    }

    #[test]
    fn test_oracle_miss_keeps_stale_submersion() {
        let config = full_efficiency();
        let mut state = BladeState {
            last_tip: None,
            submerged: true,
        };
        let mut body = RecordingBody::default();

        let outcome = stroke(
            &config,
            &mut state,
            Vec3::new(0.8, 0.5, 0.0),
            Vec3::Z * 2.0,
            &NoWater,
            &mut body,
            &mut Vec::new(),
        );

        assert_eq!(outcome, BladeOutcome::NoWater);
        assert!(state.submerged);
        assert!(body.forces.is_empty());
        assert!(state.last_tip.is_some());
    }

    #[test]
    fn test_jammed_blade_applies_nothing() {
        let config = full_efficiency();
        let scene = StaticScene::default().with(Obstacle::sphere(
            Vec3::new(0.8, -0.3, 0.0),
            0.2,
            layers::WORLD,
        ));
        let mut state = BladeState {
            last_tip: Some(Vec3::new(0.8, -0.3, -0.04)),
            submerged: true,
        };
        let mut body = RecordingBody::default();

        let outcome = process_blade(
            Side::Right,
            &config,
            &mut state,
            BladeFrame {
                tip: Vec3::new(0.8, -0.3, 0.0),
                face_normal: Vec3::Y,
            },
            1.5,
            DT,
            &scene,
            &flat_water(),
            &mut body,
            &mut (),
        );

        assert_eq!(outcome, BladeOutcome::Jammed);
        assert!(!state.submerged);
        assert!(body.forces.is_empty());
    }

    #[test]
    fn test_first_tick_has_no_velocity() {
        let mut state = BladeState::default();
        assert_eq!(state.track(Vec3::ONE, DT), Vec3::ZERO);
        let v = state.track(Vec3::ONE + Vec3::X * 0.1, DT);
        assert!((v - Vec3::X * 5.0).length() < 1e-4);
    }
}
