//! Paddle pose integration.
//!
//! Runs once per display frame. Takes the raw hand targets, keeps each hand
//! out of blocking geometry, rejects the pair if the shaft between them clips
//! through something, and derives the paddle's midpoint, orientation and
//! activation from what is left.

use bevy::prelude::*;

use crate::collision::{constrain, first_blocked_shaft_point, CollisionQuery, ConstraintKind};
use crate::config::PaddleConfig;
use crate::constants::MIN_ORIENT_SPAN;
use crate::diagnostics::{PaddleDiagnostics, PaddleEvent, Side};

/// Left and right hand positions.
#[derive(Clone, Copy, Debug, PartialEq, Default, Reflect)]
pub struct HandPair {
    pub left: Vec3,
    pub right: Vec3,
}

impl HandPair {
    pub fn new(left: Vec3, right: Vec3) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn get(&self, side: Side) -> Vec3 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.left.distance(self.right)
    }

    #[inline]
    pub fn midpoint(&self) -> Vec3 {
        (self.left + self.right) * 0.5
    }
}

/// Outcome of one pose tick. Transient: recomputed every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaddlePose {
    /// Constrained hand positions committed this tick.
    pub hands: HandPair,
    /// Where the paddle's center goes.
    pub midpoint: Vec3,
    /// Paddle rotation, `None` when the hands are too close to define one.
    ///
    /// The paddle looks from the left hand to the right hand (its -Z axis
    /// points at the right hand) with world up as the up hint.
    pub orientation: Option<Quat>,
    pub hand_distance: f32,
    pub active: bool,
    /// `true` when the shaft check rejected this tick's hands.
    pub rolled_back: bool,
}

/// Rotation looking from `left` to `right`, or `None` for spans under [`MIN_ORIENT_SPAN`].
pub fn paddle_orientation(left: Vec3, right: Vec3) -> Option<Quat> {
    let span = right - left;
    if span.length() <= MIN_ORIENT_SPAN {
        return None;
    }
    Some(Transform::IDENTITY.looking_to(span, Vec3::Y).rotation)
}

/// Constrain both hands, check the shaft, and derive the paddle pose.
///
/// `previous` is the pair committed on the last tick. On a shaft block both
/// hands fall back to it; there is no way to tell which hand caused the clip.
pub fn integrate_pose(
    config: &PaddleConfig,
    collision: &impl CollisionQuery,
    previous: HandPair,
    targets: HandPair,
    diagnostics: &mut impl PaddleDiagnostics,
) -> PaddlePose {
    let mut constrained = HandPair::default();

    for side in Side::BOTH {
        let from = previous.get(side);
        let target = targets.get(side);
        let result = constrain(
            collision,
            from,
            target,
            config.blade_collision_radius,
            config.blocking_layers,
        );

        match result.kind {
            ConstraintKind::Swept { hit } => {
                log::debug!(
                    "{side:?} hand stopped at {} (contact {})",
                    result.position,
                    hit.position
                );
                diagnostics.record(PaddleEvent::SweepBlocked {
                    side,
                    from,
                    contact: hit.position,
                    position: result.position,
                });
            }
            ConstraintKind::Refused => {
                log::debug!("{side:?} hand target {target} is inside blocking geometry");
                diagnostics.record(PaddleEvent::TargetRefused { side, from, target });
            }
            ConstraintKind::Free | ConstraintKind::Stationary => {}
        }

        match side {
            Side::Left => constrained.left = result.position,
            Side::Right => constrained.right = result.position,
        }
    }

    let blocked = first_blocked_shaft_point(
        collision,
        constrained.left,
        constrained.right,
        config.shaft_collision_radius,
        config.shaft_check_points,
        config.blocking_layers,
    );
    let rolled_back = blocked.is_some();
    if let Some(point) = blocked {
        log::debug!("paddle shaft blocked at {point}, keeping previous hands");
        diagnostics.record(PaddleEvent::ShaftBlocked { point });
        constrained = previous;
    }

    let hand_distance = constrained.span();
    let active = config.is_active_span(hand_distance);

    if !active {
        if config.show_debug_info {
            log::debug!(
                "paddle inactive: hand distance {:.2}m (min: {}m, max: {}m)",
                hand_distance,
                config.min_hand_distance,
                config.max_hand_distance
            );
        }
        diagnostics.record(PaddleEvent::Inactive { hand_distance });
    }

    PaddlePose {
        hands: constrained,
        midpoint: constrained.midpoint(),
        orientation: paddle_orientation(constrained.left, constrained.right),
        hand_distance,
        active,
        rolled_back,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{layers, Obstacle, StaticScene};

    fn hands(left: Vec3, right: Vec3) -> HandPair {
        HandPair::new(left, right)
    }

    #[test]
    fn test_free_hands_follow_targets() {
        let config = PaddleConfig::default();
        let previous = hands(Vec3::new(-0.5, 0.0, 0.0), Vec3::new(0.5, 0.0, 0.0));
        let targets = hands(Vec3::new(-0.5, 0.1, -0.2), Vec3::new(0.6, 0.1, -0.2));

        let mut events = Vec::new();
        let pose = integrate_pose(&config, &StaticScene::default(), previous, targets, &mut events);

        assert_eq!(pose.hands, targets);
        assert!(pose.active);
        assert!(!pose.rolled_back);
        assert!((pose.hand_distance - 1.1).abs() < 1e-5);
        assert!(pose.midpoint.distance(Vec3::new(0.05, 0.1, -0.2)) < 1e-5);
        assert!(events.is_empty());
    }

    #[test]
    fn test_orientation_points_forward_axis_at_right_hand() {
        let rotation = paddle_orientation(Vec3::ZERO, Vec3::X).unwrap();
        let forward = rotation * Vec3::NEG_Z;
        let up = rotation * Vec3::Y;
        assert!(forward.distance(Vec3::X) < 1e-5);
        assert!(up.distance(Vec3::Y) < 1e-5);
    }

    #[test]
    fn test_orientation_skipped_for_tiny_span() {
        assert!(paddle_orientation(Vec3::ZERO, Vec3::X * 0.005).is_none());
        assert!(paddle_orientation(Vec3::ONE, Vec3::ONE).is_none());
    }

    #[test]
    fn test_activation_bounds_are_inclusive() {
        let config = PaddleConfig {
            min_hand_distance: 0.5,
            max_hand_distance: 1.5,
            ..default()
        };
        let scene = StaticScene::default();
        let origin = HandPair::default();

        for (span, expected) in [(0.5, true), (1.5, true), (0.49, false), (1.51, false)] {
            let targets = hands(Vec3::ZERO, Vec3::X * span);
            let pose = integrate_pose(&config, &scene, origin, targets, &mut ());
            assert_eq!(pose.active, expected, "span {span}");
        }
    }

    #[test]
    fn test_inactive_reports_distance() {
        let config = PaddleConfig::default();
        let targets = hands(Vec3::ZERO, Vec3::X * 0.3);
        let mut events = Vec::new();
        let pose = integrate_pose(&config, &StaticScene::default(), targets, targets, &mut events);

        assert!(!pose.active);
        assert!(matches!(
            events.as_slice(),
            [PaddleEvent::Inactive { hand_distance }] if (*hand_distance - 0.3).abs() < 1e-6
        ));
    }

    #[test]
    fn test_shaft_block_rolls_back_both_hands() {
        let config = PaddleConfig {
            shaft_check_points: 5,
            ..default()
        };
        // A thin post right under the middle of the new shaft. The blades
        // themselves stay well clear of it.
        let scene = StaticScene::default().with(Obstacle::cuboid(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.02, 0.5, 0.02),
            layers::WORLD,
        ));
        let previous = hands(Vec3::new(-0.5, 0.0, 0.0), Vec3::new(0.5, 0.0, 0.0));
        let targets = hands(Vec3::new(-0.5, 0.0, -1.0), Vec3::new(0.5, 0.0, -1.0));

        let mut events = Vec::new();
        let pose = integrate_pose(&config, &scene, previous, targets, &mut events);

        assert!(pose.rolled_back);
        assert_eq!(pose.hands, previous);
        assert!(events
            .iter()
            .any(|e| matches!(e, PaddleEvent::ShaftBlocked { point } if point.distance(Vec3::new(0.0, 0.0, -1.0)) < 1e-5)));
    }

    #[test]
    fn test_hand_swept_into_hull_stops_short() {
        let config = PaddleConfig::default();
        let scene = StaticScene::default().with(Obstacle::cuboid(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(0.3, 0.2, 2.0),
            layers::HULL,
        ));
        let previous = hands(Vec3::new(-0.2, 0.0, 0.0), Vec3::new(1.2, 0.0, 0.0));
        let targets = hands(Vec3::new(-0.2, -1.0, 0.0), Vec3::new(1.2, 0.0, 0.0));
        let mut events = Vec::new();
        let pose = integrate_pose(&config, &scene, previous, targets, &mut events);

        // Hull top at y = -0.3, probe radius 0.08: contact at y = -0.22,
        // minus the 0.04 margin.
        assert!((pose.hands.left.y - (-0.18)).abs() < 1e-4);
        assert_eq!(pose.hands.right, targets.right);
        assert!(matches!(events[0], PaddleEvent::SweepBlocked { side: Side::Left, .. }));
    }
}
