use bevy::math::{Dir3, Vec3};

use super::{CollisionQuery, SweepHit};
use crate::constants::{MIN_CONSTRAIN_DISTANCE, MIN_SHAFT_CHECK_POINTS};

/// How [`constrain`] arrived at its result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstraintKind {
    /// The target was within [`MIN_CONSTRAIN_DISTANCE`]; nothing moved.
    Stationary,
    /// Nothing was in the way; the target was reached.
    Free,
    /// The sweep hit blocking geometry and stopped short of it.
    Swept { hit: SweepHit },
    /// The target itself sits inside blocking geometry; the move was refused.
    Refused,
}

/// Result of constraining one hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constrained {
    pub position: Vec3,
    pub kind: ConstraintKind,
}

/// Move a probe sphere from `current` toward `target` without entering blocking geometry.
///
/// Algorithm:
/// - Sphere-sweep along the segment.
/// - On hit at distance `d`, stop at `d - probe_radius / 2` (never behind `current`),
///   which leaves an inward margin so the next tick does not start in contact.
/// - Without a hit, refuse the move if the target overlaps blocking geometry.
///
/// Geometry the probe already overlaps at `current` does not stop the sweep,
/// so a hand the scene moved into can still be pulled back out. Moves that end
/// inside that geometry are refused by the target check.
pub fn constrain(
    query: &impl CollisionQuery,
    current: Vec3,
    target: Vec3,
    probe_radius: f32,
    mask: u32,
) -> Constrained {
    let stationary = Constrained {
        position: current,
        kind: ConstraintKind::Stationary,
    };

    let delta = target - current;
    let distance = delta.length();
    if distance < MIN_CONSTRAIN_DISTANCE {
        return stationary;
    }
    let Ok(direction) = Dir3::new(delta) else {
        return stationary;
    };

    if let Some(hit) = query.sphere_sweep(current, probe_radius, direction, distance, mask) {
        let travel = (hit.distance - probe_radius * 0.5).max(0.0);
        return Constrained {
            position: current + direction * travel,
            kind: ConstraintKind::Swept { hit },
        };
    }

    if query.sphere_overlap(target, probe_radius, mask) {
        return Constrained {
            position: current,
            kind: ConstraintKind::Refused,
        };
    }

    Constrained {
        position: target,
        kind: ConstraintKind::Free,
    }
}

/// Equally spaced points from `left` to `right`, both included.
///
/// Counts below two are raised to two.
pub fn shaft_sample_points(left: Vec3, right: Vec3, count: usize) -> impl Iterator<Item = Vec3> {
    let count = count.max(MIN_SHAFT_CHECK_POINTS);
    let last = (count - 1) as f32;
    (0..count).map(move |i| left.lerp(right, i as f32 / last))
}

/// First shaft sample that overlaps blocking geometry, walking from `left`.
pub fn first_blocked_shaft_point(
    query: &impl CollisionQuery,
    left: Vec3,
    right: Vec3,
    probe_radius: f32,
    check_points: usize,
    mask: u32,
) -> Option<Vec3> {
    shaft_sample_points(left, right, check_points)
        .find(|&point| query.sphere_overlap(point, probe_radius, mask))
}

/// `true` if the straight shaft between the hands passes through blocking geometry.
pub fn shaft_blocked(
    query: &impl CollisionQuery,
    left: Vec3,
    right: Vec3,
    probe_radius: f32,
    check_points: usize,
    mask: u32,
) -> bool {
    first_blocked_shaft_point(query, left, right, probe_radius, check_points, mask).is_some()
}
