/*!
Collision root module.

The paddle never owns collision geometry. It asks a [`CollisionQuery`]
implementation two questions: how far can a sphere travel along a direction,
and does a sphere at a point overlap anything. Everything else is built on top
of those two queries:

- constraint: hand constraint solver and shaft check
- scene:      analytic static scene (spheres and boxes) for headless use
- rapier:     adapter over the Rapier query pipeline used in the Bevy app
*/

pub mod constraint;
pub mod rapier;
pub mod scene;

use bevy::math::{Dir3, Vec3};

pub use constraint::{
    constrain, first_blocked_shaft_point, shaft_blocked, shaft_sample_points, Constrained,
    ConstraintKind,
};
pub use rapier::RapierScene;
pub use scene::{Obstacle, ObstacleShape, StaticScene};

/// Collision layer bits used by the paddle and the scenes it is tested against.
pub mod layers {
    /// World/terrain colliders (piers, rocks, banks)
    pub const WORLD: u32 = 1 << 1;
    /// The craft's own hull
    pub const HULL: u32 = 1 << 2;
    /// Paddle colliders, if the host gives the paddle any
    pub const PADDLE: u32 = 1 << 3;
    /// Water volumes; never blocking
    pub const WATER: u32 = 1 << 4;

    /// Layers the paddle is kept out of by default.
    pub const DEFAULT_BLOCKING: u32 = WORLD | HULL;
}

/// First contact of a sphere sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    /// Distance travelled along the sweep direction before contact.
    pub distance: f32,
    /// Center of the probe sphere at the moment of contact.
    pub position: Vec3,
}

/// Scene queries consumed by the paddle.
///
/// Both queries only consider geometry whose layer bits intersect `mask`.
pub trait CollisionQuery {
    /// Sweep a sphere from `origin` along `direction` for at most `max_distance`.
    fn sphere_sweep(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: u32,
    ) -> Option<SweepHit>;

    /// `true` if a sphere at `point` overlaps any geometry in `mask`.
    fn sphere_overlap(&self, point: Vec3, radius: f32, mask: u32) -> bool;
}

impl<T: CollisionQuery + ?Sized> CollisionQuery for &T {
    fn sphere_sweep(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: u32,
    ) -> Option<SweepHit> {
        (**self).sphere_sweep(origin, radius, direction, max_distance, mask)
    }

    fn sphere_overlap(&self, point: Vec3, radius: f32, mask: u32) -> bool {
        (**self).sphere_overlap(point, radius, mask)
    }
}
