//! Planar kayak hull.
//!
//! Stands in for a full rigid body solver: the hull floats at a fixed height
//! and only translates in x/z and yaws. Paddle forces are accumulated during
//! a physics step and consumed by [`HullBody::integrate`].

use bevy::prelude::*;
use paddle::CraftBody;

use crate::scenario::HullParams;

#[derive(Resource, Debug, Clone)]
pub struct HullBody {
    pub position: Vec3,
    pub yaw: f32,
    pub velocity: Vec3,
    pub yaw_rate: f32,
    mass: f32,
    yaw_inertia: f32,
    linear_damping: f32,
    angular_damping: f32,
    force: Vec3,
    torque: Vec3,
}

impl HullBody {
    pub fn new(params: &HullParams) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            velocity: Vec3::ZERO,
            yaw_rate: 0.0,
            mass: params.mass.max(f32::EPSILON),
            yaw_inertia: params.yaw_inertia.max(f32::EPSILON),
            linear_damping: params.linear_damping.max(0.0),
            angular_damping: params.angular_damping.max(0.0),
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    /// Hull-local point to world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.position + CraftBody::rotation(self) * local
    }

    /// Force accumulated since the last step.
    pub fn pending_force(&self) -> Vec3 {
        self.force
    }

    /// Semi-implicit Euler step, then clear the accumulators.
    pub fn integrate(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let acceleration = self.force.with_y(0.0) / self.mass;
        self.velocity += acceleration * dt;
        self.velocity *= (1.0 - self.linear_damping * dt).max(0.0);
        self.position += self.velocity * dt;

        self.yaw_rate += self.torque.y / self.yaw_inertia * dt;
        self.yaw_rate *= (1.0 - self.angular_damping * dt).max(0.0);
        self.yaw += self.yaw_rate * dt;

        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}

impl CraftBody for HullBody {
    fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force += force;
        self.torque += (point - self.position).cross(force);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hull() -> HullBody {
        HullBody::new(&HullParams {
            linear_damping: 0.0,
            angular_damping: 0.0,
            ..default()
        })
    }

    #[test]
    fn test_centered_force_translates() {
        let mut body = hull();
        body.apply_force_at_point(Vec3::NEG_Z * 100.0, Vec3::ZERO);
        body.integrate(1.0);

        assert!(body.velocity.distance(Vec3::NEG_Z) < 1e-5);
        assert!(body.position.distance(Vec3::NEG_Z) < 1e-5);
        assert_eq!(body.yaw, 0.0);
        assert_eq!(body.pending_force(), Vec3::ZERO);
    }

    #[test]
    fn test_left_stroke_turns_right() {
        let mut body = hull();
        body.apply_force_at_point(Vec3::NEG_Z * 60.0, Vec3::new(-1.5, 0.0, 0.0));
        body.integrate(0.1);
        assert!(body.yaw_rate < 0.0);
        assert!(body.yaw < 0.0);
    }

    #[test]
    fn test_vertical_force_is_ignored() {
        let mut body = hull();
        body.apply_force_at_point(Vec3::Y * 500.0, Vec3::ZERO);
        body.integrate(0.5);
        assert_eq!(body.position, Vec3::ZERO);
    }

    #[test]
    fn test_damping_slows_the_hull() {
        let mut body = HullBody::new(&HullParams::default());
        body.velocity = Vec3::NEG_Z * 2.0;
        for _ in 0..50 {
            body.integrate(0.02);
        }
        assert!(body.velocity.length() < 2.0);
        assert!(body.velocity.z < 0.0);
    }

    #[test]
    fn test_to_world_follows_yaw() {
        let mut body = hull();
        body.position = Vec3::new(1.0, 0.0, 0.0);
        body.yaw = std::f32::consts::FRAC_PI_2;
        assert!(body.to_world(Vec3::NEG_Z).distance(Vec3::ZERO) < 1e-5);
    }
}
