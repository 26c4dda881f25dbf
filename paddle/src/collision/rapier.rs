//! Rapier integration for the paddle's scene queries.
//!
//! The Bevy app keeps its colliders in the Rapier context; this module wraps
//! the query pipeline so the constraint solver can run against it, and maps
//! the paddle's layer bits onto Rapier collision groups.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{layers, CollisionQuery, SweepHit};

/// Collision groups for a kayak hull collider: a member of `HULL`, colliding with the world.
pub fn hull_collision_groups() -> CollisionGroups {
    CollisionGroups::new(
        Group::from_bits_truncate(layers::HULL),
        Group::from_bits_truncate(layers::WORLD),
    )
}

/// Collision groups for static world geometry the paddle must not pass through.
pub fn world_collision_groups() -> CollisionGroups {
    CollisionGroups::new(Group::from_bits_truncate(layers::WORLD), Group::ALL)
}

/// Query filter that only sees colliders on `mask`.
pub fn blocking_filter<'a>(mask: u32) -> QueryFilter<'a> {
    QueryFilter::default().groups(CollisionGroups::new(
        Group::ALL,
        Group::from_bits_truncate(mask),
    ))
}

/// Borrowed view over one Rapier context.
pub struct RapierScene<'a> {
    pub colliders: &'a RapierContextColliders,
    pub bodies: &'a RapierRigidBodySet,
    pub pipeline: &'a RapierQueryPipeline,
}

impl<'a> RapierScene<'a> {
    pub fn new(
        colliders: &'a RapierContextColliders,
        bodies: &'a RapierRigidBodySet,
        pipeline: &'a RapierQueryPipeline,
    ) -> Self {
        Self {
            colliders,
            bodies,
            pipeline,
        }
    }
}

impl CollisionQuery for RapierScene<'_> {
    fn sphere_sweep(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: u32,
    ) -> Option<SweepHit> {
        let probe = Collider::ball(radius);
        // Unit velocity: time of impact is the travelled distance. Colliders
        // the probe starts inside are passed through.
        let (_, hit) = self.pipeline.cast_shape(
            self.colliders,
            self.bodies,
            origin,
            Quat::IDENTITY,
            *direction,
            &probe,
            ShapeCastOptions {
                max_time_of_impact: max_distance,
                stop_at_penetration: false,
                ..default()
            },
            blocking_filter(mask),
        )?;

        Some(SweepHit {
            distance: hit.time_of_impact,
            position: origin + direction * hit.time_of_impact,
        })
    }

    fn sphere_overlap(&self, point: Vec3, radius: f32, mask: u32) -> bool {
        self.pipeline
            .intersection_with_shape(
                self.colliders,
                self.bodies,
                point,
                Quat::IDENTITY,
                &Collider::ball(radius),
                blocking_filter(mask),
            )
            .is_some()
    }
}
