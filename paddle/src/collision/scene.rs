//! Analytic static scene.
//!
//! A flat list of spheres and axis-aligned boxes, each tagged with layer bits.
//! Sweeps cast a ray against every obstacle inflated by the probe radius, so
//! box corners are treated as square rather than rounded. That is slightly
//! conservative and fine for keeping a paddle out of a hull.

use bevy::math::{
    bounding::{Aabb3d, BoundingSphere, IntersectsVolume, RayCast3d},
    Dir3, Vec3, Vec3A,
};

use super::{CollisionQuery, SweepHit};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObstacleShape {
    Sphere { center: Vec3, radius: f32 },
    Cuboid { center: Vec3, half_extents: Vec3 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub shape: ObstacleShape,
    pub layers: u32,
}

impl Obstacle {
    pub fn sphere(center: Vec3, radius: f32, layers: u32) -> Self {
        Self {
            shape: ObstacleShape::Sphere { center, radius },
            layers,
        }
    }

    pub fn cuboid(center: Vec3, half_extents: Vec3, layers: u32) -> Self {
        Self {
            shape: ObstacleShape::Cuboid {
                center,
                half_extents: half_extents.abs(),
            },
            layers,
        }
    }

    #[inline]
    fn matches(&self, mask: u32) -> bool {
        self.layers & mask != 0
    }

    /// Distance along `ray` at which a probe of `radius` first touches this obstacle.
    ///
    /// An obstacle the probe already starts inside is not a hit, so a probe
    /// can always back out of it.
    fn cast(&self, ray: &RayCast3d, radius: f32) -> Option<f32> {
        let origin = Vec3::from(ray.origin);
        match self.shape {
            ObstacleShape::Sphere {
                center,
                radius: own,
            } => {
                let reach = own + radius;
                if origin.distance_squared(center) < reach * reach {
                    return None;
                }
                ray.sphere_intersection_at(&BoundingSphere::new(center, reach))
            }
            ObstacleShape::Cuboid {
                center,
                half_extents,
            } => {
                let inflated = half_extents + Vec3::splat(radius);
                if (origin - center).abs().cmplt(inflated).all() {
                    return None;
                }
                ray.aabb_intersection_at(&Aabb3d::new(center, inflated))
            }
        }
    }

    fn overlaps(&self, probe: &BoundingSphere) -> bool {
        match self.shape {
            ObstacleShape::Sphere { center, radius } => {
                probe.intersects(&BoundingSphere::new(center, radius))
            }
            ObstacleShape::Cuboid {
                center,
                half_extents,
            } => probe.intersects(&Aabb3d::new(center, half_extents)),
        }
    }
}

/// Immutable-by-convention collection of blocking obstacles.
#[derive(Clone, Debug, Default)]
pub struct StaticScene {
    obstacles: Vec<Obstacle>,
}

impl StaticScene {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn add(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn with(mut self, obstacle: Obstacle) -> Self {
        self.add(obstacle);
        self
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Move every obstacle on `layers` by `offset` (e.g. a hull that follows the craft).
    pub fn translate_layers(&mut self, layers: u32, offset: Vec3) {
        for obstacle in self.obstacles.iter_mut().filter(|o| o.matches(layers)) {
            match &mut obstacle.shape {
                ObstacleShape::Sphere { center, .. } | ObstacleShape::Cuboid { center, .. } => {
                    *center += offset;
                }
            }
        }
    }
}

impl CollisionQuery for StaticScene {
    fn sphere_sweep(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
        mask: u32,
    ) -> Option<SweepHit> {
        let ray = RayCast3d::new(Vec3A::from(origin), direction, max_distance);

        self.obstacles
            .iter()
            .filter(|o| o.matches(mask))
            .filter_map(|o| o.cast(&ray, radius))
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| SweepHit {
                distance,
                position: origin + direction * distance,
            })
    }

    fn sphere_overlap(&self, point: Vec3, radius: f32, mask: u32) -> bool {
        let probe = BoundingSphere::new(point, radius);
        self.obstacles
            .iter()
            .filter(|o| o.matches(mask))
            .any(|o| o.overlaps(&probe))
    }
}
