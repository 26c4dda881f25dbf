//! Water deformation accumulator.
//!
//! A square height buffer laid over the water plane. Paddle disturbances are
//! stamped into it as soft round brushes and the whole field fades a little
//! every step, leaving a trail behind each stroke.
//!
//! The field is a pair of buffers: [`RippleField::step`] decays the readable
//! one into the other, stamps the queued disturbances there and swaps.
//! Stored values are normalized to `[0, 1]`; heights are scaled by
//! `max_height` on the way out.

use bevy::prelude::*;

pub const DEFAULT_RESOLUTION: usize = 256;
pub const DEFAULT_PLANE_SIZE: f32 = 100.0;
pub const DEFAULT_DECAY: f32 = 0.96;
pub const DEFAULT_MAX_HEIGHT: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Disturbance {
    position: Vec3,
    radius: f32,
    intensity: f32,
}

#[derive(Resource, Clone, Debug)]
pub struct RippleField {
    resolution: usize,
    plane_size: f32,
    pub decay: f32,
    pub max_height: f32,
    /// Readable buffer.
    front: Vec<f32>,
    back: Vec<f32>,
    pending: Vec<Disturbance>,
}

impl Default for RippleField {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION, DEFAULT_PLANE_SIZE)
    }
}

impl RippleField {
    /// A `resolution`² field covering a `plane_size` square centred on the origin.
    pub fn new(resolution: usize, plane_size: f32) -> Self {
        let resolution = resolution.max(2);
        Self {
            resolution,
            plane_size: plane_size.max(f32::EPSILON),
            decay: DEFAULT_DECAY,
            max_height: DEFAULT_MAX_HEIGHT,
            front: vec![0.0; resolution * resolution],
            back: vec![0.0; resolution * resolution],
            pending: Vec::new(),
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn plane_size(&self) -> f32 {
        self.plane_size
    }

    #[inline]
    fn cell_size(&self) -> f32 {
        self.plane_size / self.resolution as f32
    }

    /// Map a world position onto the plane's `[0, 1]²` texture space.
    ///
    /// Points off the plane land outside that range.
    #[inline]
    pub fn world_to_uv(&self, position: Vec3) -> Vec2 {
        let half = self.plane_size * 0.5;
        Vec2::new(
            (position.x + half) / self.plane_size,
            (position.z + half) / self.plane_size,
        )
    }

    /// Queue a disturbance for the next [`step`](Self::step).
    pub fn add_disturbance(&mut self, position: Vec3, radius: f32, intensity: f32) {
        if radius <= 0.0 || intensity <= 0.0 {
            return;
        }
        self.pending.push(Disturbance {
            position,
            radius,
            intensity,
        });
    }

    pub fn pending_disturbances(&self) -> usize {
        self.pending.len()
    }

    /// Decay, stamp the queued disturbances, swap.
    pub fn step(&mut self) {
        let decay = self.decay.clamp(0.0, 1.0);
        for (back, front) in self.back.iter_mut().zip(&self.front) {
            *back = front * decay;
        }

        let pending = std::mem::take(&mut self.pending);
        for disturbance in &pending {
            self.stamp(disturbance);
        }

        std::mem::swap(&mut self.front, &mut self.back);
    }

    fn stamp(&mut self, disturbance: &Disturbance) {
        let res = self.resolution;
        let cell = self.cell_size();
        let uv = self.world_to_uv(disturbance.position);
        let center = uv * res as f32;
        let reach = disturbance.radius / cell;

        let min_x = (center.x - reach).floor().max(0.0) as usize;
        let min_y = (center.y - reach).floor().max(0.0) as usize;
        let max_x = ((center.x + reach).ceil().max(0.0) as usize).min(res);
        let max_y = ((center.y + reach).ceil().max(0.0) as usize).min(res);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let cell_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = 1.0 - cell_center.distance(center) / reach;
                if t <= 0.0 {
                    continue;
                }
                // smoothstep falloff
                let weight = t * t * (3.0 - 2.0 * t);
                let value = &mut self.back[y * res + x];
                *value = (*value + disturbance.intensity * weight).clamp(0.0, 1.0);
            }
        }
    }

    /// Normalized value of the readable buffer at cell (x, y).
    #[inline]
    pub fn value(&self, x: usize, y: usize) -> f32 {
        self.front[y * self.resolution + x]
    }

    /// Bilinear height of the field under `position`; zero off the plane.
    pub fn height_at(&self, position: Vec3) -> f32 {
        let uv = self.world_to_uv(position);
        if !(0.0..=1.0).contains(&uv.x) || !(0.0..=1.0).contains(&uv.y) {
            return 0.0;
        }

        let last = (self.resolution - 1) as f32;
        let p = (uv * self.resolution as f32 - Vec2::splat(0.5)).clamp(Vec2::ZERO, Vec2::splat(last));
        let x0 = p.x.floor() as usize;
        let y0 = p.y.floor() as usize;
        let x1 = (x0 + 1).min(self.resolution - 1);
        let y1 = (y0 + 1).min(self.resolution - 1);
        let fx = p.x - x0 as f32;
        let fy = p.y - y0 as f32;

        let top = self.value(x0, y0).lerp(self.value(x1, y0), fx);
        let bottom = self.value(x0, y1).lerp(self.value(x1, y1), fx);
        top.lerp(bottom, fy) * self.max_height
    }

    /// Sum of all normalized values; a rough measure of how stirred up the water is.
    pub fn energy(&self) -> f32 {
        self.front.iter().sum()
    }

    pub fn clear(&mut self) {
        self.front.fill(0.0);
        self.back.fill(0.0);
        self.pending.clear();
    }
}
