//! Gerstner water oracle.

use super::config::{WaveConfig, MAX_WAVES};
use super::{WaterOracle, WaterSample};
use bevy::math::{Vec2, Vec3};

/// Precomputed constants for a single wave.
#[derive(Clone, Copy, Default)]
struct WaveConstants {
    /// Wave number k = 2π / wavelength
    k: f32,
    /// Angular frequency ω = k * speed
    omega: f32,
    /// Amplitude = steepness / k, scaled
    amplitude: f32,
    /// Steepness, scaled (normal contribution)
    slope: f32,
    wavelength: f32,
    direction: Vec2,
}

/// Water oracle summing up to [`MAX_WAVES`] Gerstner waves over a uniform current.
pub struct GerstnerWater {
    config: WaveConfig,
    wave_constants: [WaveConstants; MAX_WAVES],
    time: f32,
}

impl GerstnerWater {
    pub fn new(config: WaveConfig) -> Self {
        let mut wave_constants = [WaveConstants::default(); MAX_WAVES];

        for (slot, wave) in wave_constants.iter_mut().zip(&config.waves) {
            let k = wave.wave_number();
            *slot = WaveConstants {
                k,
                omega: wave.frequency(),
                amplitude: (wave.steepness / k) * config.amplitude_scale,
                slope: wave.steepness * config.amplitude_scale,
                wavelength: wave.wavelength,
                direction: wave.direction,
            };
        }

        Self {
            config,
            wave_constants,
            time: 0.0,
        }
    }

    /// Update the wave configuration (e.g., when weather changes). Keeps the clock.
    pub fn set_config(&mut self, config: WaveConfig) {
        let time = self.time;
        *self = Self::new(config);
        self.time = time;
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// `true` if (x, z) lies inside the configured extent.
    #[inline]
    pub fn covers(&self, x: f32, z: f32) -> bool {
        self.config
            .extent
            .is_none_or(|extent| extent.contains(Vec2::new(x, z)))
    }

    fn active_waves(&self, min_feature_size: f32) -> impl Iterator<Item = &WaveConstants> {
        self.wave_constants
            .iter()
            .take(self.config.waves.len().min(MAX_WAVES))
            .filter(move |wc| wc.wavelength >= min_feature_size)
    }

    /// Evaluate the surface at (x, z) without domain checks.
    pub fn evaluate(&self, x: f32, z: f32, min_feature_size: f32) -> WaterSample {
        let mut height = self.config.base_level;
        let mut normal = Vec3::Y;
        let mut velocity = Vec3::ZERO;

        for wc in self.active_waves(min_feature_size) {
            // Phase = k * (dir · pos) - ω * t
            let phase = wc.k * wc.direction.dot(Vec2::new(x, z)) - wc.omega * self.time;
            let (sin_phase, cos_phase) = phase.sin_cos();

            height += wc.amplitude * cos_phase;

            normal.x -= wc.direction.x * wc.slope * cos_phase;
            normal.y -= wc.slope * sin_phase;
            normal.z -= wc.direction.y * wc.slope * cos_phase;

            // Horizontal orbital motion plus d(height)/dt
            let orbital = wc.amplitude * wc.omega;
            velocity.x += wc.direction.x * orbital * cos_phase;
            velocity.z += wc.direction.y * orbital * cos_phase;
            velocity.y += orbital * sin_phase;
        }

        WaterSample {
            height,
            normal: normal.normalize_or(Vec3::Y),
            velocity,
        }
    }

    /// Signed depth of `position` below the surface (positive when underwater).
    #[inline]
    pub fn depth_at(&self, position: Vec3) -> f32 {
        self.evaluate(position.x, position.z, 0.0).height - position.y
    }
}

impl WaterOracle for GerstnerWater {
    fn sample_height(&self, point: Vec3, min_feature_size: f32) -> Option<WaterSample> {
        self.covers(point.x, point.z)
            .then(|| self.evaluate(point.x, point.z, min_feature_size))
    }

    fn sample_flow(&self, point: Vec3, _min_feature_size: f32) -> Option<Vec2> {
        self.covers(point.x, point.z).then_some(self.config.current)
    }

    fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::config::{WaveParams, WavePreset};
    use bevy::math::Rect;

    #[test]
    fn test_still_water_height() {
        let water = GerstnerWater::new(WavePreset::Still.to_config(10.0));

        let sample = water.sample_height(Vec3::new(0.0, 0.0, 0.0), 1.0).unwrap();
        assert_eq!(sample.height, 10.0);
        assert_eq!(sample.velocity, Vec3::ZERO);
        assert_eq!(sample.normal, Vec3::Y);
        assert_eq!(
            water.sample_height(Vec3::new(100.0, 3.0, 100.0), 1.0).unwrap().height,
            10.0
        );
    }

    #[test]
    fn test_ocean_wave_variation() {
        let mut water = GerstnerWater::new(WavePreset::Ocean.to_config(0.0));

        let h1 = water.evaluate(0.0, 0.0, 0.0).height;
        let h3 = water.evaluate(5.0, 5.0, 0.0).height;
        water.set_time(1.0);
        let h2 = water.evaluate(0.0, 0.0, 0.0).height;

        assert_ne!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_min_feature_size_drops_short_waves() {
        let mut config = WaveConfig::new(0.0);
        config.add_wave(WaveParams::new(Vec2::X, 0.5, 0.5, 1.0));
        let water = GerstnerWater::new(config);

        // At x = 0, t = 0 the only wave sits at its crest.
        assert!(water.evaluate(0.0, 0.0, 0.0).height > 0.0);
        assert_eq!(water.evaluate(0.0, 0.0, 1.0).height, 0.0);
    }

    #[test]
    fn test_orbital_velocity_follows_wave_direction() {
        let mut config = WaveConfig::new(0.0);
        config.add_wave(WaveParams::new(Vec2::Y, 0.4, 4.0, 1.0));
        let water = GerstnerWater::new(config);

        // Crest: surface moves along the wave direction, no vertical motion.
        let sample = water.evaluate(0.0, 0.0, 0.0);
        assert!(sample.velocity.z > 0.0);
        assert!(sample.velocity.x.abs() < 1e-6);
        assert!(sample.velocity.y.abs() < 1e-6);
    }

    #[test]
    fn test_flow_returns_current() {
        let config = WavePreset::Still
            .to_config(0.0)
            .with_current(Vec2::new(0.4, -0.1));
        let water = GerstnerWater::new(config);
        assert_eq!(
            water.sample_flow(Vec3::new(3.0, 0.0, 2.0), 1.0),
            Some(Vec2::new(0.4, -0.1))
        );
    }

    #[test]
    fn test_outside_extent_has_no_data() {
        let config = WavePreset::Calm
            .to_config(0.0)
            .with_extent(Rect::new(-10.0, -10.0, 10.0, 10.0));
        let water = GerstnerWater::new(config);

        assert!(water.sample_height(Vec3::new(5.0, 0.0, 5.0), 1.0).is_some());
        assert!(water.sample_height(Vec3::new(50.0, 0.0, 5.0), 1.0).is_none());
        assert!(water.sample_flow(Vec3::new(5.0, 0.0, -50.0), 1.0).is_none());
    }

    #[test]
    fn test_depth_at() {
        let water = GerstnerWater::new(WavePreset::Still.to_config(2.0));
        assert_eq!(water.depth_at(Vec3::new(0.0, 1.5, 0.0)), 0.5);
        assert_eq!(water.depth_at(Vec3::new(0.0, 3.0, 0.0)), -1.0);
    }

    #[test]
    fn test_set_config_keeps_clock() {
        let mut water = GerstnerWater::new(WavePreset::Calm.to_config(0.0));
        water.set_time(4.0);
        water.set_config(WavePreset::Storm.to_config(0.0));
        assert_eq!(water.time(), 4.0);
        assert_eq!(water.config().waves.len(), 4);
    }
}
