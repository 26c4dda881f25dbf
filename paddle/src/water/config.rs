//! Wave configuration for the Gerstner water oracle.

use bevy::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Maximum number of waves supported.
pub const MAX_WAVES: usize = 4;

/// Configuration for a single Gerstner wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    /// Wave direction (normalized 2D vector, x/z)
    pub direction: Vec2,
    /// Wave steepness (0.0 = sine wave, 1.0 = sharp crest)
    pub steepness: f32,
    /// Wavelength in meters
    pub wavelength: f32,
    /// Phase speed in m/s
    pub speed: f32,
}

impl WaveParams {
    pub fn new(direction: Vec2, steepness: f32, wavelength: f32, speed: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            steepness: steepness.clamp(0.0, 1.0),
            wavelength: wavelength.max(0.1),
            speed,
        }
    }

    /// Calculate wave number (k = 2π / wavelength)
    #[inline(always)]
    pub fn wave_number(&self) -> f32 {
        2.0 * PI / self.wavelength
    }

    /// Calculate angular frequency (ω = k * speed)
    #[inline(always)]
    pub fn frequency(&self) -> f32 {
        self.wave_number() * self.speed
    }
}

impl Default for WaveParams {
    fn default() -> Self {
        Self::new(Vec2::X, 0.3, 4.0, 1.0)
    }
}

/// Complete water configuration: waves, still-water level, current and valid domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Active waves, at most [`MAX_WAVES`]
    pub waves: Vec<WaveParams>,
    /// Still-water level (Y coordinate)
    pub base_level: f32,
    /// Global amplitude multiplier
    pub amplitude_scale: f32,
    /// Uniform ambient current (x, z) in m/s
    pub current: Vec2,
    /// Region the water covers; `None` means unbounded
    pub extent: Option<Rect>,
}

impl WaveConfig {
    /// Create an unbounded, still configuration.
    pub fn new(base_level: f32) -> Self {
        Self {
            waves: Vec::new(),
            base_level,
            amplitude_scale: 1.0,
            current: Vec2::ZERO,
            extent: None,
        }
    }

    /// Add a wave to the configuration. Returns false if max waves reached.
    pub fn add_wave(&mut self, params: WaveParams) -> bool {
        if self.waves.len() < MAX_WAVES {
            self.waves.push(params);
            true
        } else {
            false
        }
    }

    pub fn with_current(mut self, current: Vec2) -> Self {
        self.current = current;
        self
    }

    pub fn with_extent(mut self, extent: Rect) -> Self {
        self.extent = Some(extent);
        self
    }
}

/// Preset wave configurations for different water types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WavePreset {
    /// Completely still water (no waves)
    Still,
    /// Flat-water paddling with a faint chop
    Calm,
    /// Lake with gentle waves
    #[default]
    Lake,
    /// Open coast swell
    Ocean,
    /// Large, steep waves
    Storm,
}

impl WavePreset {
    /// Create a WaveConfig from this preset.
    pub fn to_config(self, base_level: f32) -> WaveConfig {
        let mut config = WaveConfig::new(base_level);

        match self {
            WavePreset::Still => {}
            WavePreset::Calm => {
                config.amplitude_scale = 0.3;
                config.add_wave(WaveParams::new(Vec2::new(1.0, 0.2), 0.2, 6.0, 0.5));
            }
            WavePreset::Lake => {
                config.amplitude_scale = 0.5;
                config.add_wave(WaveParams::new(Vec2::new(1.0, 0.0), 0.3, 4.0, 0.8));
                config.add_wave(WaveParams::new(Vec2::new(0.3, 1.0), 0.2, 2.5, 1.0));
            }
            WavePreset::Ocean => {
                config.add_wave(WaveParams::new(Vec2::new(1.0, 0.3), 0.6, 8.0, 1.5));
                config.add_wave(WaveParams::new(Vec2::new(-0.7, 1.0), 0.5, 5.0, 1.8));
                config.add_wave(WaveParams::new(Vec2::new(0.5, -1.0), 0.4, 3.0, 2.2));
                config.add_wave(WaveParams::new(Vec2::new(-1.0, -0.5), 0.3, 1.5, 2.8));
            }
            WavePreset::Storm => {
                config.amplitude_scale = 2.0;
                config.add_wave(WaveParams::new(Vec2::new(1.0, 0.2), 0.8, 12.0, 2.0));
                config.add_wave(WaveParams::new(Vec2::new(-0.5, 1.0), 0.7, 8.0, 2.5));
                config.add_wave(WaveParams::new(Vec2::new(0.7, -0.7), 0.6, 5.0, 3.0));
                config.add_wave(WaveParams::new(Vec2::new(-1.0, -0.3), 0.5, 3.0, 3.5));
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_wave_counts() {
        assert_eq!(WavePreset::Still.to_config(0.0).waves.len(), 0);
        assert_eq!(WavePreset::Calm.to_config(0.0).waves.len(), 1);
        assert_eq!(WavePreset::Lake.to_config(0.0).waves.len(), 2);
        assert_eq!(WavePreset::Ocean.to_config(0.0).waves.len(), 4);
        assert_eq!(WavePreset::Storm.to_config(0.0).waves.len(), 4);
    }

    #[test]
    fn test_add_wave_is_capped() {
        let mut config = WavePreset::Storm.to_config(0.0);
        assert!(!config.add_wave(WaveParams::default()));
        assert_eq!(config.waves.len(), MAX_WAVES);
    }

    #[test]
    fn test_wave_params_are_sanitized() {
        let wave = WaveParams::new(Vec2::new(3.0, 4.0), 1.5, 0.0, 1.0);
        assert!((wave.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(wave.steepness, 1.0);
        assert_eq!(wave.wavelength, 0.1);
    }
}
