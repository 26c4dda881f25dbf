//! Scripted paddler.
//!
//! Produces hull-local hand targets for an alternating forward stroke. Over
//! one cycle the torso swings the shaft around the vertical axis twice, once
//! per side. On each half the working side's hand drops, dipping that blade
//! while it sweeps back, and the shaft returns level at the catch and exit.

use std::f32::consts::PI;

use bevy::prelude::*;
use paddle::{paddle_orientation, BladeFrame, HandPair, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scenario::StrokeParams;

/// Side whose blade is working and how far through its half-cycle it is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokePhase {
    pub side: Side,
    /// `0.0` at the catch, `1.0` at the exit
    pub progress: f32,
}

impl StrokePhase {
    pub fn at(cadence: f32, seconds: f32) -> Self {
        let cycle = (seconds * cadence).rem_euclid(1.0) * 2.0;
        if cycle < 1.0 {
            Self {
                side: Side::Left,
                progress: cycle,
            }
        } else {
            Self {
                side: Side::Right,
                progress: cycle - 1.0,
            }
        }
    }
}

/// Hull-local hand positions for the stroke at `phase`, without noise.
pub fn stroke_hands(params: &StrokeParams, phase: StrokePhase) -> HandPair {
    let half_span = params.grip_span * 0.5;
    let swing = (PI * phase.progress).cos();
    let dip = params.tilt * (PI * phase.progress).sin();

    // Shaft yaw: the working hand starts forward and ends back.
    let (angle, left_drop) = match phase.side {
        Side::Left => (-params.sweep_angle * swing, dip),
        Side::Right => (params.sweep_angle * swing, -dip),
    };

    let (sin, cos) = angle.sin_cos();
    let left = Vec3::new(
        -half_span * cos,
        params.grip_height - left_drop,
        half_span * sin,
    );
    let right = Vec3::new(
        half_span * cos,
        params.grip_height + left_drop,
        -half_span * sin,
    );
    HandPair::new(left, right)
}

/// Shaft level and square across the hull.
pub fn rest_hands(params: &StrokeParams) -> HandPair {
    let half_span = params.grip_span * 0.5;
    HandPair::new(
        Vec3::new(-half_span, params.grip_height, 0.0),
        Vec3::new(half_span, params.grip_height, 0.0),
    )
}

/// Blade tips and face normals for a paddle held at `hands`.
///
/// Each tip sits `reach` past its hand along the shaft. Face normals are the
/// paddle's up axis. Nothing is returned for a degenerate shaft.
pub fn blade_frames(hands: HandPair, reach: f32) -> [Option<BladeFrame>; 2] {
    let Some(orientation) = paddle_orientation(hands.left, hands.right) else {
        return [None, None];
    };
    let along = (hands.right - hands.left).normalize();
    let face_normal = orientation * Vec3::Y;

    [
        Some(BladeFrame {
            tip: hands.left - along * reach,
            face_normal,
        }),
        Some(BladeFrame {
            tip: hands.right + along * reach,
            face_normal,
        }),
    ]
}

/// Hand tracker driven by the stroke script.
#[derive(Resource)]
pub struct StrokeScript {
    pub params: StrokeParams,
    rng: StdRng,
}

impl StrokeScript {
    pub fn new(params: StrokeParams, seed: u64) -> Self {
        Self {
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn is_paddling(&self, seconds: f32) -> bool {
        self.params.stop_after.is_none_or(|stop| seconds < stop)
    }

    /// Hull-local hand targets at `seconds`, with tracking noise.
    pub fn sample(&mut self, seconds: f32) -> HandPair {
        let mut hands = if self.is_paddling(seconds) {
            stroke_hands(&self.params, StrokePhase::at(self.params.cadence, seconds))
        } else {
            rest_hands(&self.params)
        };

        if self.params.jitter > 0.0 {
            let jitter = self.params.jitter;
            for hand in [&mut hands.left, &mut hands.right] {
                *hand += Vec3::new(
                    self.rng.gen_range(-jitter..=jitter),
                    self.rng.gen_range(-jitter..=jitter),
                    self.rng.gen_range(-jitter..=jitter),
                );
            }
        }
        hands
    }
}
