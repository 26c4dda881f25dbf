//! Per-paddle state and the two tick entry points.
//!
//! [`PaddleController::pose_tick`] runs at display rate and commits the
//! constrained hands and activation. [`PaddleController::physics_tick`] runs
//! at the fixed physics rate and always sees the last committed state.

use bevy::prelude::*;

use crate::blade::{process_blade, BladeFrame, BladeOutcome, BladeState, CraftBody};
use crate::collision::CollisionQuery;
use crate::config::PaddleConfig;
use crate::diagnostics::{PaddleDiagnostics, Side};
use crate::pose::{integrate_pose, HandPair, PaddlePose};
use crate::water::WaterOracle;

#[derive(Component, Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PaddleController {
    /// Hands committed by the last pose tick; `None` until the first one.
    constrained: Option<HandPair>,
    blades: [BladeState; 2],
    active: bool,
    hand_distance: f32,
}

impl PaddleController {
    pub fn hands(&self) -> Option<HandPair> {
        self.constrained
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hand_distance(&self) -> f32 {
        self.hand_distance
    }

    pub fn blade(&self, side: Side) -> &BladeState {
        &self.blades[side.index()]
    }

    pub fn is_submerged(&self, side: Side) -> bool {
        self.blades[side.index()].submerged
    }

    /// Constrain the hand targets and commit the result.
    ///
    /// Without targets the tick does nothing. The first tick with targets
    /// seeds the constrained pair from them.
    pub fn pose_tick(
        &mut self,
        config: &PaddleConfig,
        targets: Option<HandPair>,
        collision: &impl CollisionQuery,
        diagnostics: &mut impl PaddleDiagnostics,
    ) -> Option<PaddlePose> {
        let targets = targets?;
        let previous = self.constrained.unwrap_or(targets);

        let pose = integrate_pose(config, collision, previous, targets, diagnostics);

        self.constrained = Some(pose.hands);
        self.active = pose.active;
        self.hand_distance = pose.hand_distance;
        Some(pose)
    }

    /// Run the blade force model for both blades.
    ///
    /// Tip history is kept current even while inactive, so the first active
    /// tick does not see a velocity spike from a stale tip.
    pub fn physics_tick(
        &mut self,
        config: &PaddleConfig,
        blades: [Option<BladeFrame>; 2],
        dt: f32,
        collision: &impl CollisionQuery,
        water: &impl WaterOracle,
        body: &mut impl CraftBody,
        diagnostics: &mut impl PaddleDiagnostics,
    ) -> [Option<BladeOutcome>; 2] {
        let mut outcomes = [None; 2];
        if dt <= 0.0 {
            return outcomes;
        }

        if !self.active {
            // History is not frozen while inactive: `last_tip` always holds the
            // previous fixed tick's tip.
            for (state, frame) in self.blades.iter_mut().zip(blades) {
                if let Some(frame) = frame {
                    state.track(frame.tip, dt);
                }
                state.submerged = false;
            }
            return outcomes;
        }

        for side in Side::BOTH {
            let Some(frame) = blades[side.index()] else {
                continue;
            };
            outcomes[side.index()] = Some(process_blade(
                side,
                config,
                &mut self.blades[side.index()],
                frame,
                self.hand_distance,
                dt,
                collision,
                water,
                body,
                diagnostics,
            ));
        }

        outcomes
    }
}
