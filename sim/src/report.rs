use std::fmt;

use bevy::prelude::*;
use paddle::PaddleEvent;

use crate::hull::HullBody;

/// Running tallies over the paddle's event stream.
#[derive(Resource, Debug, Default, Clone)]
pub struct SimStats {
    pub peak_force: f32,
    pub top_speed: f32,
    /// Water entries per side
    pub strokes: [u32; 2],
    pub rollbacks: u32,
    pub sweep_stops: u32,
    pub refused_targets: u32,
    pub inactive_frames: u32,
    submerged: [bool; 2],
}

impl SimStats {
    pub fn record(&mut self, event: &PaddleEvent) {
        match *event {
            PaddleEvent::Force { force, .. } => {
                self.peak_force = self.peak_force.max(force.length());
            }
            PaddleEvent::Submersion {
                side, submerged, ..
            } => {
                let was = std::mem::replace(&mut self.submerged[side.index()], submerged);
                if submerged && !was {
                    self.strokes[side.index()] += 1;
                }
            }
            PaddleEvent::ShaftBlocked { .. } => self.rollbacks += 1,
            PaddleEvent::SweepBlocked { .. } => self.sweep_stops += 1,
            PaddleEvent::TargetRefused { .. } => self.refused_targets += 1,
            PaddleEvent::Inactive { .. } => self.inactive_frames += 1,
            PaddleEvent::Disturbance { .. } => {}
        }
    }

    pub fn total_strokes(&self) -> u32 {
        self.strokes.iter().sum()
    }
}

pub fn record_events(
    mut events: EventReader<PaddleEvent>,
    mut stats: ResMut<SimStats>,
    hull: Res<HullBody>,
) {
    for event in events.read() {
        stats.record(event);
    }
    stats.top_speed = stats.top_speed.max(hull.velocity.length());
}

/// End-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    pub name: String,
    pub elapsed: f32,
    pub distance: f32,
    /// Displacement along the starting heading
    pub forward_progress: f32,
    pub heading_degrees: f32,
    pub top_speed: f32,
    pub peak_force: f32,
    pub strokes: [u32; 2],
    pub rollbacks: u32,
    pub sweep_stops: u32,
    pub refused_targets: u32,
    pub inactive_frames: u32,
    pub ripple_energy: f32,
    pub active_at_end: bool,
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scenario '{}' after {:.1}s", self.name, self.elapsed)?;
        writeln!(
            f,
            "  travelled {:.2}m ({:.2}m forward), heading {:+.1}°, top speed {:.2}m/s",
            self.distance, self.forward_progress, self.heading_degrees, self.top_speed
        )?;
        writeln!(
            f,
            "  strokes L/R {}/{}, peak force {:.1}N",
            self.strokes[0], self.strokes[1], self.peak_force
        )?;
        writeln!(
            f,
            "  shaft rollbacks {}, sweep stops {}, refused targets {}, inactive frames {}",
            self.rollbacks, self.sweep_stops, self.refused_targets, self.inactive_frames
        )?;
        write!(f, "  ripple energy {:.2}", self.ripple_energy)
    }
}
