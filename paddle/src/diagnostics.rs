//! Observational output of the paddle controller.
//!
//! The controller reports what it did as [`PaddleEvent`]s; nothing it emits
//! here feeds back into the simulation. A presentation layer may draw them,
//! log them, or hand the disturbances to a [`RippleField`](crate::ripple::RippleField).

use bevy::prelude::*;

/// Which end of the paddle / which hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum PaddleEvent {
    /// A hand's sweep hit blocking geometry and was stopped at `position`.
    SweepBlocked {
        side: Side,
        from: Vec3,
        contact: Vec3,
        position: Vec3,
    },
    /// A hand's target overlapped blocking geometry; the hand stayed at `from`.
    TargetRefused { side: Side, from: Vec3, target: Vec3 },
    /// The shaft passed through blocking geometry at `point`; both hands rolled back.
    ShaftBlocked { point: Vec3 },
    /// The hands were outside the activation band this tick.
    Inactive { hand_distance: f32 },
    /// Submersion state of a blade after a physics tick.
    Submersion {
        side: Side,
        tip: Vec3,
        water_height: f32,
        submerged: bool,
    },
    /// A blade force was applied at `point`.
    Force {
        side: Side,
        force: Vec3,
        point: Vec3,
    },
    /// Water surface disturbance for the ripple accumulator.
    Disturbance {
        position: Vec3,
        radius: f32,
        intensity: f32,
    },
}

/// Receiver for [`PaddleEvent`]s.
pub trait PaddleDiagnostics {
    fn record(&mut self, event: PaddleEvent);
}

/// Discards everything.
impl PaddleDiagnostics for () {
    fn record(&mut self, _event: PaddleEvent) {}
}

impl PaddleDiagnostics for Vec<PaddleEvent> {
    fn record(&mut self, event: PaddleEvent) {
        self.push(event);
    }
}

impl PaddleDiagnostics for EventWriter<'_, PaddleEvent> {
    fn record(&mut self, event: PaddleEvent) {
        self.write(event);
    }
}

impl<T: PaddleDiagnostics + ?Sized> PaddleDiagnostics for &mut T {
    fn record(&mut self, event: PaddleEvent) {
        (**self).record(event);
    }
}
