/// Hand motions shorter than this are treated as no motion (meters).
pub const MIN_CONSTRAIN_DISTANCE: f32 = 0.001;

/// Hand spans shorter than this leave the paddle orientation untouched (meters).
pub const MIN_ORIENT_SPAN: f32 = 0.01;

/// Half-width of the stroke dead band on the forward axis (m/s).
pub const STROKE_DEAD_BAND: f32 = 0.1;

/// Fraction of the stroke force applied as drag when a submerged blade moves forward.
pub const SUBMERGED_DRAG_FACTOR: f32 = 0.3;

/// Blade speed above which air drag applies during recovery (m/s).
pub const AIR_DRAG_MIN_SPEED: f32 = 0.2;

/// Amount `min_hand_distance` is pulled below `max_hand_distance` when the pair is invalid.
pub const HAND_DISTANCE_CORRECTION: f32 = 0.1;

/// Smallest usable shaft sample count (both endpoints).
pub const MIN_SHAFT_CHECK_POINTS: usize = 2;
