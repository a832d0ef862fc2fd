//! Performance monitor tuning.
//!
//! The monitor samples instantaneous FPS every frame, averages per sampling
//! interval, and evaluates a rolling list of interval averages against a
//! bounds function. These values set the default cadence of that loop.

/// Base sampling interval in seconds. One interval produces one average.
pub const BASE_SAMPLE_INTERVAL: f32 = 0.35;

/// Interval averages collected before the monitor evaluates.
pub const EVALUATION_ITERATIONS: usize = 6;

/// Minimum seconds between two quality factor adjustments.
pub const ADJUSTMENT_COOLDOWN: f32 = 0.5;

/// Base step applied to the quality factor, scaled by how far the measured
/// average sits outside the bounds.
pub const ADJUSTMENT_STEP: f32 = 0.1;

/// Adjustments tolerated before the monitor signals a permanent fallback.
pub const FLIP_FLOP_LIMIT: u32 = 12;

/// Interval growth applied while performance is comfortably above the upper
/// bound, and the cap relative to the base interval.
pub const INTERVAL_GROWTH: f32 = 1.5;
pub const INTERVAL_MAX_SCALE: f32 = 4.0;
pub const INTERVAL_MIN_SCALE: f32 = 0.5;

/// Default frame-rate bounds. Below the lower bound quality declines, above
/// the upper bound it recovers. Tuned for a 60 Hz refresh target.
pub const LOWER_FPS_BOUND: f32 = 50.0;
pub const UPPER_FPS_BOUND: f32 = 58.0;
