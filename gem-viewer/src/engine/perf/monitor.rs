//! Closed-loop quality control from measured frame rate.
//!
//! The monitor runs entirely on the game thread: one `record_frame` call per
//! rendered frame, no timers of its own. It averages samples per sampling
//! interval, keeps a rolling list of interval averages, and once the list is
//! full compares the final average against a caller-supplied bounds function.
//! Out-of-bounds averages nudge the quality factor by a bounded step, rate
//! limited by a cooldown, and stretch or shrink the sampling interval as a
//! hysteresis against oscillation.

use crate::engine::perf::sampler::FrameSampler;

/// Bounds function: maps the measured final average onto a (lower, upper)
/// frame-rate band. Plain fn pointer so monitors stay `Copy`-free but
/// testable with arbitrary bands.
pub type BoundsFn = fn(f32) -> (f32, f32);

/// Default band, tuned for a 60 Hz refresh target.
pub fn default_bounds(_final_average: f32) -> (f32, f32) {
    (
        constants::monitor::LOWER_FPS_BOUND,
        constants::monitor::UPPER_FPS_BOUND,
    )
}

#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    pub base_interval: f32,
    pub iterations: usize,
    pub cooldown: f32,
    pub step: f32,
    pub flip_flop_limit: u32,
    pub bounds: BoundsFn,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_interval: constants::monitor::BASE_SAMPLE_INTERVAL,
            iterations: constants::monitor::EVALUATION_ITERATIONS,
            cooldown: constants::monitor::ADJUSTMENT_COOLDOWN,
            step: constants::monitor::ADJUSTMENT_STEP,
            flip_flop_limit: constants::monitor::FLIP_FLOP_LIMIT,
            bounds: default_bounds,
        }
    }
}

/// Outcome of one evaluation, in emission order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorSignal {
    Decline(f32),
    Incline(f32),
    Change(f32),
    Fallback,
}

pub struct PerformanceMonitor {
    config: MonitorConfig,
    sampler: FrameSampler,
    interval: f32,
    interval_elapsed: f32,
    averages: Vec<f32>,
    factor: f32,
    cooldown_remaining: f32,
    flips: u32,
    fallback_sent: bool,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl PerformanceMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            interval: config.base_interval,
            config,
            sampler: FrameSampler::default(),
            interval_elapsed: 0.0,
            averages: Vec::new(),
            factor: 1.0,
            cooldown_remaining: 0.0,
            flips: 0,
            fallback_sent: false,
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Overrides the factor, clamped into 0..=1.
    pub fn set_factor(&mut self, factor: f32) {
        self.factor = factor.clamp(0.0, 1.0);
    }

    pub fn sample_interval(&self) -> f32 {
        self.interval
    }

    pub fn flip_count(&self) -> u32 {
        self.flips
    }

    /// Records one rendered frame of `dt` seconds. Returns the signals
    /// produced by any evaluation this frame, usually none.
    pub fn record_frame(&mut self, dt: f32) -> Vec<MonitorSignal> {
        if dt <= 0.0 {
            return Vec::new();
        }

        self.sampler.push(1.0 / dt);
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        self.interval_elapsed += dt;

        if self.interval_elapsed < self.interval {
            return Vec::new();
        }
        self.interval_elapsed = 0.0;

        // An interval with zero samples cannot happen here (we pushed above),
        // but the mean stays guarded regardless.
        if let Some(mean) = self.sampler.mean() {
            self.averages.push(mean);
        }
        self.sampler.clear();

        if self.averages.len() < self.config.iterations {
            return Vec::new();
        }
        self.evaluate()
    }

    fn evaluate(&mut self) -> Vec<MonitorSignal> {
        let final_average = self.averages.iter().sum::<f32>() / self.averages.len() as f32;
        let (lower, upper) = (self.config.bounds)(final_average);
        let mut signals = Vec::new();

        self.adapt_interval(final_average, lower, upper);

        if self.cooldown_remaining <= 0.0 {
            if final_average < lower && lower > 0.0 {
                let delta = self.config.step * (lower - final_average) / lower;
                self.factor = (self.factor - delta).max(0.0);
                self.cooldown_remaining = self.config.cooldown;
                self.flips += 1;
                signals.push(MonitorSignal::Decline(self.factor));
                signals.push(MonitorSignal::Change(self.factor));
            } else if final_average > upper && upper > 0.0 {
                let delta = self.config.step * (final_average - upper) / upper;
                self.factor = (self.factor + delta).min(1.0);
                self.cooldown_remaining = self.config.cooldown;
                self.flips += 1;
                signals.push(MonitorSignal::Incline(self.factor));
                signals.push(MonitorSignal::Change(self.factor));
            }

            if !signals.is_empty() && self.flips >= self.config.flip_flop_limit && !self.fallback_sent
            {
                self.fallback_sent = true;
                signals.push(MonitorSignal::Fallback);
            }
        }

        self.averages.clear();
        signals
    }

    /// Hysteresis on the sampling cadence: sample less often while
    /// comfortably fast, react quicker while slow.
    fn adapt_interval(&mut self, final_average: f32, lower: f32, upper: f32) {
        let growth = constants::monitor::INTERVAL_GROWTH;
        let max = self.config.base_interval * constants::monitor::INTERVAL_MAX_SCALE;
        let min = self.config.base_interval * constants::monitor::INTERVAL_MIN_SCALE;
        if final_average > upper {
            self.interval = (self.interval * growth).min(max);
        } else if final_average < lower {
            self.interval = (self.interval / growth).max(min);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bounds(_avg: f32) -> (f32, f32) {
        (50.0, 60.0)
    }

    fn test_config() -> MonitorConfig {
        MonitorConfig {
            base_interval: 0.1,
            iterations: 2,
            cooldown: 0.0,
            step: 0.1,
            flip_flop_limit: 4,
            bounds: test_bounds,
        }
    }

    /// Runs `seconds` of synthetic frames at a fixed rate, collecting every
    /// signal the monitor emits.
    fn run_at(monitor: &mut PerformanceMonitor, fps: f32, seconds: f32) -> Vec<MonitorSignal> {
        let dt = 1.0 / fps;
        let frames = (seconds * fps) as usize;
        let mut signals = Vec::new();
        for _ in 0..frames {
            signals.extend(monitor.record_frame(dt));
        }
        signals
    }

    #[test]
    fn factor_stays_in_unit_interval() {
        let mut monitor = PerformanceMonitor::new(test_config());
        run_at(&mut monitor, 10.0, 60.0);
        assert_eq!(monitor.factor(), 0.0);
        run_at(&mut monitor, 240.0, 60.0);
        assert!(monitor.factor() <= 1.0);
        assert!(monitor.factor() >= 0.0);
    }

    #[test]
    fn sustained_slow_frames_decline_strictly() {
        let mut monitor = PerformanceMonitor::new(test_config());
        let mut last = monitor.factor();
        let signals = run_at(&mut monitor, 20.0, 10.0);
        let declines: Vec<f32> = signals
            .iter()
            .filter_map(|s| match s {
                MonitorSignal::Decline(f) => Some(*f),
                _ => None,
            })
            .collect();
        assert!(!declines.is_empty());
        for f in declines {
            assert!(f < last || (f == 0.0 && last == 0.0));
            last = f;
        }
    }

    #[test]
    fn sustained_fast_frames_incline_toward_one() {
        let mut monitor = PerformanceMonitor::new(test_config());
        monitor.set_factor(0.2);
        let signals = run_at(&mut monitor, 90.0, 10.0);
        let inclines: Vec<f32> = signals
            .iter()
            .filter_map(|s| match s {
                MonitorSignal::Incline(f) => Some(*f),
                _ => None,
            })
            .collect();
        assert!(!inclines.is_empty());
        let mut last = 0.2;
        for f in &inclines {
            assert!(*f > last || (*f == 1.0 && last == 1.0));
            last = *f;
        }
        assert!(monitor.factor() > 0.2);
    }

    #[test]
    fn fallback_fires_once_at_flip_limit() {
        let mut monitor = PerformanceMonitor::new(test_config());
        let signals = run_at(&mut monitor, 20.0, 30.0);
        let fallbacks = signals
            .iter()
            .filter(|s| matches!(s, MonitorSignal::Fallback))
            .count();
        assert_eq!(fallbacks, 1);
        assert!(monitor.flip_count() >= 4);
    }

    #[test]
    fn adjustment_amount_scales_with_shortfall() {
        // 20 fps against a lower bound of 50 declines by 0.1 * 30/50 = 0.06.
        let mut monitor = PerformanceMonitor::new(test_config());
        let signals = run_at(&mut monitor, 20.0, 1.0);
        let first = signals.iter().find_map(|s| match s {
            MonitorSignal::Decline(f) => Some(*f),
            _ => None,
        });
        let first = first.expect("one evaluation should have fired");
        assert!((first - 0.94).abs() < 1e-4);
    }

    #[test]
    fn cooldown_rate_limits_adjustments() {
        let mut config = test_config();
        config.cooldown = 10.0;
        let mut monitor = PerformanceMonitor::new(config);
        let signals = run_at(&mut monitor, 20.0, 5.0);
        let declines = signals
            .iter()
            .filter(|s| matches!(s, MonitorSignal::Decline(_)))
            .count();
        assert_eq!(declines, 1);
    }

    #[test]
    fn interval_stretches_when_fast_and_shrinks_when_slow() {
        let mut monitor = PerformanceMonitor::new(test_config());
        let base = monitor.sample_interval();
        run_at(&mut monitor, 120.0, 30.0);
        assert!(monitor.sample_interval() > base);
        assert!(monitor.sample_interval() <= base * 4.0 + 1e-6);

        let mut monitor = PerformanceMonitor::new(test_config());
        run_at(&mut monitor, 20.0, 30.0);
        assert!(monitor.sample_interval() < base);
        assert!(monitor.sample_interval() >= base * 0.5 - 1e-6);
    }

    #[test]
    fn in_band_frame_rate_leaves_factor_alone() {
        let mut monitor = PerformanceMonitor::new(test_config());
        let signals = run_at(&mut monitor, 55.0, 10.0);
        assert!(signals.is_empty());
        assert_eq!(monitor.factor(), 1.0);
    }
}
