pub mod monitor;
pub mod sampler;

use bevy::prelude::*;

use crate::engine::perf::monitor::{MonitorSignal, PerformanceMonitor};

/// Per-session performance state. One monitor per viewer instance; nothing
/// here is shared across sessions.
#[derive(Resource, Default)]
pub struct PerfState {
    monitor: PerformanceMonitor,
}

impl PerfState {
    /// Current quality factor in 0..=1.
    pub fn factor(&self) -> f32 {
        self.monitor.factor()
    }

    /// Current adaptive sampling interval in seconds.
    pub fn sample_interval(&self) -> f32 {
        self.monitor.sample_interval()
    }

    /// Adjustments applied so far.
    pub fn flip_count(&self) -> u32 {
        self.monitor.flip_count()
    }
}

/// Direction of a quality adjustment, mirrored from the monitor signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityEventKind {
    Decline,
    Incline,
    Change,
    Fallback,
}

/// Fired whenever the performance monitor adjusts the quality factor.
#[derive(Event)]
pub struct QualityEvent {
    pub kind: QualityEventKind,
    pub factor: f32,
}

/// Feeds the monitor one frame-rate sample per rendered frame and forwards
/// its signals as events.
pub fn sample_frame_rate(
    time: Res<Time>,
    mut perf: ResMut<PerfState>,
    mut events: EventWriter<QualityEvent>,
) {
    for signal in perf.monitor.record_frame(time.delta_secs()) {
        let (kind, factor) = match signal {
            MonitorSignal::Decline(f) => (QualityEventKind::Decline, f),
            MonitorSignal::Incline(f) => (QualityEventKind::Incline, f),
            MonitorSignal::Change(f) => (QualityEventKind::Change, f),
            MonitorSignal::Fallback => (QualityEventKind::Fallback, perf.factor()),
        };
        if kind == QualityEventKind::Fallback {
            warn!("performance monitor hit the flip-flop limit, requesting fallback");
        }
        events.write(QualityEvent { kind, factor });
    }
}
