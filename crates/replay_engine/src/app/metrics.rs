use std::time::{Duration, Instant};

/// Averages over one logging window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub worst_frame_ms: f32,
    /// Simulated turns played per wall-clock second.
    pub turns_per_second: f32,
}

#[derive(Debug, Default, Clone, Copy)]
struct WindowTotals {
    frames: u32,
    frame_time: Duration,
    worst_frame: Duration,
    turns: f64,
}

/// Collects frame timings and emits a snapshot once per `window`.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    window: Duration,
    window_started: Instant,
    totals: WindowTotals,
}

impl MetricsAccumulator {
    pub(crate) fn new(window: Duration) -> Self {
        Self::starting_at(Instant::now(), window)
    }

    pub(crate) fn starting_at(start: Instant, window: Duration) -> Self {
        Self {
            window,
            window_started: start,
            totals: WindowTotals::default(),
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        let totals = &mut self.totals;
        totals.frames = totals.frames.saturating_add(1);
        totals.frame_time = totals.frame_time.saturating_add(frame_dt);
        totals.worst_frame = totals.worst_frame.max(frame_dt);
    }

    pub(crate) fn record_simulated(&mut self, turns: f64) {
        if turns.is_finite() && turns > 0.0 {
            self.totals.turns += turns;
        }
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let window_len = now.saturating_duration_since(self.window_started);
        if window_len < self.window {
            return None;
        }

        let totals = std::mem::take(&mut self.totals);
        self.window_started = now;

        let seconds = window_len.as_secs_f32().max(f32::EPSILON);
        let mean_frame_ms = match totals.frames {
            0 => 0.0,
            frames => totals.frame_time.as_secs_f32() * 1000.0 / frames as f32,
        };
        Some(LoopMetricsSnapshot {
            fps: totals.frames as f32 / seconds,
            frame_time_ms: mean_frame_ms,
            worst_frame_ms: totals.worst_frame.as_secs_f32() * 1000.0,
            turns_per_second: totals.turns as f32 / seconds,
        })
    }
}
