use crate::replay::{Phase, PHASE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockPosition {
    pub turn: usize,
    pub phase: Phase,
    pub progress: f32,
    pub finished: bool,
}

/// Derives (turn, phase, progress) from simulated time `t` measured in turns.
///
/// `t` at or past `end` is the finished position: the last phase of the last
/// turn at full progress.
pub fn position_at(t: f64, end: f64) -> ClockPosition {
    if t >= end {
        return ClockPosition {
            turn: (end.max(1.0) - 1.0) as usize,
            phase: Phase::Remove,
            progress: 1.0,
            finished: true,
        };
    }

    let t = t.max(0.0);
    let turn = t.floor();
    let quarters = (t - turn) * PHASE_COUNT as f64;
    let phase_index = (quarters.floor() as usize).min(PHASE_COUNT - 1);
    let progress = (quarters - phase_index as f64).clamp(0.0, 1.0) as f32;

    ClockPosition {
        turn: turn as usize,
        phase: Phase::from_index(phase_index).unwrap_or(Phase::Remove),
        progress,
        finished: false,
    }
}

/// Simulated-time accumulator. Time only moves forward.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    elapsed: f64,
    end: f64,
    speed: f64,
    paused: bool,
}

impl PhaseClock {
    /// A clock over `turn_count` turns, each of which plays all four phases.
    pub fn new(turn_count: usize, speed: f64) -> Self {
        let mut clock = Self {
            elapsed: 0.0,
            end: turn_count as f64,
            speed: 1.0,
            paused: false,
        };
        clock.set_speed(speed);
        clock
    }

    /// Adds `dt` seconds scaled by the speed. Negative or non-finite `dt` is
    /// ignored.
    pub fn advance(&mut self, dt: f64) -> ClockPosition {
        if !self.paused && dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt * self.speed).min(self.end);
        }
        self.position()
    }

    pub fn position(&self) -> ClockPosition {
        position_at(self.elapsed, self.end)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.end
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Turns per second. Non-finite or negative values are ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed >= 0.0 {
            self.speed = speed;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}
