use std::time::Duration;

pub(crate) const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Wall-clock pacing for the render loop: long frames are clamped before they
/// reach playback, and presents are spaced out to honour an optional FPS cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FramePacer {
    max_frame_delta: Duration,
    fps_cap: Option<u32>,
    frame_budget: Option<Duration>,
}

impl FramePacer {
    /// A zero `max_frame_delta` falls back to the default; an FPS cap of zero
    /// disables capping.
    pub(crate) fn new(max_frame_delta: Duration, fps_cap: Option<u32>) -> Self {
        let max_frame_delta = non_zero_or(max_frame_delta, DEFAULT_MAX_FRAME_DELTA);
        let fps_cap = fps_cap.filter(|fps| *fps > 0);
        Self {
            max_frame_delta,
            fps_cap,
            frame_budget: fps_cap.map(|fps| Duration::from_secs(1) / fps),
        }
    }

    pub(crate) fn max_frame_delta(&self) -> Duration {
        self.max_frame_delta
    }

    pub(crate) fn frame_budget(&self) -> Option<Duration> {
        self.frame_budget
    }

    pub(crate) fn clamp(&self, frame_dt: Duration) -> Duration {
        frame_dt.min(self.max_frame_delta)
    }

    /// How long to sleep before presenting, given the time since the last present.
    pub(crate) fn idle_before_present(&self, since_present: Duration) -> Duration {
        self.frame_budget()
            .and_then(|budget| budget.checked_sub(since_present))
            .unwrap_or(Duration::ZERO)
    }

    pub(crate) fn cap_label(&self) -> String {
        self.fps_cap
            .map_or_else(|| "off".to_string(), |fps| fps.to_string())
    }
}

pub(crate) fn non_zero_or(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_frames_are_clamped() {
        let pacer = FramePacer::new(Duration::from_millis(100), None);
        assert_eq!(pacer.clamp(Duration::from_secs(3)), Duration::from_millis(100));
        assert_eq!(pacer.clamp(Duration::from_millis(16)), Duration::from_millis(16));
    }

    #[test]
    fn zero_max_delta_uses_default() {
        let pacer = FramePacer::new(Duration::ZERO, Some(60));
        assert_eq!(pacer.max_frame_delta(), DEFAULT_MAX_FRAME_DELTA);
    }

    #[test]
    fn sixty_fps_budget_is_one_sixtieth() {
        let budget = FramePacer::new(DEFAULT_MAX_FRAME_DELTA, Some(60))
            .frame_budget()
            .expect("budget");
        assert!((budget.as_secs_f64() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn zero_cap_disables_pacing() {
        let pacer = FramePacer::new(DEFAULT_MAX_FRAME_DELTA, Some(0));
        assert_eq!(pacer.frame_budget(), None);
        assert_eq!(pacer.idle_before_present(Duration::ZERO), Duration::ZERO);
        assert_eq!(pacer.cap_label(), "off");
    }

    #[test]
    fn idle_time_is_what_remains_of_the_budget() {
        let pacer = FramePacer::new(DEFAULT_MAX_FRAME_DELTA, Some(50));
        assert_eq!(
            pacer.idle_before_present(Duration::from_millis(5)),
            Duration::from_millis(15)
        );
        assert_eq!(
            pacer.idle_before_present(Duration::from_millis(40)),
            Duration::ZERO
        );
        assert_eq!(pacer.cap_label(), "50");
    }

    #[test]
    fn non_zero_or_keeps_positive_values() {
        let fallback = Duration::from_secs(1);
        assert_eq!(non_zero_or(Duration::ZERO, fallback), fallback);
        assert_eq!(
            non_zero_or(Duration::from_millis(5), fallback),
            Duration::from_millis(5)
        );
    }
}
