use std::time::{Duration, Instant};

/// End-of-tick pacing: after a frame is presented, the next one is not due until
/// `1 / target_fps` later.
///
/// Pacing is a simple deadline, not a scheduler: missed deadlines are not
/// caught up, the next frame is simply due immediately.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    next_due: Option<Instant>,
}

impl FramePacer {
    /// `None` (or zero) renders continuously.
    pub fn new(target_fps: Option<u32>) -> Self {
        let interval = target_fps
            .filter(|fps| *fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / fps as f64));
        Self {
            interval,
            next_due: None,
        }
    }

    /// Instant the next frame becomes due, if pacing is active and a frame has
    /// been presented.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.is_none_or(|due| now >= due)
    }

    /// Records a presented frame at `now`.
    pub fn frame_presented(&mut self, now: Instant) {
        self.next_due = self.interval.map(|iv| now + iv);
    }
}
