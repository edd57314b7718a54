use std::time::{Duration, Instant};

/// Fixed-rate frame deadlines.
///
/// Deadlines advance by whole intervals from the previous one, so a late
/// frame does not shift every later frame. After a stall longer than one
/// interval the schedule restarts from `now` instead of bursting.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    next_frame: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        let interval = (fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(fps)));
        Self {
            interval,
            next_frame: Instant::now(),
        }
    }

    /// Never waits. Used by headless runs and tests.
    pub fn unpaced() -> Self {
        Self {
            interval: None,
            next_frame: Instant::now(),
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Schedules the deadline after the frame that just ran at `now`.
    pub fn advance(&mut self, now: Instant) {
        let Some(interval) = self.interval else {
            self.next_frame = now;
            return;
        };

        self.next_frame += interval;
        if self.next_frame + interval < now {
            self.next_frame = now + interval;
        }
    }

    /// Blocks until the next deadline, then schedules the one after it.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next_frame.checked_duration_since(now) {
            std::thread::sleep(remaining);
        }
        self.advance(Instant::now());
    }
}

/// Measures frames per second over one-second windows.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    frames: u32,
    elapsed: Duration,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            window: Duration::from_secs(1),
            frames: 0,
            elapsed: Duration::ZERO,
            fps: 0.0,
        }
    }

    /// Records one frame of length `delta`. Returns the new rate whenever a
    /// window closes.
    pub fn tick(&mut self, delta: Duration) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed < self.window {
            return None;
        }

        self.fps = self.frames as f32 / self.elapsed.as_secs_f32();
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Delta time between ticks.
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick);
        self.last_tick = now;
        delta
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_interval_matches_rate() {
        let pacer = FramePacer::new(60);
        let interval = pacer.interval().unwrap();
        assert!((interval.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
        assert!(FramePacer::new(0).interval().is_none());
    }

    #[test]
    fn pacer_advances_by_whole_intervals() {
        let mut pacer = FramePacer::new(10);
        let start = pacer.next_frame();

        pacer.advance(start);
        assert_eq!(pacer.next_frame(), start + Duration::from_millis(100));
        assert!(!pacer.is_due(start));
        assert!(pacer.is_due(start + Duration::from_millis(100)));
    }

    #[test]
    fn pacer_resynchronises_after_stall() {
        let mut pacer = FramePacer::new(10);
        let start = pacer.next_frame();
        let late = start + Duration::from_secs(5);

        pacer.advance(late);
        assert_eq!(pacer.next_frame(), late + Duration::from_millis(100));
    }

    #[test]
    fn unpaced_is_always_due() {
        let mut pacer = FramePacer::unpaced();
        let now = Instant::now();
        pacer.advance(now);
        assert!(pacer.is_due(now));
    }

    #[test]
    fn fps_counter_reports_once_per_window() {
        let mut counter = FpsCounter::new();
        for _ in 0..59 {
            assert!(counter.tick(Duration::from_millis(16)).is_none());
        }
        let fps = counter.tick(Duration::from_millis(100)).unwrap();
        assert!((fps - 60.0 / 1.044).abs() < 0.01);
        assert_eq!(counter.fps(), fps);
    }
}
