//! Frame timing for the viewer.
//!
//! The simulation advances exactly one step per frame and never looks at wall
//! time; [`FrameClock`] only counts frames and measures throughput so the
//! viewer can report it.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! loop {
//!     field.frame(&mut canvas);
//!     if clock.tick() {
//!         window.set_title(&format!("pixeldust - {:.0} fps", clock.fps()));
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

/// Frame counter with a periodically refreshed FPS estimate.
#[derive(Debug)]
pub struct FrameClock {
    frame_count: u64,
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a clock starting from now, refreshing FPS twice a second.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Create a clock refreshing its FPS estimate every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: interval,
        }
    }

    /// Record one frame. Returns `true` when the FPS estimate was refreshed.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        self.frame_count += 1;

        let since = now.duration_since(self.fps_update_time);
        if since < self.fps_update_interval {
            return false;
        }
        let frames = self.frame_count - self.fps_frame_count;
        self.fps = frames as f32 / since.as_secs_f32();
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
        true
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Latest frames-per-second estimate, 0 until the first refresh.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut clock = FrameClock::with_interval(Duration::from_secs(3600));
        for _ in 0..5 {
            assert!(!clock.tick());
        }
        assert_eq!(clock.frame(), 5);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_fps_refresh() {
        let mut clock = FrameClock::with_interval(Duration::from_millis(10));
        clock.tick();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.tick());
        assert!(clock.fps() > 0.0);
    }
}
