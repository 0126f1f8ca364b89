#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Frame clock for [`Stage::tick`](crate::stage::Stage::tick).
///
/// Playback time never comes from here; scroll position alone drives the
/// clips. The timer only feeds frame statistics.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last_tick: Option<Instant>,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_tick: None,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advances one frame and returns its length in seconds. The first frame
    /// has zero length.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = self.last_tick.map_or(Duration::ZERO, |last| now - last);
        self.elapsed += self.delta;
        self.last_tick = Some(now);
        self.frame_count += 1;
        self.delta.as_secs_f32()
    }

    #[must_use]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Sum of all frame lengths so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// What one [`Stage::tick`](crate::stage::Stage::tick) did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub frame: u64,
    pub dt: f32,
    /// Scroll progress currently applied.
    pub progress: f32,
    /// Absolute time on the shared timeline.
    pub shared_time: f32,
    /// Whether animation values were written this frame.
    pub animated: bool,
}
