//! Frame timing owned by the render loop.

use std::time::{Duration, Instant};

/// Per-frame timing state
#[derive(Debug, Clone)]
pub struct FrameContext {
    start_time: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
}

impl FrameContext {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start_time: start,
            last_frame: start,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    pub fn begin_frame(&mut self) -> Duration {
        self.begin_frame_at(Instant::now())
    }

    pub fn begin_frame_at(&mut self, now: Instant) -> Duration {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
        self.delta
    }

    pub fn delta_time(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Seconds from start to the current frame.
    pub fn elapsed(&self) -> f32 {
        self.last_frame
            .saturating_duration_since(self.start_time)
            .as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        if self.delta.is_zero() {
            0.0
        } else {
            1.0 / self.delta.as_secs_f32()
        }
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Value fed to the time uniform: whole seconds, wrapped every `wrap`
/// seconds. A `wrap` of 0 leaves the count unwrapped.
pub fn shader_time(elapsed: f32, wrap: u32) -> f32 {
    let whole = elapsed.max(0.0) as u64;
    match wrap {
        0 => whole as f32,
        n => (whole % n as u64) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_progression() {
        let start = Instant::now();
        let mut frame = FrameContext::starting_at(start);
        assert_eq!(frame.frame_count(), 0);
        assert_eq!(frame.fps(), 0.0);

        let delta = frame.begin_frame_at(start + Duration::from_millis(250));
        assert_eq!(delta, Duration::from_millis(250));
        assert_eq!(frame.fps(), 4.0);

        frame.begin_frame_at(start + Duration::from_millis(750));
        assert_eq!(frame.frame_count(), 2);
        assert_eq!(frame.delta_time(), 0.5);
        assert_eq!(frame.elapsed(), 0.75);
    }

    #[test]
    fn test_clock_going_backwards() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut frame = FrameContext::starting_at(start);
        let delta = frame.begin_frame_at(start - Duration::from_millis(10));
        assert_eq!(delta, Duration::ZERO);
        assert_eq!(frame.elapsed(), 0.0);
    }

    #[test]
    fn test_shader_time_wraps() {
        assert_eq!(shader_time(0.4, 60), 0.0);
        assert_eq!(shader_time(59.9, 60), 59.0);
        assert_eq!(shader_time(60.0, 60), 0.0);
        assert_eq!(shader_time(125.5, 60), 5.0);
        assert_eq!(shader_time(125.5, 0), 125.0);
        assert_eq!(shader_time(-3.0, 60), 0.0);
    }
}
