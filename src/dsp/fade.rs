//! Linear volume fade measured in frames.

/// Convert a duration in milliseconds to a whole number of frames.
pub fn ms_to_frames(duration_ms: u32, sample_rate: f64) -> usize {
    if sample_rate <= 0.0 || !sample_rate.is_finite() {
        return 0;
    }
    (duration_ms as f64 * sample_rate / 1000.0).round() as usize
}

/// A running linear ramp from `start` to `target`.
///
/// The ramp is evaluated from the frame counter rather than accumulated,
/// so the last frame lands exactly on `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fade {
    start: f64,
    target: f64,
    total_frames: usize,
    elapsed: usize,
}

impl Fade {
    pub fn new(start: f64, target: f64, total_frames: usize) -> Self {
        Fade {
            start,
            target,
            total_frames,
            elapsed: 0,
        }
    }

    /// Advance by `frames` and return the level afterwards.
    pub fn step(&mut self, frames: usize) -> f64 {
        self.elapsed = self.elapsed.saturating_add(frames).min(self.total_frames);
        self.level()
    }

    /// Level at the current position of the ramp.
    pub fn level(&self) -> f64 {
        if self.elapsed >= self.total_frames {
            return self.target;
        }
        let t = self.elapsed as f64 / self.total_frames as f64;
        self.start + (self.target - self.start) * t
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.total_frames
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// True when the ramp moves toward a louder level.
    pub fn is_rising(&self) -> bool {
        self.target > self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ms_to_frames_rounds() {
        assert_eq!(ms_to_frames(100, 44100.0), 4410);
        assert_eq!(ms_to_frames(20, 48000.0), 960);
        assert_eq!(ms_to_frames(0, 48000.0), 0);
        assert_eq!(ms_to_frames(10, 0.0), 0);
    }

    #[test]
    fn ramp_lands_exactly_on_target() {
        let mut fade = Fade::new(0.0, 0.7, 3);
        fade.step(1);
        fade.step(1);
        let last = fade.step(1);
        assert_eq!(last, 0.7);
        assert!(fade.is_complete());
    }

    #[test]
    fn ramp_is_monotonic() {
        let mut fade = Fade::new(0.0, 1.0, 441);
        let mut prev = fade.level();
        while !fade.is_complete() {
            let v = fade.step(1);
            assert!(v >= prev, "fade-in went backwards: {prev} -> {v}");
            prev = v;
        }
    }

    #[test]
    fn fade_out_never_negative() {
        let mut fade = Fade::new(0.45, 0.0, 100);
        for _ in 0..150 {
            let v = fade.step(1);
            assert!(v >= 0.0, "fade-out went negative: {v}");
        }
        assert_eq!(fade.level(), 0.0);
    }

    #[test]
    fn overlong_step_clamps_to_end() {
        let mut fade = Fade::new(1.0, 0.25, 10);
        assert_eq!(fade.step(1000), 0.25);
        assert!(fade.is_complete());
    }
}
