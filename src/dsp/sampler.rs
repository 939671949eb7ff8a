//! Looped sample playback.
//!
//! Each pitch class plays one pre-rendered waveform on an endless loop.
//! The reader resamples from the buffer's native rate to the engine rate
//! with linear interpolation, wrapping across the loop seam.

/// A decoded mono sample buffer.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// Mono f64 samples.
    pub data: Vec<f64>,
    /// Native sample rate of the audio.
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(data: Vec<f64>, sample_rate: u32) -> Self {
        SampleBuffer { data, sample_rate }
    }

    /// Create from f32 samples.
    pub fn from_f32(samples: &[f32], sample_rate: u32) -> Self {
        let data = samples.iter().map(|&s| s as f64).collect();
        SampleBuffer { data, sample_rate }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read a sample at a fractional position, treating the buffer as a
    /// loop: the last sample interpolates toward the first.
    pub fn read_looped(&self, position: f64) -> f64 {
        let len = self.data.len();
        if len == 0 || !position.is_finite() {
            return 0.0;
        }

        let wrapped = position.rem_euclid(len as f64);
        let idx = (wrapped as usize).min(len - 1);
        let next = (idx + 1) % len;
        let frac = wrapped - idx as f64;
        self.data[idx] * (1.0 - frac) + self.data[next] * frac
    }
}

/// Playback cursor over a [`SampleBuffer`] that never finishes.
#[derive(Debug, Clone)]
pub struct LoopPlayer {
    buffer: SampleBuffer,
    /// Current read position in the buffer (fractional).
    position: f64,
    /// Buffer samples consumed per output frame.
    step: f64,
}

impl LoopPlayer {
    /// Start a loop at position 0, playing at `engine_sample_rate`.
    pub fn new(buffer: SampleBuffer, engine_sample_rate: f64) -> Self {
        let step = if engine_sample_rate > 0.0 {
            buffer.sample_rate as f64 / engine_sample_rate
        } else {
            1.0
        };
        LoopPlayer {
            buffer,
            position: 0.0,
            step,
        }
    }

    /// Produce the next frame and advance the cursor.
    pub fn next_sample(&mut self) -> f64 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let sample = self.buffer.read_looped(self.position);
        self.skip(1);
        sample
    }

    /// Move the cursor forward without reading, keeping the loop in phase
    /// while audio is not being rendered.
    pub fn skip(&mut self, frames: usize) {
        let len = self.buffer.len() as f64;
        if len == 0.0 {
            return;
        }
        self.position = (self.position + self.step * frames as f64).rem_euclid(len);
    }

    pub fn position(&self) -> f64 {
        self.position
    }
}
