//! Output bus — sums the twelve channels with master gain.

use super::registry::ChannelRegistry;

/// A summing bus that pulls one frame from every channel.
#[derive(Debug, Clone)]
pub struct OutputBus {
    pub master_gain: f64,
}

impl OutputBus {
    pub fn new(master_gain: f64) -> Self {
        OutputBus { master_gain }
    }

    /// Render one mixed frame, advancing every channel by one frame.
    pub fn next_frame(&self, registry: &mut ChannelRegistry) -> f64 {
        let sum: f64 = registry.iter_mut().map(|c| c.next_sample()).sum();
        soft_clip(sum * self.master_gain)
    }

    /// Render `frames` mono frames.
    pub fn render(&self, registry: &mut ChannelRegistry, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|_| self.next_frame(registry) as f32)
            .collect()
    }

    /// Fill an interleaved buffer, writing the same mono frame to every
    /// output channel.
    pub fn render_into(&self, registry: &mut ChannelRegistry, out: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for frame in out.chunks_mut(channels) {
            let value = self.next_frame(registry) as f32;
            frame.fill(value);
        }
    }
}

impl Default for OutputBus {
    fn default() -> Self {
        OutputBus::new(1.0)
    }
}

/// Level below which the output passes through untouched.
const CLIP_KNEE: f64 = 0.8;

/// Linear up to [`CLIP_KNEE`], then a tanh shoulder that approaches but
/// never reaches full scale. Continuous in value and slope at the knee.
fn soft_clip(x: f64) -> f64 {
    let magnitude = x.abs();
    if magnitude <= CLIP_KNEE {
        return x;
    }
    let headroom = 1.0 - CLIP_KNEE;
    let over = (magnitude - CLIP_KNEE) / headroom;
    x.signum() * (CLIP_KNEE + headroom * over.tanh())
}
