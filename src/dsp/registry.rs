//! Channel registry — the fixed set of twelve pitch-class channels.

use super::channel::Channel;
use super::sampler::SampleBuffer;

/// Number of pitch classes in the chromatic scale.
pub const PITCH_CLASS_COUNT: usize = 12;

/// Pitch class names, indexed by channel.
pub const PITCH_CLASS_NAMES: [&str; PITCH_CLASS_COUNT] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name of the pitch class at `index`, if there is one.
pub fn pitch_class_name(index: usize) -> Option<&'static str> {
    PITCH_CLASS_NAMES.get(index).copied()
}

/// Owns exactly twelve channels; index `i` is pitch class `i` for the life
/// of the registry.
#[derive(Debug, Clone)]
pub struct ChannelRegistry {
    channels: [Channel; PITCH_CLASS_COUNT],
}

impl ChannelRegistry {
    /// Build the registry from one optional source per pitch class.
    /// Missing sources become disabled channels.
    pub fn from_sources(
        sources: [Option<SampleBuffer>; PITCH_CLASS_COUNT],
        sample_rate: f64,
        max_volume: f64,
        initial_volume: f64,
    ) -> Self {
        let mut index = 0;
        let channels = sources.map(|source| {
            let i = index;
            index += 1;
            match source {
                Some(buffer) => Channel::new(i, buffer, sample_rate, max_volume, initial_volume),
                None => {
                    log::warn!(
                        "channel {i} ({}) has no audio source; it stays silent",
                        PITCH_CLASS_NAMES[i]
                    );
                    Channel::disabled(i, sample_rate, max_volume)
                }
            }
        });
        ChannelRegistry { channels }
    }

    pub fn get(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Channel> {
        self.channels.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.iter_mut()
    }

    /// Number of channels with a playable source.
    pub fn enabled_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_enabled()).count()
    }

    /// Advance every channel by `frames` without rendering.
    pub fn advance(&mut self, frames: usize) {
        for channel in self.channels.iter_mut() {
            channel.advance(frames);
        }
    }
}
