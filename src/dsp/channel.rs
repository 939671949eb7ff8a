//! Channel — one pitch class: a looping source with its own volume, mute
//! gate, and at most one running fade.

use super::fade::{Fade, ms_to_frames};
use super::sampler::{LoopPlayer, SampleBuffer};

/// Observable phase of a channel, as seen by the fade policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    Silent,
    FadingIn,
    Audible,
    FadingOut,
}

/// A single always-playing pitch-class channel.
///
/// A channel whose asset failed to load is *disabled*: it renders silence
/// and ignores every mute and fade call.
#[derive(Debug, Clone)]
pub struct Channel {
    index: usize,
    /// `None` when the asset for this pitch class is unavailable.
    player: Option<LoopPlayer>,
    volume: f64,
    muted: bool,
    fade: Option<Fade>,
    sample_rate: f64,
    max_volume: f64,
}

impl Channel {
    /// Create a playing channel. The loop starts immediately at `volume`.
    pub fn new(
        index: usize,
        buffer: SampleBuffer,
        sample_rate: f64,
        max_volume: f64,
        volume: f64,
    ) -> Self {
        Channel {
            index,
            player: Some(LoopPlayer::new(buffer, sample_rate)),
            volume: volume.clamp(0.0, max_volume),
            muted: false,
            fade: None,
            sample_rate,
            max_volume,
        }
    }

    /// Create a channel with no audio behind it.
    pub fn disabled(index: usize, sample_rate: f64, max_volume: f64) -> Self {
        Channel {
            index,
            player: None,
            volume: 0.0,
            muted: false,
            fade: None,
            sample_rate,
            max_volume,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_enabled(&self) -> bool {
        self.player.is_some()
    }

    /// Hard gate: silence or restore output without touching volume or any
    /// running fade.
    pub fn set_muted(&mut self, muted: bool) {
        if !self.is_enabled() {
            return;
        }
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Start a linear fade from the current volume to `target`.
    ///
    /// Any running fade is replaced; the new ramp starts wherever the old
    /// one had got to. A duration shorter than one frame jumps straight to
    /// `target`.
    pub fn fade_to(&mut self, target: f64, duration_ms: u32) {
        if !self.is_enabled() {
            return;
        }
        let target = if target.is_finite() {
            target.clamp(0.0, self.max_volume)
        } else {
            0.0
        };
        let frames = ms_to_frames(duration_ms, self.sample_rate);
        if frames == 0 {
            self.volume = target;
            self.fade = None;
        } else {
            self.fade = Some(Fade::new(self.volume, target, frames));
        }
    }

    pub fn current_volume(&self) -> f64 {
        self.volume
    }

    /// The volume this channel is heading to: the running fade's target,
    /// or the current volume when idle.
    pub fn target_volume(&self) -> f64 {
        self.fade.as_ref().map_or(self.volume, Fade::target)
    }

    pub fn fade_in_progress(&self) -> bool {
        self.fade.is_some()
    }

    pub fn phase(&self) -> ChannelPhase {
        if !self.is_enabled() || self.muted {
            return ChannelPhase::Silent;
        }
        match &self.fade {
            Some(fade) if fade.is_rising() => ChannelPhase::FadingIn,
            Some(_) => ChannelPhase::FadingOut,
            None if self.volume > 0.0 => ChannelPhase::Audible,
            None => ChannelPhase::Silent,
        }
    }

    /// Advance time by `frames` without rendering.
    pub fn advance(&mut self, frames: usize) {
        if frames == 0 {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.skip(frames);
        }
        self.step_fade(frames);
    }

    /// Render one frame of the loop at the current gain, then step the fade.
    pub fn next_sample(&mut self) -> f64 {
        let Some(player) = self.player.as_mut() else {
            return 0.0;
        };
        let sample = player.next_sample();
        let out = if self.muted { 0.0 } else { sample * self.volume };
        self.step_fade(1);
        out
    }

    fn step_fade(&mut self, frames: usize) {
        if let Some(fade) = self.fade.as_mut() {
            self.volume = fade.step(frames);
            if fade.is_complete() {
                self.fade = None;
            }
        }
    }
}
