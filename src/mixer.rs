//! Tone channel mixer — decides how each control request changes a channel.
//!
//! One mixer covers every deployment; the [`MixerMode`] picks between a hard
//! mute gate and linear fades, and the numeric knobs in [`MixerConfig`]
//! set the ceiling and fade lengths.
//!
//! Fade policies treat each channel as a four-phase machine:
//!
//! ```text
//! Silent --audible--> FadingIn --elapsed--> Audible
//! Audible --inaudible--> FadingOut --elapsed--> Silent
//! ```
//!
//! A request in the opposite direction mid-fade restarts the ramp from the
//! current volume. A request for the direction the channel is already at or
//! heading toward is ignored, so a repeated signal never restarts a fade.

use crate::config::{MixerConfig, MixerMode};
use crate::control::ControlRequest;
use crate::dsp::channel::Channel;
use crate::dsp::registry::ChannelRegistry;

#[derive(Debug, Clone)]
pub struct ToneMixer {
    config: MixerConfig,
}

impl ToneMixer {
    pub fn new(config: MixerConfig) -> Self {
        ToneMixer { config }
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// Put every channel into the policy's resting state: muted at the
    /// reference volume for the gate, unmuted at zero for the fades.
    pub fn initialize(&self, registry: &mut ChannelRegistry) {
        let volume = self.config.initial_volume();
        let muted = !self.config.mode.is_fade();
        for channel in registry.iter_mut() {
            channel.fade_to(volume, 0);
            channel.set_muted(muted);
        }
    }

    /// Apply requests in order. Requests naming a channel that does not
    /// exist are dropped.
    pub fn apply(&self, registry: &mut ChannelRegistry, requests: &[ControlRequest]) {
        for request in requests {
            match registry.get_mut(request.channel_index) {
                Some(channel) => self.apply_one(channel, request.audible),
                None => log::debug!("no channel {} for control request", request.channel_index),
            }
        }
    }

    fn apply_one(&self, channel: &mut Channel, audible: bool) {
        match self.config.mode {
            MixerMode::InstantMute => channel.set_muted(!audible),
            MixerMode::FixedTargetFade | MixerMode::VariableTargetFade => {
                let (target, duration_ms) = if audible {
                    (self.config.max_volume, self.config.fade_in_duration_ms())
                } else {
                    (0.0, self.config.fade_out_duration_ms())
                };
                if channel.target_volume() == target {
                    log::trace!("channel {} already heading to {target}", channel.index());
                    return;
                }
                channel.fade_to(target, duration_ms);
            }
        }
    }
}
