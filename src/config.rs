//! Mixer configuration.
//!
//! Chosen once per deployment and never changed while the engine runs.
//! The JSON form uses camelCase keys, e.g.
//! `{"mode": "variable-target-fade", "maxVolume": 0.5, "fadeInMs": 100}`.

use serde::{Deserialize, Serialize};

use crate::error::MixerError;

/// How control requests change a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixerMode {
    /// Channels play at the reference volume; inaudible means muted.
    InstantMute,
    /// Inaudible channels sit at volume 0; toggles fade to and from
    /// `max_volume` over `fade_duration_ms`.
    FixedTargetFade,
    /// As `FixedTargetFade`, with independent fade-in/fade-out durations.
    VariableTargetFade,
}

impl MixerMode {
    pub fn is_fade(self) -> bool {
        !matches!(self, MixerMode::InstantMute)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MixerConfig {
    pub mode: MixerMode,
    /// Ceiling for audible channels.
    pub max_volume: f64,
    /// Fade length in milliseconds. 0 = instant.
    pub fade_duration_ms: u32,
    /// Fade-in override (variable-target mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_in_ms: Option<u32>,
    /// Fade-out override (variable-target mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_out_ms: Option<u32>,
    /// Playback volume of every channel under `InstantMute`.
    pub reference_volume: f64,
    /// Gain applied to the summed output.
    pub master_gain: f64,
}

impl Default for MixerConfig {
    fn default() -> Self {
        MixerConfig {
            mode: MixerMode::FixedTargetFade,
            max_volume: 1.0,
            fade_duration_ms: 100,
            fade_in_ms: None,
            fade_out_ms: None,
            reference_volume: 0.5,
            master_gain: 1.0,
        }
    }
}

impl MixerConfig {
    /// Hard mute gate over loops playing at 0.5.
    pub fn instant_mute() -> Self {
        MixerConfig {
            mode: MixerMode::InstantMute,
            max_volume: 1.0,
            fade_duration_ms: 0,
            reference_volume: 0.5,
            ..Default::default()
        }
    }

    /// Slow, quiet fades: 100 ms each way up to 0.5.
    pub fn soft_fade() -> Self {
        MixerConfig {
            mode: MixerMode::VariableTargetFade,
            max_volume: 0.5,
            fade_duration_ms: 100,
            fade_in_ms: Some(100),
            fade_out_ms: Some(100),
            ..Default::default()
        }
    }

    /// Snappy fades: 20 ms each way up to full volume.
    pub fn quick_fade() -> Self {
        MixerConfig {
            mode: MixerMode::VariableTargetFade,
            max_volume: 1.0,
            fade_duration_ms: 20,
            fade_in_ms: Some(20),
            fade_out_ms: Some(20),
            ..Default::default()
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, MixerError> {
        let config: MixerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MixerError> {
        if !self.max_volume.is_finite() || self.max_volume <= 0.0 {
            return Err(MixerError::InvalidConfig {
                reason: format!("maxVolume must be > 0, got {}", self.max_volume),
            });
        }
        // Only the mute gate plays at the reference volume.
        if self.mode == MixerMode::InstantMute
            && (!self.reference_volume.is_finite()
                || self.reference_volume < 0.0
                || self.reference_volume > self.max_volume)
        {
            return Err(MixerError::InvalidConfig {
                reason: format!(
                    "referenceVolume must be within 0..={}, got {}",
                    self.max_volume, self.reference_volume
                ),
            });
        }
        if !self.master_gain.is_finite() || self.master_gain < 0.0 {
            return Err(MixerError::InvalidConfig {
                reason: format!("masterGain must be >= 0, got {}", self.master_gain),
            });
        }
        Ok(())
    }

    /// Fade-in length for the configured mode.
    pub fn fade_in_duration_ms(&self) -> u32 {
        match self.mode {
            MixerMode::InstantMute => 0,
            MixerMode::FixedTargetFade => self.fade_duration_ms,
            MixerMode::VariableTargetFade => self.fade_in_ms.unwrap_or(self.fade_duration_ms),
        }
    }

    /// Fade-out length for the configured mode.
    pub fn fade_out_duration_ms(&self) -> u32 {
        match self.mode {
            MixerMode::InstantMute => 0,
            MixerMode::FixedTargetFade => self.fade_duration_ms,
            MixerMode::VariableTargetFade => self.fade_out_ms.unwrap_or(self.fade_duration_ms),
        }
    }

    /// Volume every channel starts at.
    pub fn initial_volume(&self) -> f64 {
        match self.mode {
            MixerMode::InstantMute => self.reference_volume,
            _ => 0.0,
        }
    }
}
