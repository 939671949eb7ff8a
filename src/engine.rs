//! Tone engine — owns the registry, the mixer policy and the output bus,
//! and is the single place control events and the render loop meet.
//!
//! Startup is two-phase: sources are loaded per pitch class, then
//! [`ToneEngine::start`] builds the registry once. Control events that
//! arrive before that are dropped.

use crate::config::MixerConfig;
use crate::control::{ControlPort, ControlRequest, ControlSignal, requests_from_json};
use crate::dsp::channel::Channel;
use crate::dsp::output::OutputBus;
use crate::dsp::registry::{ChannelRegistry, PITCH_CLASS_COUNT};
use crate::dsp::sampler::SampleBuffer;
use crate::error::MixerError;
use crate::mixer::ToneMixer;

pub struct ToneEngine {
    sample_rate: f64,
    mixer: ToneMixer,
    output: OutputBus,
    /// Sources collected before `start`.
    pending: [Option<SampleBuffer>; PITCH_CLASS_COUNT],
    registry: Option<ChannelRegistry>,
}

impl ToneEngine {
    pub fn new(sample_rate: f64, config: MixerConfig) -> Result<Self, MixerError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(MixerError::InvalidConfig {
                reason: format!("sample rate must be > 0, got {sample_rate}"),
            });
        }
        config.validate()?;
        Ok(ToneEngine {
            sample_rate,
            output: OutputBus::new(config.master_gain),
            mixer: ToneMixer::new(config),
            pending: Default::default(),
            registry: None,
        })
    }

    /// Build and start an engine from one optional source per pitch class.
    pub fn with_sources(
        sample_rate: f64,
        config: MixerConfig,
        sources: [Option<SampleBuffer>; PITCH_CLASS_COUNT],
    ) -> Result<Self, MixerError> {
        let mut engine = ToneEngine::new(sample_rate, config)?;
        engine.pending = sources;
        engine.start();
        Ok(engine)
    }

    /// Provide the loop for one pitch class. Only allowed before `start`.
    pub fn load_channel(&mut self, index: usize, buffer: SampleBuffer) -> Result<(), MixerError> {
        if self.registry.is_some() {
            return Err(MixerError::AlreadyStarted);
        }
        let slot = self
            .pending
            .get_mut(index)
            .ok_or(MixerError::ChannelIndex(index))?;
        *slot = Some(buffer);
        Ok(())
    }

    /// Create the twelve channels and start every loop. Pitch classes
    /// without a source become silent, disabled channels. Calling this
    /// again has no effect.
    pub fn start(&mut self) {
        if self.registry.is_some() {
            return;
        }
        let config = self.mixer.config();
        let mut registry = ChannelRegistry::from_sources(
            std::mem::take(&mut self.pending),
            self.sample_rate,
            config.max_volume,
            config.initial_volume(),
        );
        self.mixer.initialize(&mut registry);
        log::info!(
            "tone engine started: {:?}, {}/{} channels playing at {} Hz",
            config.mode,
            registry.enabled_count(),
            PITCH_CLASS_COUNT,
            self.sample_rate
        );
        self.registry = Some(registry);
    }

    pub fn is_started(&self) -> bool {
        self.registry.is_some()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn config(&self) -> &MixerConfig {
        self.mixer.config()
    }

    pub fn registry(&self) -> Option<&ChannelRegistry> {
        self.registry.as_ref()
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.registry.as_ref()?.get(index)
    }

    /// Apply already-normalized requests in order.
    pub fn apply_requests(&mut self, requests: &[ControlRequest]) {
        match self.registry.as_mut() {
            Some(registry) => self.mixer.apply(registry, requests),
            None => log::debug!(
                "engine not started; dropping {} control request(s)",
                requests.len()
            ),
        }
    }

    /// Decode and apply a JSON text payload.
    pub fn handle_json(&mut self, text: &str) {
        let requests = requests_from_json(text);
        self.apply_requests(&requests);
    }

    /// Advance every fade and loop by `frames` without producing audio.
    pub fn advance(&mut self, frames: usize) {
        if let Some(registry) = self.registry.as_mut() {
            registry.advance(frames);
        }
    }

    pub fn advance_ms(&mut self, ms: u32) {
        self.advance(crate::dsp::fade::ms_to_frames(ms, self.sample_rate));
    }

    /// Render `frames` mono frames. Silence until the engine is started.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        match self.registry.as_mut() {
            Some(registry) => self.output.render(registry, frames),
            None => vec![0.0; frames],
        }
    }

    /// Fill an interleaved output buffer with `channels` samples per frame.
    pub fn render_into(&mut self, out: &mut [f32], channels: usize) {
        match self.registry.as_mut() {
            Some(registry) => self.output.render_into(registry, out, channels),
            None => out.fill(0.0),
        }
    }
}

impl ControlPort for ToneEngine {
    fn handle_signal(&mut self, signal: &ControlSignal) {
        let requests = signal.requests();
        self.apply_requests(&requests);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MixerMode;
    use crate::dsp::channel::ChannelPhase;
    use serde_json::json;

    const RATE: f64 = 1000.0;

    fn tone() -> SampleBuffer {
        let data = (0..64).map(|i| ((i as f64) * 0.1).sin()).collect();
        SampleBuffer::new(data, 1000)
    }

    fn all_sources() -> [Option<SampleBuffer>; PITCH_CLASS_COUNT] {
        std::array::from_fn(|_| Some(tone()))
    }

    fn engine(config: MixerConfig) -> ToneEngine {
        ToneEngine::with_sources(RATE, config, all_sources()).unwrap()
    }

    fn volume(engine: &ToneEngine, index: usize) -> f64 {
        engine.channel(index).map_or(f64::NAN, Channel::current_volume)
    }

    #[test]
    fn rejects_bad_sample_rate() {
        assert!(ToneEngine::new(0.0, MixerConfig::default()).is_err());
        assert!(ToneEngine::new(f64::NAN, MixerConfig::default()).is_err());
    }

    #[test]
    fn requests_before_start_are_dropped() {
        let mut engine = ToneEngine::new(RATE, MixerConfig::default()).unwrap();
        engine.handle_value(&json!([3, true]));
        assert!(engine.channel(3).is_none());
        assert!(engine.render(16).iter().all(|&s| s == 0.0));

        engine.load_channel(3, tone()).unwrap();
        engine.start();
        let ch = engine.channel(3).unwrap();
        assert_eq!(ch.phase(), ChannelPhase::Silent);
        assert!(!ch.fade_in_progress());
    }

    #[test]
    fn load_channel_guards() {
        let mut engine = ToneEngine::new(RATE, MixerConfig::default()).unwrap();
        assert!(matches!(
            engine.load_channel(12, tone()),
            Err(MixerError::ChannelIndex(12))
        ));
        engine.start();
        assert!(matches!(
            engine.load_channel(0, tone()),
            Err(MixerError::AlreadyStarted)
        ));
    }

    #[test]
    fn unloaded_pitch_classes_are_disabled() {
        let mut engine = ToneEngine::new(RATE, MixerConfig::default()).unwrap();
        engine.load_channel(0, tone()).unwrap();
        engine.start();
        let registry = engine.registry().unwrap();
        assert_eq!(registry.enabled_count(), 1);

        engine.handle_value(&json!(vec![true; 12]));
        engine.advance(100);
        assert_eq!(volume(&engine, 0), 1.0);
        assert_eq!(volume(&engine, 1), 0.0);
    }

    #[test]
    fn pair_signal_fades_one_channel() {
        let mut engine = engine(MixerConfig::default());
        engine.handle_value(&json!([3, true]));
        assert_eq!(
            engine.channel(3).map(Channel::phase),
            Some(ChannelPhase::FadingIn)
        );
        engine.advance_ms(100);
        assert_eq!(volume(&engine, 3), 1.0);
        for i in (0..12).filter(|&i| i != 3) {
            assert_eq!(volume(&engine, i), 0.0, "channel {i} should stay silent");
        }
    }

    #[test]
    fn vector_reversal_mid_fade() {
        let mut engine = engine(MixerConfig::default());
        let mut on = [false; 12];
        on[0] = true;
        engine.handle_value(&json!(on));
        engine.advance_ms(50);
        let mid = volume(&engine, 0);
        assert!((mid - 0.5).abs() < 1e-9, "expected ~50%, got {mid}");

        engine.handle_value(&json!(vec![false; 12]));
        assert_eq!(volume(&engine, 0), mid, "fade-out must start where fade-in stopped");
        let mut prev = mid;
        for _ in 0..150 {
            engine.advance(1);
            let v = volume(&engine, 0);
            assert!(v >= 0.0 && v <= prev, "fade-out went {prev} -> {v}");
            prev = v;
        }
        assert_eq!(volume(&engine, 0), 0.0);
        assert!(!engine.channel(0).unwrap().fade_in_progress());
    }

    #[test]
    fn out_of_range_signals_have_no_effect() {
        let mut engine = engine(MixerConfig::default());
        engine.handle_value(&json!([12, true]));
        engine.handle_value(&json!([-1, true]));
        engine.handle_json("not json");
        let registry = engine.registry().unwrap();
        assert!(registry.iter().all(|c| !c.fade_in_progress() && c.current_volume() == 0.0));
    }

    #[test]
    fn instant_mute_renders_only_unmuted() {
        let mut engine = engine(MixerConfig::instant_mute());
        assert!(engine.render(64).iter().all(|&s| s == 0.0));

        engine.handle_signal(&ControlSignal::single(7, true));
        let out = engine.render(64);
        assert!(out.iter().any(|&s| s != 0.0));
        assert_eq!(engine.config().mode, MixerMode::InstantMute);
    }

    #[test]
    fn render_into_fills_interleaved() {
        let mut engine = engine(MixerConfig {
            fade_duration_ms: 0,
            ..Default::default()
        });
        engine.handle_json("[1, true]");
        let mut out = vec![0.0f32; 32];
        engine.render_into(&mut out, 2);
        assert!(out.chunks(2).all(|f| f[0] == f[1]));
        assert!(out.iter().any(|&s| s != 0.0));
    }
}
