//! DSP — the audio side of the mixer.
//!
//! Everything here runs on the host's render loop: looped sample playback,
//! per-channel fades, and the summing output bus.

pub mod channel;
pub mod fade;
pub mod output;
pub mod registry;
pub mod sampler;
