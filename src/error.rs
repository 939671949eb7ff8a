use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum MixerError {
    /// A configuration value is out of range.
    InvalidConfig { reason: String },
    /// Configuration JSON did not deserialize.
    ConfigParse(String),
    /// A WAV asset could not be decoded.
    AssetDecode { index: Option<usize>, reason: String },
    /// A WAV asset could not be read from disk.
    AssetIo { path: PathBuf, reason: String },
    /// A channel index outside 0..12 was used while loading.
    ChannelIndex(usize),
    /// Sources can only be loaded before the engine starts.
    AlreadyStarted,
}

impl fmt::Display for MixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixerError::InvalidConfig { reason } => write!(f, "Invalid config: {reason}"),
            MixerError::ConfigParse(e) => write!(f, "Config parse error: {e}"),
            MixerError::AssetDecode { index: Some(i), reason } => {
                write!(f, "Failed to decode asset for channel {i}: {reason}")
            }
            MixerError::AssetDecode { index: None, reason } => {
                write!(f, "Failed to decode asset: {reason}")
            }
            MixerError::AssetIo { path, reason } => {
                write!(f, "Failed to read {}: {reason}", path.display())
            }
            MixerError::ChannelIndex(i) => write!(f, "Channel index {i} is out of range 0..12"),
            MixerError::AlreadyStarted => write!(f, "Engine already started"),
        }
    }
}

impl std::error::Error for MixerError {}

impl From<serde_json::Error> for MixerError {
    fn from(e: serde_json::Error) -> Self {
        MixerError::ConfigParse(e.to_string())
    }
}

impl From<hound::Error> for MixerError {
    fn from(e: hound::Error) -> Self {
        MixerError::AssetDecode {
            index: None,
            reason: e.to_string(),
        }
    }
}

impl MixerError {
    /// Attach a channel index to a decode error.
    pub fn for_channel(self, index: usize) -> Self {
        match self {
            MixerError::AssetDecode { reason, .. } => MixerError::AssetDecode {
                index: Some(index),
                reason,
            },
            other => other,
        }
    }
}
