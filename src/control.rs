//! Control signal adapter.
//!
//! Turns the UI's "which pitch classes are audible" events into a flat list
//! of per-channel requests. Two payload shapes arrive from the UI:
//!
//! - `[index, audible]` — one channel, e.g. `[3, true]`
//! - `[b0, b1, ..., b11]` — every channel, positionally
//!
//! plus the object spellings `{"index": 3, "audible": true}` and
//! `{"audible": [..]}`. The signal is untrusted: out-of-range indices and
//! non-boolean entries are dropped one by one and never reported as errors.
//! Nothing in here touches audio.

use serde_json::Value;

use crate::dsp::registry::PITCH_CLASS_COUNT;

/// Target audibility for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRequest {
    pub channel_index: usize,
    pub audible: bool,
}

impl ControlRequest {
    pub fn new(channel_index: usize, audible: bool) -> Self {
        ControlRequest {
            channel_index,
            audible,
        }
    }
}

/// A decoded inbound control event.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlSignal {
    /// One channel. The index is kept as received; range checks happen in
    /// [`ControlSignal::requests`].
    Single { index: i64, audible: bool },
    /// Positional audibility; `None` marks an entry that was not a boolean.
    Vector(Vec<Option<bool>>),
}

impl ControlSignal {
    pub fn single(index: i64, audible: bool) -> Self {
        ControlSignal::Single { index, audible }
    }

    pub fn vector(audible: &[bool]) -> Self {
        ControlSignal::Vector(audible.iter().map(|&b| Some(b)).collect())
    }

    /// Decode a JSON payload. Returns `None` when the payload matches
    /// neither shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        let signal = match value {
            Value::Array(items) => Self::from_array(items),
            Value::Object(map) => match (map.get("index"), map.get("audible")) {
                (Some(index), Some(audible)) => Self::from_pair(index, audible),
                (None, Some(Value::Array(items))) => Some(Self::from_bools(items)),
                _ => None,
            },
            _ => None,
        };
        if signal.is_none() {
            log::debug!("dropping malformed control payload: {value}");
        }
        signal
    }

    fn from_array(items: &[Value]) -> Option<Self> {
        if let [index, audible] = items {
            if index.is_number() {
                return Self::from_pair(index, audible);
            }
        }
        Some(Self::from_bools(items))
    }

    fn from_pair(index: &Value, audible: &Value) -> Option<Self> {
        Some(ControlSignal::Single {
            index: integral(index)?,
            audible: audible.as_bool()?,
        })
    }

    fn from_bools(items: &[Value]) -> Self {
        ControlSignal::Vector(items.iter().map(Value::as_bool).collect())
    }

    /// Expand into per-channel requests, in index order, skipping anything
    /// that does not name a real channel with a definite boolean.
    pub fn requests(&self) -> Vec<ControlRequest> {
        match self {
            ControlSignal::Single { index, audible } => match usize::try_from(*index) {
                Ok(i) if i < PITCH_CLASS_COUNT => vec![ControlRequest::new(i, *audible)],
                _ => {
                    log::debug!("dropping control request for channel {index}");
                    Vec::new()
                }
            },
            ControlSignal::Vector(entries) => {
                if entries.len() > PITCH_CLASS_COUNT {
                    log::debug!(
                        "dropping {} control entries past channel {}",
                        entries.len() - PITCH_CLASS_COUNT,
                        PITCH_CLASS_COUNT - 1
                    );
                }
                entries
                    .iter()
                    .take(PITCH_CLASS_COUNT)
                    .enumerate()
                    .filter_map(|(i, entry)| match entry {
                        Some(audible) => Some(ControlRequest::new(i, *audible)),
                        None => {
                            log::debug!("dropping non-boolean control entry at {i}");
                            None
                        }
                    })
                    .collect()
            }
        }
    }
}

/// Inbound port for control events. Implementors own the channels the
/// signal is applied to; callers never see an error for a bad payload.
pub trait ControlPort {
    fn handle_signal(&mut self, signal: &ControlSignal);

    /// Decode and apply a JSON payload, ignoring anything malformed.
    fn handle_value(&mut self, value: &Value) {
        if let Some(signal) = ControlSignal::from_value(value) {
            self.handle_signal(&signal);
        }
    }
}

/// Accept JSON integers, and floats with no fractional part (JS numbers).
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Decode a JSON payload straight into requests.
pub fn requests_from_value(value: &Value) -> Vec<ControlRequest> {
    ControlSignal::from_value(value)
        .map(|signal| signal.requests())
        .unwrap_or_default()
}

/// Decode a JSON text payload. Unparseable text yields no requests.
pub fn requests_from_json(text: &str) -> Vec<ControlRequest> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => requests_from_value(&value),
        Err(e) => {
            log::debug!("dropping unparseable control payload: {e}");
            Vec::new()
        }
    }
}
