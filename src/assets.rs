//! Asset loading — decodes the twelve pitch-class WAV loops.
//!
//! Assets are named by pitch class: `0.wav` is C, `11.wav` is B. A file
//! that is missing or does not decode disables only its own channel.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::dsp::registry::{PITCH_CLASS_COUNT, PITCH_CLASS_NAMES};
use crate::dsp::sampler::SampleBuffer;
use crate::error::MixerError;

/// Decode a WAV file held in memory into a mono buffer. Multi-channel
/// audio is averaged down to one channel.
pub fn decode_wav(bytes: &[u8]) -> Result<SampleBuffer, MixerError> {
    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1u64 << spec.bits_per_sample.saturating_sub(1).min(62)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mono: Vec<f32> = interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    if mono.is_empty() {
        return Err(MixerError::AssetDecode {
            index: None,
            reason: "no audio frames".to_string(),
        });
    }
    Ok(SampleBuffer::from_f32(&mono, spec.sample_rate))
}

/// Read and decode one WAV file.
pub fn load_wav_file(path: &Path) -> Result<SampleBuffer, MixerError> {
    let bytes = std::fs::read(path).map_err(|e| MixerError::AssetIo {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    decode_wav(&bytes)
}

/// Load `0.wav`..`11.wav` from `dir`. Each failure is logged and leaves
/// that pitch class without a source.
pub fn load_pitch_class_dir(dir: &Path) -> [Option<SampleBuffer>; PITCH_CLASS_COUNT] {
    std::array::from_fn(|i| {
        let path = dir.join(format!("{i}.wav"));
        match load_wav_file(&path) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                log::warn!("{} disabled: {}", PITCH_CLASS_NAMES[i], e.for_channel(i));
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn wav_i16(channels: u16, frames: &[i16]) -> Vec<u8> {
        let spec = WavSpec {
            channels,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for &s in frames {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes
    }

    fn wav_f32(samples: &[f32]) -> Vec<u8> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes
    }

    #[test]
    fn decodes_int_pcm() {
        let buf = decode_wav(&wav_i16(1, &[0, 16384, -32768])).unwrap();
        assert_eq!(buf.sample_rate, 22050);
        assert_eq!(buf.data, vec![0.0, 0.5, -1.0]);
    }

    #[test]
    fn decodes_float_pcm() {
        let buf = decode_wav(&wav_f32(&[0.25, -0.5])).unwrap();
        assert_eq!(buf.sample_rate, 48000);
        assert_eq!(buf.data, vec![0.25, -0.5]);
    }

    #[test]
    fn stereo_is_mixed_down() {
        let buf = decode_wav(&wav_i16(2, &[16384, 0, -16384, -16384])).unwrap();
        assert_eq!(buf.data, vec![0.25, -0.5]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_wav(b"definitely not a wav").unwrap_err();
        assert!(matches!(err, MixerError::AssetDecode { .. }), "{err}");
    }

    #[test]
    fn empty_wav_is_rejected() {
        assert!(decode_wav(&wav_i16(1, &[])).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_wav_file(Path::new("/nonexistent/0.wav")).unwrap_err();
        assert!(matches!(err, MixerError::AssetIo { .. }), "{err}");
    }

    #[test]
    fn directory_failures_stay_per_channel() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..PITCH_CLASS_COUNT {
            let path = dir.path().join(format!("{i}.wav"));
            match i {
                4 => std::fs::write(&path, b"corrupt").unwrap(),
                10 => {}
                _ => std::fs::write(&path, wav_i16(1, &[100, 200, 300])).unwrap(),
            }
        }

        let sources = load_pitch_class_dir(dir.path());
        for (i, source) in sources.iter().enumerate() {
            assert_eq!(source.is_some(), i != 4 && i != 10, "channel {i}");
        }
    }
}
