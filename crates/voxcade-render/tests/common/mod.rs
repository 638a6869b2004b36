//! Shared fixtures for render integration tests.
//!
//! No Vorbis encoder is available to the tests, so clips are written as
//! 32-bit float WAV data under `.ogg` names and decoded with hound.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use voxcade_render::{AudioFormat, ClipDecoder, DecodedClip, RenderError, RenderResult};

/// Decodes float WAV clip bytes with hound.
pub struct WavDecoder;

impl ClipDecoder for WavDecoder {
    fn decode(&self, name: &str, bytes: &[u8]) -> RenderResult<DecodedClip> {
        let reader = hound::WavReader::new(Cursor::new(bytes))
            .map_err(|e| RenderError::decode(name, e.to_string()))?;
        let spec = reader.spec();
        let samples = reader
            .into_samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| RenderError::decode(name, e.to_string()))?;
        Ok(DecodedClip::new(
            samples,
            AudioFormat::new(spec.sample_rate, spec.channels),
        ))
    }
}

/// Encodes interleaved samples as a float WAV file.
pub fn clip_bytes(format: AudioFormat, samples: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Writes a constant-amplitude clip of `frames` frames to `dir/name`.
pub fn write_constant(dir: &Path, name: &str, format: AudioFormat, frames: usize, value: f32) {
    let samples = vec![value; frames * format.channels as usize];
    write_clip(dir, name, format, &samples);
}

/// Writes interleaved samples as a clip at `dir/name`.
pub fn write_clip(dir: &Path, name: &str, format: AudioFormat, samples: &[f32]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, clip_bytes(format, samples)).unwrap();
}

/// Reads a rendered 16-bit WAV back as (format, samples).
pub fn read_pcm16(bytes: &[u8]) -> (AudioFormat, Vec<i16>) {
    let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    (AudioFormat::new(spec.sample_rate, spec.channels), samples)
}
