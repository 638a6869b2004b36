//! Clip decoding.
//!
//! The pipeline never parses audio containers itself; it asks a
//! [`ClipDecoder`] to turn clip bytes into interleaved `f32` samples.

use crate::error::RenderResult;
use crate::format::DecodedClip;

/// Turns raw clip bytes into samples.
///
/// A decode failure is fatal for the clip and is never retried.
pub trait ClipDecoder {
    /// Decodes `bytes`; `name` is used for error context only.
    fn decode(&self, name: &str, bytes: &[u8]) -> RenderResult<DecodedClip>;
}

impl<D: ClipDecoder + ?Sized> ClipDecoder for &D {
    fn decode(&self, name: &str, bytes: &[u8]) -> RenderResult<DecodedClip> {
        (**self).decode(name, bytes)
    }
}

#[cfg(feature = "vorbis")]
pub use vorbis::VorbisDecoder;

#[cfg(feature = "vorbis")]
mod vorbis {
    use std::io::Cursor;
    use std::time::Duration;

    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
    use symphonia::core::errors::Error as SymphoniaError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    use super::ClipDecoder;
    use crate::error::{RenderError, RenderResult};
    use crate::format::{AudioFormat, DecodedClip};

    /// Ogg/Vorbis decoder backed by symphonia.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct VorbisDecoder;

    impl VorbisDecoder {
        /// Creates a decoder.
        pub fn new() -> Self {
            Self
        }
    }

    impl ClipDecoder for VorbisDecoder {
        fn decode(&self, name: &str, bytes: &[u8]) -> RenderResult<DecodedClip> {
            let fail = |e: SymphoniaError| RenderError::decode(name, e.to_string());

            let source = Cursor::new(bytes.to_vec());
            let stream = MediaSourceStream::new(Box::new(source), Default::default());
            let mut hint = Hint::new();
            hint.with_extension("ogg");

            let probed = symphonia::default::get_probe()
                .format(
                    &hint,
                    stream,
                    &FormatOptions::default(),
                    &MetadataOptions::default(),
                )
                .map_err(fail)?;
            let mut reader = probed.format;

            let track = reader
                .tracks()
                .iter()
                .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
                .ok_or_else(|| RenderError::decode(name, "no audio track"))?;
            let track_id = track.id;
            let params = track.codec_params.clone();

            let mut decoder = symphonia::default::get_codecs()
                .make(&params, &DecoderOptions::default())
                .map_err(fail)?;

            let mut sample_rate = params.sample_rate.unwrap_or(0);
            let mut channels = params.channels.map(|c| c.count() as u16).unwrap_or(0);
            let mut samples = Vec::new();

            loop {
                let packet = match reader.next_packet() {
                    Ok(packet) => packet,
                    Err(SymphoniaError::IoError(e))
                        if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                    {
                        break
                    }
                    Err(SymphoniaError::ResetRequired) => break,
                    Err(e) => return Err(fail(e)),
                };
                if packet.track_id() != track_id {
                    continue;
                }

                match decoder.decode(&packet) {
                    Ok(decoded) => {
                        let spec = *decoded.spec();
                        sample_rate = spec.rate;
                        channels = spec.channels.count() as u16;
                        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                        buffer.copy_interleaved_ref(decoded);
                        samples.extend_from_slice(buffer.samples());
                    }
                    Err(SymphoniaError::DecodeError(message)) => {
                        tracing::warn!(clip = name, %message, "skipping undecodable packet");
                    }
                    Err(e) => return Err(fail(e)),
                }
            }

            let format = AudioFormat::new(sample_rate, channels);
            if !format.is_valid() {
                return Err(RenderError::decode(name, "stream has no sample rate or channels"));
            }

            let duration = match params.n_frames {
                Some(frames) => Duration::from_secs_f64(frames as f64 / sample_rate as f64),
                None => Duration::from_secs_f64(format.seconds_for(samples.len())),
            };
            tracing::debug!(clip = name, %format, samples = samples.len(), "decoded");

            Ok(DecodedClip {
                samples,
                format,
                duration,
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::path::PathBuf;

        /// Stereo 22050 Hz stream built by `tests/fixtures/make_tone_ogg.py`:
        /// a steady tone on the left channel, silence on the right.
        fn tone_left() -> Vec<u8> {
            let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tone_left.ogg");
            std::fs::read(path).unwrap()
        }

        #[test]
        fn test_decodes_stereo_vorbis_stream() {
            let clip = VorbisDecoder::new().decode("tone_left.ogg", &tone_left()).unwrap();

            assert_eq!(clip.format, AudioFormat::stereo(22050));
            assert_eq!(clip.samples.len(), 22016 * 2);
            assert_eq!(clip.duration, Duration::from_secs_f64(22016.0 / 22050.0));

            let left: Vec<f32> = clip.samples.iter().step_by(2).copied().collect();
            let right: Vec<f32> = clip.samples.iter().skip(1).step_by(2).copied().collect();
            assert!(right.iter().all(|&s| s == 0.0));

            let peak = left.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
            assert!((0.45..0.55).contains(&peak), "left peak {peak}");
            let crossings = left.windows(2).filter(|w| (w[0] < 0.0) != (w[1] < 0.0)).count();
            assert!((600..800).contains(&crossings), "{crossings} zero crossings");
        }

        #[test]
        fn test_truncated_stream_is_decode_error() {
            let bytes = tone_left();
            let err = VorbisDecoder::new()
                .decode("cut.ogg", &bytes[..64])
                .unwrap_err();
            assert!(matches!(err, RenderError::Decode { .. }));
        }

        #[test]
        fn test_garbage_is_decode_error() {
            let err = VorbisDecoder::new()
                .decode("noise.ogg", b"definitely not an ogg stream")
                .unwrap_err();
            assert!(matches!(err, RenderError::Decode { .. }));
            assert!(err.to_string().contains("noise.ogg"));
        }
    }
}
