//! Word clip concatenation.

use crate::decode::ClipDecoder;
use crate::error::{RenderError, RenderResult};
use crate::format::{AudioFormat, DecodedClip};
use crate::options::{check_timing, SentenceOptions};
use crate::resample::resample_interleaved;
use crate::source::{clip_file_name, ClipSource};

/// Speech track produced by the assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechTrack {
    /// Interleaved speech samples.
    pub samples: Vec<f32>,
    /// Format shared by every clip.
    pub format: AudioFormat,
}

/// Accumulates resampled clips with silence between them.
///
/// The first clip fixes the format; every later clip must match it exactly.
#[derive(Debug)]
pub struct SentenceAssembler {
    factor: f64,
    gap_ms: f64,
    samples: Vec<f32>,
    format: Option<AudioFormat>,
}

impl SentenceAssembler {
    /// Creates an assembler for a playback factor and effective gap.
    pub fn new(factor: f64, gap_ms: f64) -> Self {
        Self {
            factor,
            gap_ms,
            samples: Vec::new(),
            format: None,
        }
    }

    /// Creates an assembler from render options.
    pub fn from_options(options: &SentenceOptions) -> Self {
        Self::new(options.playback_factor(), options.effective_gap_ms())
    }

    /// Format established by the first clip, if any.
    pub fn format(&self) -> Option<AudioFormat> {
        self.format
    }

    /// Appends a clip, preceded by the gap if it is not the first.
    ///
    /// A gap above [`MAX_TIMING_MS`](crate::options::MAX_TIMING_MS) is a
    /// usage error.
    pub fn push_clip(&mut self, name: &str, clip: &DecodedClip) -> RenderResult<()> {
        let format = match self.format {
            None => {
                if !clip.format.is_valid() {
                    return Err(RenderError::decode(name, format!("invalid format {}", clip.format)));
                }
                self.format = Some(clip.format);
                clip.format
            }
            Some(expected) if expected != clip.format => {
                return Err(RenderError::FormatMismatch {
                    clip: name.to_string(),
                    expected,
                    actual: clip.format,
                });
            }
            Some(expected) => {
                check_timing("gap_ms", self.gap_ms)?;
                let silence = expected.samples_for_ms(self.gap_ms);
                let len = self
                    .samples
                    .len()
                    .checked_add(silence)
                    .ok_or_else(|| RenderError::usage("gap_ms", "sentence does not fit in memory"))?;
                self.samples.resize(len, 0.0);
                expected
            }
        };

        let resampled = resample_interleaved(&clip.samples, format.channels, self.factor);
        self.samples.extend_from_slice(&resampled);
        Ok(())
    }

    /// Finishes the track. Fails if no clip was pushed.
    pub fn finish(self) -> RenderResult<SpeechTrack> {
        let format = self
            .format
            .ok_or_else(|| RenderError::usage("words", "no clips were assembled"))?;
        Ok(SpeechTrack {
            samples: self.samples,
            format,
        })
    }
}

/// Decodes and concatenates the clips for `words`.
///
/// Stops at the first missing clip (`NotFound`) or heterogeneous clip
/// (`FormatMismatch`).
pub fn assemble<D: ClipDecoder>(
    source: &ClipSource,
    decoder: &D,
    words: &[impl AsRef<str>],
    options: &SentenceOptions,
) -> RenderResult<SpeechTrack> {
    if words.is_empty() {
        return Err(RenderError::usage("words", "word list is empty"));
    }

    let mut assembler = SentenceAssembler::from_options(options);
    for word in words {
        let word = word.as_ref();
        if word.trim().is_empty() {
            return Err(RenderError::usage("words", "word list contains a blank entry"));
        }
        let file_name = clip_file_name(word);
        let bytes = source.read_word(word)?;
        let clip = decoder.decode(&file_name, &bytes)?;
        assembler.push_clip(&file_name, &clip)?;
    }

    let track = assembler.finish()?;
    tracing::debug!(
        words = words.len(),
        samples = track.samples.len(),
        format = %track.format,
        "speech assembled"
    );
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f32, len: usize, format: AudioFormat) -> DecodedClip {
        DecodedClip::new(vec![value; len], format)
    }

    #[test]
    fn test_gap_inserted_between_words_only() {
        let format = AudioFormat::mono(16000);
        let mut assembler = SentenceAssembler::new(1.0, 100.0);
        assembler.push_clip("a.ogg", &constant(0.5, 1000, format)).unwrap();
        assembler.push_clip("b.ogg", &constant(0.25, 1000, format)).unwrap();
        assembler.push_clip("c.ogg", &constant(0.75, 1000, format)).unwrap();
        let track = assembler.finish().unwrap();

        assert_eq!(track.format, format);
        assert_eq!(track.samples.len(), 3000 + 2 * 1600);
        assert!(track.samples[..1000].iter().all(|&s| s == 0.5));
        assert!(track.samples[1000..2600].iter().all(|&s| s == 0.0));
        assert!(track.samples[2600..3600].iter().all(|&s| s == 0.25));
        assert!(track.samples[5200..].iter().all(|&s| s == 0.75));
    }

    #[test]
    fn test_overlap_shortens_gap() {
        let format = AudioFormat::mono(1000);
        let options = SentenceOptions {
            gap_ms: 100.0,
            overlap_ms: 40.0,
            speed_percent: 100.0,
            pitch_semitones: 0.0,
            ..Default::default()
        };
        let mut assembler = SentenceAssembler::from_options(&options);
        assembler.push_clip("a.ogg", &constant(1.0, 10, format)).unwrap();
        assembler.push_clip("b.ogg", &constant(1.0, 10, format)).unwrap();
        assert_eq!(assembler.finish().unwrap().samples.len(), 10 + 60 + 10);
    }

    #[test]
    fn test_overlap_larger_than_gap_means_no_silence() {
        let format = AudioFormat::mono(1000);
        let mut assembler = SentenceAssembler::new(1.0, 0.0);
        assembler.push_clip("a.ogg", &constant(1.0, 10, format)).unwrap();
        assembler.push_clip("b.ogg", &constant(1.0, 10, format)).unwrap();
        assert_eq!(assembler.finish().unwrap().samples.len(), 20);
    }

    #[test]
    fn test_channel_mismatch_is_fatal() {
        let mut assembler = SentenceAssembler::new(1.0, 50.0);
        assembler
            .push_clip("one.ogg", &constant(0.1, 100, AudioFormat::mono(16000)))
            .unwrap();
        let err = assembler
            .push_clip("two.ogg", &constant(0.1, 200, AudioFormat::stereo(16000)))
            .unwrap_err();
        match err {
            RenderError::FormatMismatch {
                clip,
                expected,
                actual,
            } => {
                assert_eq!(clip, "two.ogg");
                assert_eq!(expected, AudioFormat::mono(16000));
                assert_eq!(actual, AudioFormat::stereo(16000));
            }
            other => panic!("expected format mismatch, got {other}"),
        }
    }

    #[test]
    fn test_sample_rate_mismatch_is_fatal() {
        let mut assembler = SentenceAssembler::new(1.0, 0.0);
        assembler
            .push_clip("one.ogg", &constant(0.1, 100, AudioFormat::mono(16000)))
            .unwrap();
        assert!(matches!(
            assembler.push_clip("two.ogg", &constant(0.1, 100, AudioFormat::mono(22050))),
            Err(RenderError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn test_speed_changes_clip_length_not_gap() {
        let format = AudioFormat::mono(1000);
        let mut assembler = SentenceAssembler::new(2.0, 100.0);
        assembler.push_clip("a.ogg", &constant(1.0, 500, format)).unwrap();
        assembler.push_clip("b.ogg", &constant(1.0, 500, format)).unwrap();
        assert_eq!(assembler.finish().unwrap().samples.len(), 250 + 100 + 250);
    }

    #[test]
    fn test_huge_gap_is_usage_error() {
        let format = AudioFormat::mono(16000);
        let mut assembler = SentenceAssembler::new(1.0, 1e20);
        assembler.push_clip("a.ogg", &constant(0.5, 10, format)).unwrap();
        let err = assembler.push_clip("b.ogg", &constant(0.5, 10, format)).unwrap_err();
        assert!(matches!(err, RenderError::Usage { name: "gap_ms", .. }));
    }

    #[test]
    fn test_finish_without_clips_fails() {
        assert!(SentenceAssembler::new(1.0, 0.0).finish().is_err());
    }
}
