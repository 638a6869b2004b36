//! Sample format shared by every stage of a render.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sample rate and channel count of an interleaved buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl AudioFormat {
    /// Creates a format.
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Mono at `sample_rate`.
    pub fn mono(sample_rate: u32) -> Self {
        Self::new(sample_rate, 1)
    }

    /// Stereo at `sample_rate`.
    pub fn stereo(sample_rate: u32) -> Self {
        Self::new(sample_rate, 2)
    }

    /// Returns true if both fields are non-zero.
    pub fn is_valid(&self) -> bool {
        self.sample_rate > 0 && self.channels > 0
    }

    /// Interleaved samples per second (`sample_rate * channels`).
    pub fn samples_per_second(&self) -> f64 {
        self.sample_rate as f64 * self.channels as f64
    }

    /// Interleaved sample count for `ms` milliseconds.
    ///
    /// Computed as `sample_rate * channels * ms / 1000`, truncated toward
    /// zero and then down to a whole frame. Negative or non-finite input
    /// yields zero.
    pub fn samples_for_ms(&self, ms: f64) -> usize {
        if !ms.is_finite() || ms <= 0.0 {
            return 0;
        }
        let raw = (self.samples_per_second() * ms / 1000.0) as usize;
        self.align_to_frame(raw)
    }

    /// Rounds a sample count down to a multiple of `channels`.
    pub fn align_to_frame(&self, samples: usize) -> usize {
        let channels = self.channels.max(1) as usize;
        samples - samples % channels
    }

    /// Duration of `samples` interleaved samples, in seconds.
    pub fn seconds_for(&self, samples: usize) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        samples as f64 / self.samples_per_second()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz/{}ch", self.sample_rate, self.channels)
    }
}

/// A decoded clip.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClip {
    /// Interleaved samples, nominally in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Format of `samples`.
    pub format: AudioFormat,
    /// Playback length as reported by the decoder.
    pub duration: Duration,
}

impl DecodedClip {
    /// Creates a clip, deriving the duration from the sample count.
    pub fn new(samples: Vec<f32>, format: AudioFormat) -> Self {
        let duration = Duration::from_secs_f64(format.seconds_for(samples.len()));
        Self {
            samples,
            format,
            duration,
        }
    }
}

/// Finished render output.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSentence {
    /// Interleaved output samples.
    pub samples: Vec<f32>,
    /// Format the samples were rendered in.
    pub format: AudioFormat,
    /// Background clip mixed under the speech, if any.
    pub background: Option<String>,
}

impl RenderedSentence {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels.max(1) as usize
    }

    /// Output length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.format.seconds_for(self.samples.len())
    }
}
