//! Render parameters.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::resample::playback_factor;

/// Upper bound for every millisecond timing option.
pub const MAX_TIMING_MS: f64 = 60_000.0;

/// Upper bound for the magnitude of the pitch shift, in semitones.
pub const MAX_PITCH_SEMITONES: f64 = 48.0;

/// Rejects a timing value above [`MAX_TIMING_MS`]. Negative values pass;
/// every stage clamps them to zero.
pub(crate) fn check_timing(name: &'static str, ms: f64) -> RenderResult<()> {
    if ms > MAX_TIMING_MS {
        return Err(RenderError::usage(
            name,
            format!("must be at most {} ms, got {}", MAX_TIMING_MS, ms),
        ));
    }
    Ok(())
}

/// Timing, pitch and effect parameters for one render.
///
/// The pipeline applies only the clamping documented on each stage; the
/// [`Default`] values are the editor's starting values and are meant for
/// front ends, not as hidden fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentenceOptions {
    /// Silence between consecutive words, in milliseconds.
    pub gap_ms: f64,
    /// Amount subtracted from the gap; negative values count as zero.
    pub overlap_ms: f64,
    /// Leading silence before speech, relative to the background bed.
    pub voice_delay_ms: f64,
    /// Playback speed in percent (100 = unchanged, floored at 10).
    pub speed_percent: f64,
    /// Pitch shift in semitones.
    pub pitch_semitones: f64,
    /// Reverb amount; `<= 0.01` disables the tail, 24 and above is maximal.
    pub reverb_level: f64,
    /// Whether to mix a background bed under the speech.
    pub enable_background: bool,
}

impl Default for SentenceOptions {
    fn default() -> Self {
        Self {
            gap_ms: 80.0,
            overlap_ms: 0.0,
            voice_delay_ms: 0.0,
            speed_percent: 100.0,
            pitch_semitones: 0.0,
            reverb_level: 0.0,
            enable_background: true,
        }
    }
}

impl SentenceOptions {
    /// Combined speed and pitch playback-rate factor.
    pub fn playback_factor(&self) -> f64 {
        playback_factor(self.speed_percent, self.pitch_semitones)
    }

    /// Effective inter-word silence: `max(0, gap - max(0, overlap))`.
    pub fn effective_gap_ms(&self) -> f64 {
        (self.gap_ms - self.overlap_ms.max(0.0)).max(0.0)
    }

    /// Rejects NaN and infinite values, timings above [`MAX_TIMING_MS`] and
    /// pitch shifts beyond [`MAX_PITCH_SEMITONES`].
    pub fn validate(&self) -> RenderResult<()> {
        let fields = [
            ("gap_ms", self.gap_ms),
            ("overlap_ms", self.overlap_ms),
            ("voice_delay_ms", self.voice_delay_ms),
            ("speed_percent", self.speed_percent),
            ("pitch_semitones", self.pitch_semitones),
            ("reverb_level", self.reverb_level),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(RenderError::usage(name, format!("must be finite, got {}", value)));
            }
        }

        check_timing("gap_ms", self.gap_ms)?;
        check_timing("overlap_ms", self.overlap_ms)?;
        check_timing("voice_delay_ms", self.voice_delay_ms)?;
        if self.pitch_semitones.abs() > MAX_PITCH_SEMITONES {
            return Err(RenderError::usage(
                "pitch_semitones",
                format!(
                    "must be within +/-{} semitones, got {}",
                    MAX_PITCH_SEMITONES, self.pitch_semitones
                ),
            ));
        }
        Ok(())
    }
}
