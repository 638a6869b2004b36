//! Background bed selection and mixing.
//!
//! Background clips are named `BG_<seconds>.ogg`. The bed whose encoded
//! duration best matches the sentence is laid from time zero and the speech
//! is summed on top after the voice delay.

use voxcade_archive::archive::{base_name, clip_stem};

use crate::decode::ClipDecoder;
use crate::error::{RenderError, RenderResult};
use crate::format::AudioFormat;
use crate::options::check_timing;
use crate::source::ClipSource;

/// Shortest bed duration considered, in seconds.
pub const MIN_BED_SECONDS: i64 = 4;

/// Longest bed duration considered, in seconds.
pub const MAX_BED_SECONDS: i64 = 40;

/// Result of the mixing stage.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedTrack {
    /// Interleaved output samples.
    pub samples: Vec<f32>,
    /// Speech duration plus voice delay, in seconds.
    pub total_seconds: f64,
    /// Background clip that was mixed in, if any.
    pub background: Option<String>,
}

/// Speech duration plus non-negative voice delay.
///
/// Falls back to [`MIN_BED_SECONDS`] when the sum is not positive.
pub fn total_seconds(speech_len: usize, format: AudioFormat, voice_delay_ms: f64) -> f64 {
    let speech = format.seconds_for(speech_len).max(0.0);
    let total = speech + clamp_delay_ms(voice_delay_ms) / 1000.0;
    if total > 0.0 {
        total
    } else {
        MIN_BED_SECONDS as f64
    }
}

/// Leading-silence sample count for the voice delay.
pub fn delay_samples(format: AudioFormat, voice_delay_ms: f64) -> usize {
    format.samples_for_ms(clamp_delay_ms(voice_delay_ms))
}

fn clamp_delay_ms(voice_delay_ms: f64) -> f64 {
    if voice_delay_ms.is_finite() {
        voice_delay_ms.max(0.0)
    } else {
        0.0
    }
}

/// Bed duration to look for: `ceil(total_seconds)` clamped to `[4, 40]`.
pub fn target_bed_seconds(total_seconds: f64) -> i64 {
    (total_seconds.ceil() as i64).clamp(MIN_BED_SECONDS, MAX_BED_SECONDS)
}

/// Parses the duration encoded in a background clip name (`BG_12.ogg`,
/// `sub/BG_12_rain.ogg`).
pub fn bed_seconds(name: &str) -> Option<i64> {
    let stem = clip_stem(name).unwrap_or_else(|| base_name(name));
    stem.split('_').nth(1)?.trim().parse().ok()
}

/// Picks the background bed for a sentence of `total_seconds`.
///
/// `BG_<target>.ogg` wins if `has_direct` reports it present. Otherwise the
/// candidate whose encoded duration is nearest to `total_seconds` is chosen;
/// ties go to the earliest candidate. Names without a parseable duration are
/// skipped.
pub fn select_background<F>(
    candidates: &[String],
    total_seconds: f64,
    has_direct: F,
) -> RenderResult<Option<String>>
where
    F: FnOnce(&str) -> RenderResult<bool>,
{
    let direct = format!("BG_{}.ogg", target_bed_seconds(total_seconds));
    if has_direct(&direct)? {
        return Ok(Some(direct));
    }

    let mut best: Option<(&String, f64)> = None;
    for candidate in candidates {
        let Some(seconds) = bed_seconds(candidate) else {
            tracing::warn!(candidate = %candidate, "background name does not encode a duration");
            continue;
        };
        let diff = (seconds as f64 - total_seconds).abs();
        if best.map_or(true, |(_, best_diff)| diff < best_diff) {
            best = Some((candidate, diff));
        }
    }
    Ok(best.map(|(name, _)| name.clone()))
}

/// Prepends `delay` samples of silence to `speech`.
fn delay_only(speech: &[f32], delay: usize) -> Vec<f32> {
    let mut output = vec![0.0; delay + speech.len()];
    output[delay..].copy_from_slice(speech);
    output
}

/// Lays `background` from zero and sums `speech` from `delay`, clamping
/// every summed sample to `[-1.0, 1.0]`.
fn overlay(background: &[f32], speech: &[f32], delay: usize) -> Vec<f32> {
    let len = background.len().max(speech.len() + delay);
    let mut output = vec![0.0; len];
    output[..background.len()].copy_from_slice(background);

    for (out, &s) in output[delay..].iter_mut().zip(speech) {
        *out = (*out + s).clamp(-1.0, 1.0);
    }
    output
}

/// Mixes `speech` over a duration-matched background bed from `source`.
///
/// Without a bed (disabled, or none available) the result is the speech
/// after `voice_delay_ms` of silence. A bed whose format differs from the
/// speech is a fatal error. A voice delay above
/// [`MAX_TIMING_MS`](crate::options::MAX_TIMING_MS) is a usage error.
pub fn mix<D: ClipDecoder>(
    source: &ClipSource,
    decoder: &D,
    speech: &[f32],
    format: AudioFormat,
    voice_delay_ms: f64,
    enable_background: bool,
) -> RenderResult<MixedTrack> {
    if !format.is_valid() {
        return Err(RenderError::usage("format", format!("invalid speech format {}", format)));
    }

    check_timing("voice_delay_ms", voice_delay_ms)?;
    let total_seconds = total_seconds(speech.len(), format, voice_delay_ms);
    let delay = delay_samples(format, voice_delay_ms);
    if speech.len().checked_add(delay).is_none() {
        return Err(RenderError::usage("voice_delay_ms", "delayed speech does not fit in memory"));
    }
    let speech_only = |background| MixedTrack {
        samples: delay_only(speech, delay),
        total_seconds,
        background,
    };

    if !enable_background {
        return Ok(speech_only(None));
    }

    let candidates = source.background_candidates()?;
    let selected = select_background(&candidates, total_seconds, |name| source.has_clip(name))?;
    let Some(name) = selected else {
        tracing::debug!(total_seconds, "no background bed available");
        return Ok(speech_only(None));
    };
    let Some(bytes) = source.read_clip(&name)? else {
        return Ok(speech_only(None));
    };

    let bed = decoder.decode(&name, &bytes)?;
    if bed.format != format {
        return Err(RenderError::FormatMismatch {
            clip: name,
            expected: format,
            actual: bed.format,
        });
    }

    tracing::info!(background = %name, total_seconds, "background bed selected");
    Ok(MixedTrack {
        samples: overlay(&bed.samples, speech, delay),
        total_seconds,
        background: Some(name),
    })
}
