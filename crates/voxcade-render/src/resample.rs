//! Linear-interpolation rate change for speed and pitch.
//!
//! Speed and pitch are applied together as one playback-rate factor: a
//! factor of 2.0 halves the buffer length, 0.5 doubles it.

/// Factors closer than this to 1.0 are treated as identity.
pub const IDENTITY_EPSILON: f64 = 1e-6;

/// Lower bound for the speed factor.
pub const MIN_SPEED_FACTOR: f64 = 0.1;

/// Speed factor for a speed percentage, floored at [`MIN_SPEED_FACTOR`].
pub fn speed_factor(speed_percent: f64) -> f64 {
    (speed_percent / 100.0).max(MIN_SPEED_FACTOR)
}

/// Pitch factor for a semitone shift (`2^(semitones/12)`).
pub fn pitch_factor(pitch_semitones: f64) -> f64 {
    2f64.powf(pitch_semitones / 12.0)
}

/// Combined playback-rate factor for speed and pitch.
///
/// Non-positive or non-finite results fall back to 1.0.
pub fn playback_factor(speed_percent: f64, pitch_semitones: f64) -> f64 {
    let factor = speed_factor(speed_percent) * pitch_factor(pitch_semitones);
    sanitize_factor(factor)
}

fn sanitize_factor(factor: f64) -> f64 {
    if factor.is_finite() && factor > IDENTITY_EPSILON {
        factor
    } else {
        1.0
    }
}

/// Resamples a single-channel buffer by `factor`.
///
/// Output length is `floor(len / factor)`, at least 1. Output sample `i`
/// reads source position `i * factor`, blending the neighbouring samples by
/// the fractional part; reads past the end clamp to the last sample.
pub fn resample(samples: &[f32], factor: f64) -> Vec<f32> {
    resample_interleaved(samples, 1, factor)
}

/// Resamples an interleaved buffer by `factor`, frame by frame.
///
/// Channels are interpolated independently so interleaving is preserved;
/// the output holds `max(1, floor(frames / factor))` frames. A trailing
/// partial frame is dropped.
pub fn resample_interleaved(samples: &[f32], channels: u16, factor: f64) -> Vec<f32> {
    let factor = sanitize_factor(factor);
    if samples.is_empty() || (factor - 1.0).abs() < IDENTITY_EPSILON {
        return samples.to_vec();
    }

    let channels = channels.max(1) as usize;
    let in_frames = samples.len() / channels;
    if in_frames == 0 {
        return Vec::new();
    }

    let out_frames = ((in_frames as f64 / factor) as usize).max(1);
    let last = in_frames - 1;
    let mut output = Vec::with_capacity(out_frames * channels);

    for i in 0..out_frames {
        let src_pos = i as f64 * factor;
        let i0 = (src_pos as usize).min(last);
        let i1 = (i0 + 1).min(last);
        let frac = (src_pos - i0 as f64) as f32;

        for ch in 0..channels {
            let s0 = samples[i0 * channels + ch];
            let s1 = samples[i1 * channels + ch];
            output.push(s0 + (s1 - s0) * frac);
        }
    }

    output
}
