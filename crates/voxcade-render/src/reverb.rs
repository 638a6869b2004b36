//! Three-tap decaying echo tail.
//!
//! Each input sample feeds three delayed echoes whose amplitude decays
//! exponentially with the sample's position in the sentence. The output is
//! extended by a tail so late echoes are not cut off.

use crate::format::AudioFormat;

/// Levels at or below this leave the input untouched.
pub const MIN_REVERB_LEVEL: f64 = 0.01;

/// Level at which the effect saturates.
pub const MAX_REVERB_LEVEL: f64 = 24.0;

/// Samples quieter than this do not produce echoes.
const SILENCE_THRESHOLD: f32 = 1e-6;

/// A single echo: delay in seconds and relative weight.
#[derive(Debug, Clone, Copy)]
struct Tap {
    delay_seconds: f64,
    weight: f32,
}

const TAPS: [Tap; 3] = [
    Tap {
        delay_seconds: 0.060,
        weight: 0.8,
    },
    Tap {
        delay_seconds: 0.095,
        weight: 0.6,
    },
    Tap {
        delay_seconds: 0.140,
        weight: 0.5,
    },
];

/// Parameters derived from a reverb level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Wet gain applied to every echo.
    pub wet: f32,
    /// Base of the exponential decay (`decay_base^(2t)`).
    pub decay_base: f32,
    /// Length of the appended tail, in seconds.
    pub tail_seconds: f32,
}

impl ReverbParams {
    /// Derives the parameters for `level`, normalized against
    /// [`MAX_REVERB_LEVEL`] and clamped to `[0, 1]`. The arithmetic is
    /// single precision throughout so tail lengths match f32 renderers.
    pub fn from_level(level: f64) -> Self {
        let norm = (level as f32 / MAX_REVERB_LEVEL as f32).clamp(0.0, 1.0);
        Self {
            wet: 0.1 + 0.5 * norm,
            decay_base: 0.4 + 0.5 * norm,
            tail_seconds: 0.5 + 2.5 * norm,
        }
    }

    /// Tail length in interleaved samples, rounded down to a whole frame.
    pub fn tail_samples(&self, format: AudioFormat) -> usize {
        let raw = (self.tail_seconds as f64 * format.samples_per_second()) as usize;
        format.align_to_frame(raw)
    }
}

/// Returns true if `level` produces any effect.
pub fn is_active(level: f64) -> bool {
    level.is_finite() && level > MIN_REVERB_LEVEL
}

/// Applies the reverb tail to `input`.
///
/// Returns `input` unchanged when the level is at or below
/// [`MIN_REVERB_LEVEL`] or the buffer is empty. Otherwise the output is the
/// input followed by the tail, with every echo-touched sample clamped to
/// `[-1.0, 1.0]`.
pub fn apply(input: Vec<f32>, format: AudioFormat, level: f64) -> Vec<f32> {
    if input.is_empty() || !is_active(level) || !format.is_valid() {
        return input;
    }

    let params = ReverbParams::from_level(level);
    let channels = format.channels as usize;
    let in_len = input.len();
    let out_len = in_len + params.tail_samples(format);

    let delays: Vec<(usize, f32)> = TAPS
        .iter()
        .map(|tap| {
            let frames = (tap.delay_seconds * format.sample_rate as f64) as usize;
            (frames * channels, tap.weight)
        })
        .collect();

    let mut output = Vec::with_capacity(out_len);
    output.extend_from_slice(&input);
    output.resize(out_len, 0.0);

    let samples_per_second = format.samples_per_second();
    let decay_base = params.decay_base as f64;

    for (n, &x) in input.iter().enumerate() {
        if x.abs() < SILENCE_THRESHOLD {
            continue;
        }

        let t = n as f64 / samples_per_second;
        let decay = decay_base.powf(t * 2.0) as f32;
        let amp = params.wet * decay * x;

        for &(delay, weight) in &delays {
            if let Some(slot) = output.get_mut(n + delay) {
                *slot = (*slot + amp * weight).clamp(-1.0, 1.0);
            }
        }
    }

    tracing::debug!(level, tail = out_len - in_len, "reverb applied");
    output
}
