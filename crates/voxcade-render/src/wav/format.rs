//! WAV file format parameters.

use crate::format::AudioFormat;

/// WAV file format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (always 16).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// 16-bit PCM with the given layout.
    pub fn pcm16(sample_rate: u32, channels: u16) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    pub(crate) fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per sample frame.
    pub(crate) fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}

impl From<AudioFormat> for WavFormat {
    fn from(format: AudioFormat) -> Self {
        Self::pcm16(format.sample_rate, format.channels)
    }
}
