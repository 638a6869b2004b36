//! 16-bit PCM WAV output.
//!
//! Rendered sentences are written as a canonical 44-byte RIFF header
//! followed by little-endian samples. No metadata chunks are emitted, so
//! the same render always produces the same bytes.

mod format;
mod writer;

pub use format::WavFormat;
pub use writer::{samples_to_pcm16, wav_header, write_samples, write_wav, write_wav_to_vec};
