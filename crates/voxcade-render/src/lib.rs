//! VoxCade Sentence Renderer
//!
//! Turns a list of word names into one mixed speech track:
//!
//! - **Assembly** - word clips are decoded, resampled for speed and pitch, and
//!   joined with configurable silence
//! - **Background** - a bed whose `BG_<seconds>` name best matches the
//!   sentence length is laid under the speech
//! - **Reverb** - a three-tap decaying echo tail is appended
//! - **Output** - the result is written as 16-bit PCM WAV
//!
//! Clips come from a [`ClipSource`]: either a directory of `.ogg` files or a
//! packed archive loaded through a shared [`voxcade_archive::ArchiveStore`].
//! Every clip in one render must share the same sample rate and channel
//! count; mismatches are errors and are never resampled away.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use voxcade_archive::ArchiveStore;
//! use voxcade_render::{render_to_file, ClipSource, SentenceOptions, VorbisDecoder};
//!
//! let store = ArchiveStore::new();
//! let source = ClipSource::open("voice.data", &store)?;
//! let options = SentenceOptions::default();
//! render_to_file(&source, &VorbisDecoder::new(), &["hello", "world"], &options, Path::new("out.wav"))?;
//! ```
//!
//! # Crate Structure
//!
//! - [`render()`] - Pipeline entry points (samples, writer, file, memory)
//! - [`source`] - Directory and archive clip sources
//! - [`decode`] - The [`ClipDecoder`] seam and the symphonia-backed decoder
//! - [`resample`] - Linear-interpolation speed and pitch change
//! - [`sentence`] - Word concatenation
//! - [`background`] - Background bed selection and mixing
//! - [`reverb`] - Echo tail
//! - [`text`] - Free text to word list
//! - [`wav`] - 16-bit PCM WAV writer

pub mod background;
pub mod decode;
pub mod error;
pub mod format;
pub mod options;
pub mod render;
pub mod resample;
pub mod reverb;
pub mod sentence;
pub mod source;
pub mod text;
pub mod wav;

// Re-export main types at crate root
pub use decode::ClipDecoder;
#[cfg(feature = "vorbis")]
pub use decode::VorbisDecoder;
pub use error::{RenderError, RenderResult};
pub use format::{AudioFormat, DecodedClip, RenderedSentence};
pub use options::SentenceOptions;
pub use render::{render, render_to_file, render_to_vec, render_to_writer};
pub use source::ClipSource;
pub use text::sentence_from_text;
