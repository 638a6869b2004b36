//! VoxCade Clip Archive
//!
//! Packs a directory of `.ogg` word clips into a single random-access
//! `OGGDATA1` container and reads it back.
//!
//! # Crate Structure
//!
//! - [`format`] - Binary layout (magic, counts, length-prefixed records)
//! - [`archive`] - In-memory [`Archive`] with case-insensitive lookup
//! - [`pack`] - [`pack()`](pack::pack) / [`unpack()`](pack::unpack) between directories and archives
//! - [`store`] - [`ArchiveStore`], the shared decode-once cache
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use voxcade_archive::{pack, ArchiveStore};
//!
//! pack::pack(Path::new("clips"), Path::new("voice.data"), |_| {})?;
//!
//! let store = ArchiveStore::new();
//! let archive = store.get_archive(Path::new("voice.data"))?;
//! let bytes = archive.open_entry("hello.ogg");
//! ```

pub mod archive;
pub mod error;
pub mod format;
pub mod pack;
pub mod store;

pub use archive::{Archive, ArchiveEntry};
pub use error::{ArchiveError, ArchiveResult, ErrorKind};
pub use pack::{EntryProgress, PackSummary};
pub use store::{is_archive, load_archive, ArchiveStore};
