//! Error types for the archive store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Broad classification of a failure, shared with the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-fixable input problem (blank path, empty clip set).
    Usage,
    /// A required file, directory or entry does not exist.
    NotFound,
    /// Clip formats disagree within one render.
    FormatMismatch,
    /// Archive bytes are malformed or truncated.
    Corruption,
    /// A clip could not be decoded.
    Decode,
    /// Underlying filesystem failure.
    Io,
}

/// Errors that can occur while packing, unpacking or loading archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Invalid argument supplied by the caller.
    #[error("invalid argument '{name}': {message}")]
    Usage {
        /// Argument name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Source directory for packing does not exist.
    #[error("source directory not found: {}", path.display())]
    SourceNotFound {
        /// The missing directory.
        path: PathBuf,
    },

    /// Source directory contains no `.ogg` files.
    #[error("no .ogg files found under {}", path.display())]
    NoClips {
        /// The scanned directory.
        path: PathBuf,
    },

    /// Archive file does not exist.
    #[error("archive not found: {}", path.display())]
    ArchiveNotFound {
        /// The missing archive.
        path: PathBuf,
    },

    /// Archive does not start with the expected magic.
    #[error("{} is not an OGGDATA1 archive (magic mismatch)", path.display())]
    BadMagic {
        /// Archive path.
        path: PathBuf,
    },

    /// Archive structure is malformed or truncated.
    #[error("corrupt archive {}: {message}", path.display())]
    Corrupt {
        /// Archive path.
        path: PathBuf,
        /// Description of the corruption.
        message: String,
    },

    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    /// Creates a usage error.
    pub fn usage(name: &'static str, message: impl Into<String>) -> Self {
        Self::Usage {
            name,
            message: message.into(),
        }
    }

    /// Creates a corruption error.
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            ArchiveError::Usage { .. } => "ARCHIVE_001",
            ArchiveError::SourceNotFound { .. } => "ARCHIVE_002",
            ArchiveError::NoClips { .. } => "ARCHIVE_003",
            ArchiveError::ArchiveNotFound { .. } => "ARCHIVE_004",
            ArchiveError::BadMagic { .. } => "ARCHIVE_005",
            ArchiveError::Corrupt { .. } => "ARCHIVE_006",
            ArchiveError::Io { .. } => "ARCHIVE_007",
        }
    }

    /// Error category for grouping.
    pub fn category(&self) -> &'static str {
        "archive"
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArchiveError::Usage { .. } | ArchiveError::NoClips { .. } => ErrorKind::Usage,
            ArchiveError::SourceNotFound { .. } | ArchiveError::ArchiveNotFound { .. } => {
                ErrorKind::NotFound
            }
            ArchiveError::BadMagic { .. } | ArchiveError::Corrupt { .. } => ErrorKind::Corruption,
            ArchiveError::Io { .. } => ErrorKind::Io,
        }
    }
}
