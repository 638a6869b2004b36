//! Error types for the render pipeline.

use std::io;

use thiserror::Error;
use voxcade_archive::{ArchiveError, ErrorKind};

use crate::format::AudioFormat;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering a sentence.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Caller-fixable input problem.
    #[error("invalid argument '{name}': {message}")]
    Usage {
        /// Argument name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A required clip, directory or file does not exist.
    #[error("{what} not found: {name}")]
    NotFound {
        /// What was looked for ("clip", "clip directory", ...).
        what: &'static str,
        /// Name or path that could not be resolved.
        name: String,
    },

    /// A clip's format disagrees with the format established by the render.
    #[error("format mismatch for '{clip}': expected {expected}, found {actual}")]
    FormatMismatch {
        /// Offending clip.
        clip: String,
        /// Format of the sentence so far.
        expected: AudioFormat,
        /// Format of the clip.
        actual: AudioFormat,
    },

    /// A clip could not be decoded.
    #[error("failed to decode clip '{clip}': {message}")]
    Decode {
        /// Clip name.
        clip: String,
        /// Decoder message.
        message: String,
    },

    /// Archive failure while resolving clips.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RenderError {
    /// Creates a usage error.
    pub fn usage(name: &'static str, message: impl Into<String>) -> Self {
        Self::Usage {
            name,
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(clip: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            clip: clip.into(),
            message: message.into(),
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::Usage { .. } => "RENDER_001",
            RenderError::NotFound { .. } => "RENDER_002",
            RenderError::FormatMismatch { .. } => "RENDER_003",
            RenderError::Decode { .. } => "RENDER_004",
            RenderError::Archive(inner) => inner.code(),
            RenderError::Io(_) => "RENDER_005",
        }
    }

    /// Error category for grouping.
    pub fn category(&self) -> &'static str {
        match self {
            RenderError::Archive(inner) => inner.category(),
            _ => "render",
        }
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::Usage { .. } => ErrorKind::Usage,
            RenderError::NotFound { .. } => ErrorKind::NotFound,
            RenderError::FormatMismatch { .. } => ErrorKind::FormatMismatch,
            RenderError::Decode { .. } => ErrorKind::Decode,
            RenderError::Archive(inner) => inner.kind(),
            RenderError::Io(_) => ErrorKind::Io,
        }
    }
}
