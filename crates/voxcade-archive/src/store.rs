//! Shared archive cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::archive::{fold_case, Archive};
use crate::error::{ArchiveError, ArchiveResult};
use crate::format::ARCHIVE_EXTENSION;

/// Returns true if `path` names an archive, judged by its `.data` extension.
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// Loads and parses an archive file without caching.
pub fn load_archive(path: &Path) -> ArchiveResult<Archive> {
    if !path.is_file() {
        return Err(ArchiveError::ArchiveNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|e| ArchiveError::io(path, e))?;
    Archive::parse(path, &bytes)
}

/// Cache of decoded archives keyed by canonical path (case-insensitive).
///
/// Each distinct archive is parsed at most once per store. Entries are never
/// invalidated: an archive changed on disk is only observed by a fresh store.
/// Lookup and insertion happen under one lock, so concurrent callers asking
/// for the same archive share a single parse.
#[derive(Debug, Default)]
pub struct ArchiveStore {
    cache: Mutex<HashMap<String, Arc<Archive>>>,
}

impl ArchiveStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Archive>>> {
        // Cached archives are immutable, so a poisoned map is still consistent.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the archive at `path`, parsing and caching it on first use.
    pub fn get_archive(&self, path: &Path) -> ArchiveResult<Arc<Archive>> {
        if path.as_os_str().is_empty() {
            return Err(ArchiveError::usage("archive_path", "must not be blank"));
        }
        let canonical = canonicalize(path)?;
        let key = cache_key(&canonical);

        let mut cache = self.lock();
        if let Some(archive) = cache.get(&key) {
            return Ok(Arc::clone(archive));
        }

        let archive = Arc::new(load_archive(&canonical)?);
        tracing::info!(
            archive = %canonical.display(),
            entries = archive.len(),
            bytes = archive.total_bytes(),
            "archive loaded"
        );
        cache.insert(key, Arc::clone(&archive));
        Ok(archive)
    }

    /// Returns true if the archive at `path` is already cached.
    pub fn is_cached(&self, path: &Path) -> bool {
        canonicalize(path)
            .map(|canonical| self.lock().contains_key(&cache_key(&canonical)))
            .unwrap_or(false)
    }

    /// Number of cached archives.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn canonicalize(path: &Path) -> ArchiveResult<PathBuf> {
    fs::canonicalize(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ArchiveError::ArchiveNotFound {
            path: path.to_path_buf(),
        },
        _ => ArchiveError::io(path, e),
    })
}

fn cache_key(canonical: &Path) -> String {
    fold_case(&canonical.to_string_lossy())
}
