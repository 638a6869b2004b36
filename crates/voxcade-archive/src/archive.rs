//! Decoded archive contents and name lookup.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::ArchiveResult;
use crate::format::EntryReader;

/// Clip file extension, without the dot.
pub const CLIP_EXTENSION: &str = "ogg";

/// Base-name prefix that marks a background bed.
pub const BACKGROUND_PREFIX: &str = "BG_";

/// A single archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Relative path as recorded at pack time.
    pub relative_path: String,
    /// Raw clip bytes.
    pub data: Vec<u8>,
}

/// In-memory archive: entries in pack order plus a case-insensitive index.
///
/// Entries are immutable once loaded. A path that appears twice (ignoring
/// case) keeps its first position and the last payload.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
    index: HashMap<String, usize>,
}

impl Archive {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an archive from `(relative_path, data)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let mut archive = Self::new();
        for (path, data) in entries {
            archive.insert(path.into(), data);
        }
        archive
    }

    /// Parses an archive from its serialized bytes.
    ///
    /// `path` is used only for error context.
    pub fn parse(path: &Path, bytes: &[u8]) -> ArchiveResult<Self> {
        let reader = EntryReader::new(path, bytes)?;
        // Each record takes at least 9 bytes, so a forged count cannot
        // force a huge allocation.
        let capacity = reader.remaining().min(bytes.len() / 9);
        let mut archive = Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        };
        for entry in reader {
            let entry = entry?;
            archive.insert(entry.relative_path.to_string(), entry.data.to_vec());
        }
        Ok(archive)
    }

    fn insert(&mut self, relative_path: String, data: Vec<u8>) {
        let key = fold_case(&relative_path);
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].data = data,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(ArchiveEntry {
                    relative_path,
                    data,
                });
            }
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in pack order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Total payload bytes.
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.data.len() as u64).sum()
    }

    /// Looks up an entry by name.
    ///
    /// Tries an exact case-insensitive key match first, then compares with
    /// `\` normalized to `/`: an entry matches if it equals `name` or ends
    /// with `/name`. The first matching entry in pack order wins.
    pub fn open_entry(&self, name: &str) -> Option<&[u8]> {
        if name.trim().is_empty() {
            return None;
        }

        if let Some(&pos) = self.index.get(&fold_case(name)) {
            return Some(&self.entries[pos].data);
        }

        let wanted = fold_case(&normalize_separators(name));
        let suffix = format!("/{}", wanted);
        self.entries
            .iter()
            .find(|entry| {
                let key = fold_case(&normalize_separators(&entry.relative_path));
                key == wanted || key.ends_with(&suffix)
            })
            .map(|entry| entry.data.as_slice())
    }

    /// Returns true if [`Archive::open_entry`] would find `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.open_entry(name).is_some()
    }

    /// Distinct clip base names, case-insensitively deduplicated and sorted.
    pub fn list_word_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut words = Vec::new();
        for entry in &self.entries {
            let Some(stem) = clip_stem(&entry.relative_path) else {
                continue;
            };
            if stem.trim().is_empty() {
                continue;
            }
            if seen.insert(fold_case(stem)) {
                words.push(stem.to_string());
            }
        }
        words.sort_by_cached_key(|w| fold_case(w));
        words
    }

    /// Relative paths of background beds (`BG_*.ogg`), in pack order.
    pub fn list_background_candidates(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| {
                clip_stem(&entry.relative_path).is_some_and(is_background_name)
            })
            .map(|entry| entry.relative_path.clone())
            .collect()
    }
}

/// Case folding used for every name comparison.
pub fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// Replaces `\` with `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Returns the file name of a `/`- or `\`-separated path.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Returns the base name without `.ogg` if `path` names a clip.
pub fn clip_stem(path: &str) -> Option<&str> {
    let (stem, ext) = base_name(path).rsplit_once('.')?;
    ext.eq_ignore_ascii_case(CLIP_EXTENSION).then_some(stem)
}

/// Returns true if a clip stem names a background bed.
pub fn is_background_name(stem: &str) -> bool {
    stem.len() >= BACKGROUND_PREFIX.len()
        && stem.as_bytes()[..BACKGROUND_PREFIX.len()]
            .eq_ignore_ascii_case(BACKGROUND_PREFIX.as_bytes())
}
