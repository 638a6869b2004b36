//! Where clip bytes come from: a loose directory or a packed archive.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use voxcade_archive::archive::{clip_stem, fold_case, is_background_name, CLIP_EXTENSION};
use voxcade_archive::{is_archive, Archive, ArchiveStore};

use crate::error::{RenderError, RenderResult};

/// Clip file name for a word (`<word>.ogg`).
pub fn clip_file_name(word: &str) -> String {
    format!("{}.{}", word, CLIP_EXTENSION)
}

/// A resolvable collection of clips.
#[derive(Debug, Clone)]
pub enum ClipSource {
    /// `*.ogg` files directly under a root directory.
    Directory(PathBuf),
    /// Entries of a loaded archive.
    Archive {
        /// Path the archive was loaded from.
        path: PathBuf,
        /// Shared archive contents.
        archive: Arc<Archive>,
    },
}

impl ClipSource {
    /// Opens `path` as an archive (`.data` extension, through `store`) or as
    /// a clip directory.
    pub fn open(path: impl AsRef<Path>, store: &ArchiveStore) -> RenderResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(RenderError::usage("source", "must not be blank"));
        }
        if is_archive(path) {
            let archive = store.get_archive(path)?;
            return Ok(Self::Archive {
                path: path.to_path_buf(),
                archive,
            });
        }
        Self::directory(path)
    }

    /// Uses `root` as a clip directory. The directory must exist.
    pub fn directory(root: impl AsRef<Path>) -> RenderResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(RenderError::not_found(
                "clip directory",
                root.display().to_string(),
            ));
        }
        Ok(Self::Directory(root.to_path_buf()))
    }

    /// Wraps an already loaded archive.
    pub fn from_archive(path: impl Into<PathBuf>, archive: Arc<Archive>) -> Self {
        Self::Archive {
            path: path.into(),
            archive,
        }
    }

    /// Reads a clip by file name (`hello.ogg`, `BG_10.ogg`, `sub/x.ogg`).
    ///
    /// Returns `Ok(None)` if the clip does not exist.
    pub fn read_clip(&self, file_name: &str) -> RenderResult<Option<Cow<'_, [u8]>>> {
        match self {
            ClipSource::Archive { archive, .. } => {
                Ok(archive.open_entry(file_name).map(Cow::Borrowed))
            }
            ClipSource::Directory(root) => match find_in_directory(root, file_name)? {
                Some(path) => Ok(Some(Cow::Owned(fs::read(&path)?))),
                None => Ok(None),
            },
        }
    }

    /// Returns true if [`ClipSource::read_clip`] would find `file_name`.
    pub fn has_clip(&self, file_name: &str) -> RenderResult<bool> {
        match self {
            ClipSource::Archive { archive, .. } => Ok(archive.contains(file_name)),
            ClipSource::Directory(root) => Ok(find_in_directory(root, file_name)?.is_some()),
        }
    }

    /// Reads the clip for `word`, failing with `NotFound` if it is absent.
    pub fn read_word(&self, word: &str) -> RenderResult<Cow<'_, [u8]>> {
        let file_name = clip_file_name(word);
        self.read_clip(&file_name)?
            .ok_or_else(|| RenderError::not_found("clip", format!("{} in {}", file_name, self)))
    }

    /// Available word names, deduplicated and sorted case-insensitively.
    pub fn list_words(&self) -> RenderResult<Vec<String>> {
        match self {
            ClipSource::Archive { archive, .. } => Ok(archive.list_word_names()),
            ClipSource::Directory(root) => {
                let mut words: Vec<String> = directory_clips(root)?
                    .iter()
                    .filter_map(|name| clip_stem(name))
                    .filter(|stem| !stem.trim().is_empty())
                    .map(str::to_string)
                    .collect();
                words.sort_by_cached_key(|w| fold_case(w));
                Ok(words)
            }
        }
    }

    /// Background bed clip names (`BG_*.ogg`) in scan order.
    ///
    /// Archives report entries in pack order; directories report the files
    /// directly under the root, sorted by file name.
    pub fn background_candidates(&self) -> RenderResult<Vec<String>> {
        match self {
            ClipSource::Archive { archive, .. } => Ok(archive.list_background_candidates()),
            ClipSource::Directory(root) => Ok(directory_clips(root)?
                .into_iter()
                .filter(|name| clip_stem(name).is_some_and(is_background_name))
                .collect()),
        }
    }
}

impl fmt::Display for ClipSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipSource::Directory(root) => write!(f, "directory {}", root.display()),
            ClipSource::Archive { path, .. } => write!(f, "archive {}", path.display()),
        }
    }
}

/// File names of `*.ogg` files directly under `root`, sorted.
fn directory_clips(root: &Path) -> RenderResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if clip_stem(name).is_some() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Resolves `file_name` under `root`, falling back to a case-insensitive
/// match among the root's files.
fn find_in_directory(root: &Path, file_name: &str) -> RenderResult<Option<PathBuf>> {
    if file_name.trim().is_empty() {
        return Ok(None);
    }
    let direct = root.join(file_name);
    if direct.is_file() {
        return Ok(Some(direct));
    }
    if file_name.contains(['/', '\\']) {
        return Ok(None);
    }

    let wanted = fold_case(file_name);
    Ok(directory_clips(root)?
        .into_iter()
        .find(|name| fold_case(name) == wanted)
        .map(|name| root.join(name)))
}
