//! Directory to archive packing and the inverse unpacking.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::archive::clip_stem;
use crate::error::{ArchiveError, ArchiveResult};
use crate::format::{write_entry, write_header, EntryReader};

/// Progress report for one packed or unpacked entry.
#[derive(Debug, Clone, Copy)]
pub struct EntryProgress<'a> {
    /// Zero-based position of the entry.
    pub index: usize,
    /// Total number of entries.
    pub total: usize,
    /// Relative path inside the archive.
    pub relative_path: &'a str,
    /// Payload size in bytes.
    pub bytes: u64,
    /// Filesystem path read from (pack) or written to (unpack).
    pub file_path: &'a Path,
}

/// Summary of a pack or unpack run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// Number of entries processed.
    pub entries: usize,
    /// Total payload bytes.
    pub bytes: u64,
}

/// Collects every `*.ogg` file under `source_dir`, recursively.
///
/// Returns `(relative_path, absolute_path)` pairs with `/` separators, in
/// file-name order within each directory.
pub fn collect_clips(source_dir: &Path) -> ArchiveResult<Vec<(String, PathBuf)>> {
    let mut clips = Vec::new();
    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source_dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            ArchiveError::io(path, source)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if clip_stem(name).is_none() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .unwrap_or(entry.path());
        clips.push((relative_path_string(relative), entry.path().to_path_buf()));
    }
    Ok(clips)
}

/// Joins path components with `/`.
fn relative_path_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Packs every `*.ogg` file under `source_dir` into `archive_path`.
///
/// Parent directories of `archive_path` are created as needed.
/// `on_entry` is called after each entry is written.
pub fn pack<F>(source_dir: &Path, archive_path: &Path, mut on_entry: F) -> ArchiveResult<PackSummary>
where
    F: FnMut(&EntryProgress<'_>),
{
    if source_dir.as_os_str().is_empty() {
        return Err(ArchiveError::usage("source_dir", "must not be blank"));
    }
    if archive_path.as_os_str().is_empty() {
        return Err(ArchiveError::usage("archive_path", "must not be blank"));
    }
    if !source_dir.is_dir() {
        return Err(ArchiveError::SourceNotFound {
            path: source_dir.to_path_buf(),
        });
    }

    let clips = collect_clips(source_dir)?;
    if clips.is_empty() {
        return Err(ArchiveError::NoClips {
            path: source_dir.to_path_buf(),
        });
    }

    if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
    }

    let file = File::create(archive_path).map_err(|e| ArchiveError::io(archive_path, e))?;
    let mut writer = BufWriter::new(file);
    write_header(&mut writer, clips.len()).map_err(|e| ArchiveError::io(archive_path, e))?;

    let mut summary = PackSummary::default();
    for (index, (relative_path, file_path)) in clips.iter().enumerate() {
        let data = fs::read(file_path).map_err(|e| ArchiveError::io(file_path, e))?;
        write_entry(&mut writer, relative_path, &data)
            .map_err(|e| ArchiveError::io(archive_path, e))?;

        tracing::debug!(entry = %relative_path, bytes = data.len(), "packed");
        summary.entries += 1;
        summary.bytes += data.len() as u64;
        on_entry(&EntryProgress {
            index,
            total: clips.len(),
            relative_path,
            bytes: data.len() as u64,
            file_path,
        });
    }

    writer.flush().map_err(|e| ArchiveError::io(archive_path, e))?;
    tracing::info!(
        archive = %archive_path.display(),
        entries = summary.entries,
        bytes = summary.bytes,
        "archive packed"
    );
    Ok(summary)
}

/// Extracts every entry of `archive_path` into `out_dir`.
///
/// Subdirectories are recreated. The archive is fully validated before any
/// file is written, so a corrupt archive leaves `out_dir` untouched.
pub fn unpack<F>(archive_path: &Path, out_dir: &Path, mut on_entry: F) -> ArchiveResult<PackSummary>
where
    F: FnMut(&EntryProgress<'_>),
{
    if archive_path.as_os_str().is_empty() {
        return Err(ArchiveError::usage("archive_path", "must not be blank"));
    }
    if out_dir.as_os_str().is_empty() {
        return Err(ArchiveError::usage("out_dir", "must not be blank"));
    }
    if !archive_path.is_file() {
        return Err(ArchiveError::ArchiveNotFound {
            path: archive_path.to_path_buf(),
        });
    }

    let bytes = fs::read(archive_path).map_err(|e| ArchiveError::io(archive_path, e))?;
    let entries = EntryReader::new(archive_path, &bytes)?.collect::<ArchiveResult<Vec<_>>>()?;
    for entry in &entries {
        check_relative_path(archive_path, entry.relative_path)?;
    }

    fs::create_dir_all(out_dir).map_err(|e| ArchiveError::io(out_dir, e))?;

    let mut summary = PackSummary::default();
    for (index, entry) in entries.iter().enumerate() {
        let out_path = out_dir.join(entry.relative_path.replace('\\', "/"));
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
        }
        fs::write(&out_path, entry.data).map_err(|e| ArchiveError::io(&out_path, e))?;

        tracing::debug!(entry = %entry.relative_path, out = %out_path.display(), "unpacked");
        summary.entries += 1;
        summary.bytes += entry.data.len() as u64;
        on_entry(&EntryProgress {
            index,
            total: entries.len(),
            relative_path: entry.relative_path,
            bytes: entry.data.len() as u64,
            file_path: &out_path,
        });
    }

    Ok(summary)
}

/// Rejects entry paths that would escape the output directory.
fn check_relative_path(archive_path: &Path, relative_path: &str) -> ArchiveResult<()> {
    let normalized = relative_path.replace('\\', "/");
    let path = Path::new(&normalized);
    let escapes = normalized.is_empty()
        || normalized.starts_with('/')
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ArchiveError::corrupt(
            archive_path,
            format!("entry path '{}' is not a safe relative path", relative_path),
        ));
    }
    Ok(())
}
