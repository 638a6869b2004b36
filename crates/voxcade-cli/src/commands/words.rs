//! Words command implementation
//!
//! Lists the words a clip directory or archive can speak.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;
use voxcade_archive::ArchiveStore;
use voxcade_render::ClipSource;

/// Run the words command
///
/// # Arguments
/// * `source` - Clip directory or `.data` archive
/// * `json` - Print a JSON array instead of one word per line
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(source: &str, json: bool) -> Result<ExitCode> {
    let words = list(source)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&words)?);
        return Ok(ExitCode::SUCCESS);
    }

    for word in &words {
        println!("{}", word);
    }
    eprintln!(
        "{} {} words in {}",
        "Found".dimmed(),
        words.len().to_string().bold(),
        source
    );

    Ok(ExitCode::SUCCESS)
}

/// Opens `source` and returns its word list.
pub fn list(source: &str) -> Result<Vec<String>> {
    let store = ArchiveStore::new();
    let clips = ClipSource::open(source, &store)
        .with_context(|| format!("Failed to open clip source: {}", source))?;
    let words = clips
        .list_words()
        .with_context(|| format!("Failed to list words in: {}", source))?;
    tracing::debug!(source = %clips, words = words.len(), "words listed");
    Ok(words)
}
