//! Render command implementation
//!
//! Resolves the word list, merges sentence options from file and flags, and
//! writes the rendered sentence as a WAV file.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use voxcade_archive::ArchiveStore;
use voxcade_render::{render_to_file, sentence_from_text, ClipSource, SentenceOptions, VorbisDecoder};

use crate::cli_args::RenderArgs;

/// Run the render command
///
/// # Arguments
/// * `args` - Parsed `render` arguments
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(args: &RenderArgs) -> Result<ExitCode> {
    let options = build_options(args)?;

    let store = ArchiveStore::new();
    let source = ClipSource::open(&args.source, &store)
        .with_context(|| format!("Failed to open clip source: {}", args.source))?;
    let words = resolve_words(args, &source)?;
    tracing::info!(source = %source, words = words.len(), output = %args.output, "rendering sentence");

    println!("{} {}", "Rendering:".cyan().bold(), words.join(" "));
    println!("{} {}", "Source:".dimmed(), source);

    let rendered = render_to_file(
        &source,
        &VorbisDecoder::new(),
        &words,
        &options,
        Path::new(&args.output),
    )
    .with_context(|| format!("Failed to render sentence to: {}", args.output))?;

    if let Some(background) = &rendered.background {
        println!("{} {}", "Background:".dimmed(), background);
    }
    println!(
        "{} Wrote {} ({:.2}s, {})",
        "SUCCESS".green().bold(),
        args.output,
        rendered.duration_seconds(),
        rendered.format
    );

    Ok(ExitCode::SUCCESS)
}

/// Loads the options file, if any, and applies the per-field flags on top.
pub fn build_options(args: &RenderArgs) -> Result<SentenceOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file: {}", path))?;
            serde_json::from_str::<SentenceOptions>(&content)
                .with_context(|| format!("Failed to parse options file: {}", path))?
        }
        None => SentenceOptions::default(),
    };

    let overrides = [
        (args.gap, &mut options.gap_ms),
        (args.overlap, &mut options.overlap_ms),
        (args.delay, &mut options.voice_delay_ms),
        (args.speed, &mut options.speed_percent),
        (args.pitch, &mut options.pitch_semitones),
        (args.reverb, &mut options.reverb_level),
    ];
    for (value, field) in overrides {
        if let Some(value) = value {
            *field = value;
        }
    }
    if args.no_background {
        options.enable_background = false;
    }

    options.validate()?;
    tracing::debug!(?options, "sentence options resolved");
    Ok(options)
}

/// Returns the explicit words, or the known words found in `--text`.
fn resolve_words(args: &RenderArgs, source: &ClipSource) -> Result<Vec<String>> {
    let Some(text) = &args.text else {
        return Ok(args.words.clone());
    };

    let available = source
        .list_words()
        .with_context(|| format!("Failed to list words in: {}", source))?;
    let words = sentence_from_text(text, &available);
    tracing::debug!(known = words.len(), available = available.len(), "text resolved to words");
    if words.is_empty() {
        bail!("none of the words in the text have a clip in {}", source);
    }
    Ok(words)
}
