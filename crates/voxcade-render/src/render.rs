//! Main entry point for sentence rendering.
//!
//! Runs the full pipeline: assemble the speech track, lay it over a
//! background bed, add the reverb tail, and hand the samples to a WAV sink.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::background;
use crate::decode::ClipDecoder;
use crate::error::{RenderError, RenderResult};
use crate::format::RenderedSentence;
use crate::options::SentenceOptions;
use crate::reverb;
use crate::sentence::assemble;
use crate::source::ClipSource;
use crate::wav::{write_samples, write_wav_to_vec, WavFormat};

/// Renders `words` to samples in the clips' native format.
///
/// # Arguments
/// * `source` - Where clip bytes are resolved
/// * `decoder` - Clip decoder
/// * `words` - Word names, in speaking order
/// * `options` - Timing, pitch and effect parameters
///
/// # Returns
/// The mixed sentence, or the first error encountered
pub fn render<D: ClipDecoder>(
    source: &ClipSource,
    decoder: &D,
    words: &[impl AsRef<str>],
    options: &SentenceOptions,
) -> RenderResult<RenderedSentence> {
    options.validate()?;
    if words.is_empty() {
        return Err(RenderError::usage("words", "word list is empty"));
    }

    let speech = assemble(source, decoder, words, options)?;
    let mixed = background::mix(
        source,
        decoder,
        &speech.samples,
        speech.format,
        options.voice_delay_ms,
        options.enable_background,
    )?;
    let samples = reverb::apply(mixed.samples, speech.format, options.reverb_level);

    let rendered = RenderedSentence {
        samples,
        format: speech.format,
        background: mixed.background,
    };
    tracing::info!(
        source = %source,
        words = words.len(),
        format = %rendered.format,
        seconds = rendered.duration_seconds(),
        "sentence rendered"
    );
    Ok(rendered)
}

/// Renders `words` and writes the result as 16-bit PCM WAV to `writer`.
///
/// Nothing is written if rendering fails.
pub fn render_to_writer<D, W>(
    source: &ClipSource,
    decoder: &D,
    words: &[impl AsRef<str>],
    options: &SentenceOptions,
    writer: &mut W,
) -> RenderResult<RenderedSentence>
where
    D: ClipDecoder,
    W: Write,
{
    let rendered = render(source, decoder, words, options)?;
    write_samples(writer, &WavFormat::from(rendered.format), &rendered.samples)?;
    Ok(rendered)
}

/// Renders `words` to a WAV file at `output_path`.
///
/// The file (and any missing parent directory) is only created once the
/// render has succeeded, so a failed render leaves no output behind.
pub fn render_to_file<D: ClipDecoder>(
    source: &ClipSource,
    decoder: &D,
    words: &[impl AsRef<str>],
    options: &SentenceOptions,
    output_path: &Path,
) -> RenderResult<RenderedSentence> {
    if output_path.as_os_str().is_empty() {
        return Err(RenderError::usage("output_path", "must not be blank"));
    }

    let rendered = render(source, decoder, words, options)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(output_path)?);
    write_samples(&mut writer, &WavFormat::from(rendered.format), &rendered.samples)?;

    tracing::debug!(path = %output_path.display(), "wrote sentence");
    Ok(rendered)
}

/// Renders `words` to complete WAV file bytes in memory.
pub fn render_to_vec<D: ClipDecoder>(
    source: &ClipSource,
    decoder: &D,
    words: &[impl AsRef<str>],
    options: &SentenceOptions,
) -> RenderResult<Vec<u8>> {
    let rendered = render(source, decoder, words, options)?;
    Ok(write_wav_to_vec(&WavFormat::from(rendered.format), &rendered.samples)?)
}
