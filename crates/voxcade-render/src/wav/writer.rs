//! Header layout and PCM conversion.

use std::io::{self, Write};

use super::format::WavFormat;

/// Size of the RIFF/fmt/data header.
pub const HEADER_LEN: usize = 44;

/// Builds the 44-byte header for `data_size` bytes of PCM.
pub fn wav_header(format: &WavFormat, data_size: u32) -> [u8; HEADER_LEN] {
    // RIFF size excludes the 8-byte RIFF chunk header.
    let file_size = 36u32.saturating_add(data_size);

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&file_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&format.channels.to_le_bytes());
    header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&format.bits_per_sample.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());
    header
}

/// Writes a complete WAV file from raw PCM bytes.
///
/// Fails with `InvalidInput` if the data does not fit a RIFF chunk.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = u32::try_from(pcm_data.len())
        .ok()
        .filter(|size| *size <= u32::MAX - 36)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} bytes of PCM exceed the WAV size limit", pcm_data.len()),
            )
        })?;

    writer.write_all(&wav_header(format, data_size))?;
    writer.write_all(pcm_data)?;
    writer.flush()
}

/// Converts float samples and writes them as a WAV file.
pub fn write_samples<W: Write>(writer: &mut W, format: &WavFormat, samples: &[f32]) -> io::Result<()> {
    write_wav(writer, format, &samples_to_pcm16(samples))
}

/// Builds a complete WAV file in memory.
pub fn write_wav_to_vec(format: &WavFormat, samples: &[f32]) -> io::Result<Vec<u8>> {
    let pcm = samples_to_pcm16(samples);
    let mut buffer = Vec::with_capacity(HEADER_LEN + pcm.len());
    write_wav(&mut buffer, format, &pcm)?;
    Ok(buffer)
}

/// Converts f32 samples to 16-bit little-endian PCM bytes.
///
/// Samples are clipped to [-1, 1] and scaled by 32767 with rounding.
pub fn samples_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);

    for &sample in samples {
        let clipped = sample.clamp(-1.0, 1.0);
        let pcm_value = (clipped * 32767.0).round() as i16;
        pcm.extend_from_slice(&pcm_value.to_le_bytes());
    }

    pcm
}
