//! WAV container layout for 24-bit PCM.

use std::io::{self, Write};

use crate::error::{CaptureError, Result};

/// Size of the canonical RIFF/WAVE header in bytes
pub const HEADER_LEN: usize = 44;

/// Bytes per encoded sample (24-bit)
pub const BYTES_PER_SAMPLE: usize = 3;

/// Bit depth written to the `fmt ` chunk
pub const BITS_PER_SAMPLE: u16 = 24;

/// Largest payload whose RIFF chunk size (`36 + data`) still fits a u32
pub const MAX_DATA_BYTES: u64 = u32::MAX as u64 - 36;

/// WAV file format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl WavFormat {
    /// Creates and validates a 24-bit format.
    ///
    /// Fails with `InvalidFormat` when either value is zero or when the
    /// derived header fields would not fit their widths.
    pub fn new(sample_rate: u32, channels: u16) -> Result<Self> {
        if sample_rate == 0 {
            return Err(CaptureError::InvalidFormat {
                reason: "sample rate must be greater than zero".to_string(),
            });
        }
        if channels == 0 {
            return Err(CaptureError::InvalidFormat {
                reason: "channel count must be greater than zero".to_string(),
            });
        }

        let block_align = channels as u64 * BYTES_PER_SAMPLE as u64;
        if block_align > u16::MAX as u64 || block_align * sample_rate as u64 > u32::MAX as u64 {
            return Err(CaptureError::InvalidFormat {
                reason: format!(
                    "{} channels at {} Hz overflow the WAV header",
                    channels, sample_rate
                ),
            });
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Creates a mono WAV format.
    pub fn mono(sample_rate: u32) -> Result<Self> {
        Self::new(sample_rate, 1)
    }

    /// Block align (bytes per sample frame).
    pub fn block_align(&self) -> u16 {
        self.channels * BYTES_PER_SAMPLE as u16
    }

    /// Byte rate (bytes per second).
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}

/// Writes the 44-byte header for a payload of `data_size` bytes.
pub fn write_header<W: Write>(writer: &mut W, format: &WavFormat, data_size: u32) -> io::Result<()> {
    let chunk_size = 36 + data_size;

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&chunk_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?; // Chunk size (16 for PCM)
    writer.write_all(&1u16.to_le_bytes())?; // Audio format (1 = PCM)
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;

    Ok(())
}

/// Header fields read back from an encoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Parses the fixed 44-byte canonical header.
    ///
    /// Only the layout this crate writes is understood; files with extra
    /// chunks before `data` return None.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_LEN
            || &bytes[0..4] != b"RIFF"
            || &bytes[8..12] != b"WAVE"
            || &bytes[12..16] != b"fmt "
            || &bytes[36..40] != b"data"
        {
            return None;
        }

        let u16_at = |pos: usize| u16::from_le_bytes([bytes[pos], bytes[pos + 1]]);
        let u32_at = |pos: usize| {
            u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
        };

        Some(Self {
            chunk_size: u32_at(4),
            audio_format: u16_at(20),
            channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            block_align: u16_at(32),
            bits_per_sample: u16_at(34),
            data_size: u32_at(40),
        })
    }
}

/// Returns the PCM payload of a canonical 44-byte-header WAV buffer.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    let header = WavHeader::parse(wav_data)?;
    let end = HEADER_LEN.checked_add(header.data_size as usize)?;
    wav_data.get(HEADER_LEN..end)
}
