//! Accumulating 24-bit WAV encoder.

use std::fmt;

use log::{debug, warn};

use super::format::{write_header, WavFormat, BYTES_PER_SAMPLE, HEADER_LEN, MAX_DATA_BYTES};
use super::pcm::{encode_samples, RoundingPolicy};
use crate::engine::SampleBuffer;
use crate::error::{CaptureError, Result};

/// Lifecycle of an [`Encoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    /// Accepting encode calls
    Open,
    /// `finish` produced the file
    Finished,
    /// `cancel` discarded the accumulated data
    Cancelled,
}

impl fmt::Display for EncoderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderState::Open => write!(f, "open"),
            EncoderState::Finished => write!(f, "finished"),
            EncoderState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Builds one 24-bit PCM WAV file from one or more blocks of channel data
///
/// Each `encode` call interleaves its channels frame by frame and converts
/// them to PCM right away, so only the encoded payload is retained.
/// `finish` prepends the header and hands the bytes over; after that (or
/// after `cancel`) the encoder rejects further use.
///
/// # Example
/// ```
/// use impulse_capture::wav::Encoder;
///
/// let mut encoder = Encoder::new(44100, 1)?;
/// encoder.encode(&[[0.5_f32, -0.5]])?;
/// let wav = encoder.finish()?;
/// assert_eq!(wav.len(), 44 + 6);
/// assert_eq!(&wav[44..], &[0xFF, 0xFF, 0x3F, 0x00, 0x00, 0xC0]);
/// # Ok::<(), impulse_capture::CaptureError>(())
/// ```
#[derive(Debug)]
pub struct Encoder {
    format: WavFormat,
    rounding: RoundingPolicy,
    pcm: Vec<u8>,
    frames: u64,
    state: EncoderState,
}

impl Encoder {
    /// Create an encoder using [`RoundingPolicy::Floor`]
    ///
    /// # Errors
    /// * `InvalidFormat` - zero sample rate or channel count
    pub fn new(sample_rate: u32, num_channels: u16) -> Result<Self> {
        Self::with_rounding(sample_rate, num_channels, RoundingPolicy::default())
    }

    /// Create an encoder with an explicit rounding policy
    pub fn with_rounding(
        sample_rate: u32,
        num_channels: u16,
        rounding: RoundingPolicy,
    ) -> Result<Self> {
        let format = WavFormat::new(sample_rate, num_channels)?;
        Ok(Self {
            format,
            rounding,
            pcm: Vec::new(),
            frames: 0,
            state: EncoderState::Open,
        })
    }

    pub fn format(&self) -> WavFormat {
        self.format
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// Frames (samples per channel) accepted so far
    pub fn frames_encoded(&self) -> u64 {
        self.frames
    }

    /// Append one block of channel data
    ///
    /// `channels` must hold exactly one slice per encoder channel, all of
    /// the same length. A rejected call leaves the encoder unchanged.
    ///
    /// # Errors
    /// * `EncoderClosed` - after `finish` or `cancel`
    /// * `ChannelCountMismatch` - wrong number of channel slices
    /// * `ChannelLengthMismatch` - channel slices of different lengths
    /// * `DataTooLarge` - the payload would overflow the RIFF size fields
    pub fn encode<S: AsRef<[f32]>>(&mut self, channels: &[S]) -> Result<()> {
        self.ensure_open()?;

        let expected = self.format.channels as usize;
        if channels.len() != expected {
            return Err(CaptureError::ChannelCountMismatch {
                expected,
                actual: channels.len(),
            });
        }

        let frames = channels[0].as_ref().len();
        for (channel, data) in channels.iter().enumerate().skip(1) {
            let actual = data.as_ref().len();
            if actual != frames {
                return Err(CaptureError::ChannelLengthMismatch {
                    channel,
                    expected: frames,
                    actual,
                });
            }
        }

        let frame_bytes = (expected * BYTES_PER_SAMPLE) as u64;
        let total_bytes = (self.frames + frames as u64).saturating_mul(frame_bytes);
        if total_bytes > MAX_DATA_BYTES {
            return Err(CaptureError::DataTooLarge { bytes: total_bytes });
        }

        if expected == 1 {
            encode_samples(channels[0].as_ref(), self.rounding, &mut self.pcm);
        } else {
            let interleaved: Vec<f32> = (0..frames)
                .flat_map(|i| channels.iter().map(move |ch| ch.as_ref()[i]))
                .collect();
            encode_samples(&interleaved, self.rounding, &mut self.pcm);
        }

        self.frames += frames as u64;
        debug!(
            "Encoded block of {} frames x {} channels ({} frames total)",
            frames, expected, self.frames
        );
        Ok(())
    }

    /// Write the header, hand over the file bytes and close the encoder
    ///
    /// # Errors
    /// * `EncoderClosed` - if already finished or cancelled
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        self.ensure_open()?;

        let pcm = std::mem::take(&mut self.pcm);
        let data_size = pcm.len() as u32;

        let mut wav = Vec::with_capacity(HEADER_LEN + pcm.len());
        write_header(&mut wav, &self.format, data_size)?;
        wav.extend_from_slice(&pcm);

        self.state = EncoderState::Finished;
        debug!(
            "Finished WAV: {} frames, {} data bytes, {} Hz x {} ch",
            self.frames, data_size, self.format.sample_rate, self.format.channels
        );
        Ok(wav)
    }

    /// Discard everything encoded so far without producing output
    ///
    /// Cancelling a closed encoder is a no-op.
    pub fn cancel(&mut self) {
        if self.state == EncoderState::Open {
            if !self.pcm.is_empty() {
                warn!("Discarding {} encoded frames", self.frames);
            }
            self.state = EncoderState::Cancelled;
        }
        self.pcm = Vec::new();
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            EncoderState::Open => Ok(()),
            state => Err(CaptureError::EncoderClosed {
                state: state.to_string(),
            }),
        }
    }
}

/// Encode a single mono buffer into a complete WAV file
pub fn encode_mono(buffer: &SampleBuffer, rounding: RoundingPolicy) -> Result<Vec<u8>> {
    let mut encoder = Encoder::with_rounding(buffer.sample_rate(), 1, rounding)?;
    encoder.encode(&[buffer.samples()])?;
    encoder.finish()
}

// ============================================================================
// Tests
// ============================================================================
