//! Error handling for impulse-capture
//!
//! Every failure is reported synchronously. Nothing is retried and no
//! partial output is ever produced.

use thiserror::Error;

/// Result type alias for impulse-capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Main error type for signal generation, encoding and file handling
#[derive(Error, Debug)]
pub enum CaptureError {
    // Excitation Errors
    #[error("Invalid excitation spec: {reason}")]
    InvalidSpec { reason: String },

    // Encoder Errors
    #[error("Invalid WAV format: {reason}")]
    InvalidFormat { reason: String },

    #[error("Channel count mismatch: expected {expected}, got {actual}")]
    ChannelCountMismatch { expected: usize, actual: usize },

    #[error("Channel length mismatch: channel {channel} has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Encoder is closed ({state})")]
    EncoderClosed { state: String },

    #[error("Encoded data too large for a RIFF container: {bytes} bytes")]
    DataTooLarge { bytes: u64 },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CaptureError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CaptureError::InvalidSpec { .. } => "INVALID_SPEC",
            CaptureError::InvalidFormat { .. } => "INVALID_FORMAT",
            CaptureError::ChannelCountMismatch { .. } => "CHANNEL_COUNT_MISMATCH",
            CaptureError::ChannelLengthMismatch { .. } => "CHANNEL_COUNT_MISMATCH",
            CaptureError::EncoderClosed { .. } => "ENCODER_CLOSED",
            CaptureError::DataTooLarge { .. } => "DATA_TOO_LARGE",
            CaptureError::FileNotFound { .. } => "FILE_NOT_FOUND",
            CaptureError::InvalidAudio { .. } => "INVALID_AUDIO",
            CaptureError::Config { .. } => "CONFIG_ERROR",
            CaptureError::Io(_) => "IO_ERROR",
            CaptureError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller can recover by changing its input
    ///
    /// An operation on a closed encoder is a programming error and is
    /// never recoverable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CaptureError::InvalidSpec { .. } => true,
            CaptureError::InvalidFormat { .. } => true,
            CaptureError::ChannelCountMismatch { .. } => true,
            CaptureError::ChannelLengthMismatch { .. } => true,
            CaptureError::FileNotFound { .. } => true,
            CaptureError::InvalidAudio { .. } => true,
            CaptureError::Config { .. } => true,
            _ => false,
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            CaptureError::InvalidSpec { .. } => vec![
                "Sample rate and signal duration must be greater than zero",
                "Playback level must be at or below 0 dBFS",
                "Supported signal types: sweep, impulse, noise",
            ],
            CaptureError::InvalidFormat { .. } => vec![
                "Sample rate and channel count must be greater than zero",
            ],
            CaptureError::ChannelCountMismatch { .. }
            | CaptureError::ChannelLengthMismatch { .. } => vec![
                "Pass one buffer per encoder channel",
                "All channel buffers of one encode call must have the same length",
            ],
            CaptureError::EncoderClosed { .. } => vec![
                "Create a new encoder for every WAV file",
            ],
            CaptureError::DataTooLarge { .. } => vec![
                "Split the recording into shorter takes",
            ],
            CaptureError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            CaptureError::InvalidAudio { .. } => vec![
                "Raw captures must be little-endian 32-bit float samples",
                "Check if the file plays in another application",
            ],
            CaptureError::Config { .. } => vec![
                "Check the configuration file is valid JSON",
                "Remove the offending key to fall back to its default",
            ],
            _ => vec![],
        }
    }
}
