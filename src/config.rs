//! Capture configuration
//!
//! The context object that carries sample rate, excitation settings and
//! output preferences into generator and encoder calls. It is loaded from
//! an optional JSON file, then individual fields are overridden from the
//! command line.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};
use crate::signal::{ExcitationSpec, SignalType};
use crate::wav::RoundingPolicy;

/// Default sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Default signal duration, excluding the lead silence (seconds)
pub const DEFAULT_DURATION_SECS: f64 = 2.0;

/// Default playback level (dBFS)
pub const DEFAULT_LEVEL_DBFS: f64 = -6.0;

/// Settings for one capture session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Sample rate of generated and encoded audio
    pub sample_rate: u32,
    pub signal_type: SignalType,
    /// Signal length after the lead silence, in seconds
    pub duration_secs: f64,
    /// Playback level in dBFS
    pub level_dbfs: f64,
    /// Fixed noise seed; entropy when unset
    pub seed: Option<u64>,
    /// Float to 24-bit conversion policy
    pub rounding: RoundingPolicy,
    /// Directory for files written without an explicit path
    pub output_dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            signal_type: SignalType::default(),
            duration_secs: DEFAULT_DURATION_SECS,
            level_dbfs: DEFAULT_LEVEL_DBFS,
            seed: None,
            rounding: RoundingPolicy::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl CaptureConfig {
    /// Load a config file; missing keys take their defaults
    ///
    /// # Errors
    /// * `FileNotFound` - if the file does not exist
    /// * `Serialization` - if the file is not valid JSON
    /// * `Config` / `InvalidSpec` - if a value is out of range
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CaptureError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let config: CaptureConfig = serde_json::from_str(&content)?;
        config.validate()?;

        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check every value
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(CaptureError::Config {
                reason: "output_dir must not be empty".to_string(),
            });
        }
        self.excitation_spec().validate()
    }

    /// Excitation described by this config
    pub fn excitation_spec(&self) -> ExcitationSpec {
        ExcitationSpec {
            signal_type: self.signal_type,
            sample_rate: self.sample_rate,
            duration_secs: self.duration_secs,
            level_dbfs: self.level_dbfs,
            seed: self.seed,
        }
    }
}
