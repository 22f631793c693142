//! Driver configuration.
//!
//! Frame range, pacing and output settings. Loaded from TOML and
//! validated before a run starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use physkit_types::constants::{DEFAULT_FRAME_RATE, DEFAULT_MAX_DT};
use physkit_types::{PhysError, PhysResult, Scalar};

/// Configuration for the frame/substep loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// First frame to simulate.
    pub start_frame: u32,

    /// Last frame to simulate (inclusive).
    pub end_frame: u32,

    /// Frames per unit time; `frame_duration = 1 / frame_rate`.
    pub frame_rate: Scalar,

    /// Hard upper bound on a single substep.
    pub max_dt: Scalar,

    /// Write a frame artifact at the end of every frame.
    pub write_to_file: bool,

    /// Directory frame artifacts are written to.
    pub output_dir: PathBuf,

    /// File-name prefix of frame artifacts (`<prefix>_<frame>.<ext>`).
    pub output_prefix: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            start_frame: 0,
            end_frame: 10,
            frame_rate: DEFAULT_FRAME_RATE,
            max_dt: DEFAULT_MAX_DT,
            write_to_file: false,
            output_dir: PathBuf::from("output"),
            output_prefix: "frame".to_string(),
        }
    }
}

impl DriverConfig {
    /// Duration of one frame.
    pub fn frame_duration(&self) -> Scalar {
        1.0 / self.frame_rate
    }

    /// Number of frames in `start_frame..=end_frame`.
    pub fn frame_count(&self) -> u32 {
        self.end_frame.saturating_sub(self.start_frame) + 1
    }

    /// Checks every field for a usable value.
    pub fn validate(&self) -> PhysResult<()> {
        if self.start_frame > self.end_frame {
            return Err(PhysError::Config(format!(
                "start_frame ({}) is after end_frame ({})",
                self.start_frame, self.end_frame
            )));
        }
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(PhysError::Config(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(PhysError::Config(format!(
                "max_dt must be positive, got {}",
                self.max_dt
            )));
        }
        if self.write_to_file && self.output_prefix.is_empty() {
            return Err(PhysError::Config(
                "output_prefix must not be empty when write_to_file is set".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> PhysResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| PhysError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> PhysResult<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Path of the artifact written at the end of `frame`.
    pub fn frame_artifact_path(&self, frame: u32, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{:04}.{}", self.output_prefix, frame, extension))
    }
}
