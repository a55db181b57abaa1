use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::session::DEFAULT_QUALITY;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Conversion configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Encode quality, 1-100.
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: default_quality(),
        }
    }
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

/// Intake configuration
///
/// The limits are advertised to users but only applied when
/// `enforce_limits` is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IntakeConfig {
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default)]
    pub enforce_limits: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_file_bytes: default_max_file_bytes(),
            enforce_limits: false,
        }
    }
}

fn default_max_files() -> usize {
    50
}

fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory downloads are written into.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// File name of the download-all archive.
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            archive_name: default_archive_name(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("converted")
}

fn default_archive_name() -> String {
    crate::output::DEFAULT_ARCHIVE_NAME.to_string()
}
