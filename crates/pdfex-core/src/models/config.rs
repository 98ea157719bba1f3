//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the pdfex pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Extraction behavior.
    pub extraction: ExtractionSettings,

    /// Output persistence.
    pub output: OutputSettings,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

/// Settings controlling what is extracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Decode and count embedded images.
    pub enable_images: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            enable_images: true,
        }
    }
}

/// Settings controlling where and how results are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory receiving JSON and summary artifacts.
    pub output_dir: PathBuf,

    /// Which artifacts to write.
    pub output_format: OutputFormat,

    /// Path of the persistent cache index, if any.
    pub cache_index: Option<PathBuf>,

    /// Above this source size the JSON artifact is written compact.
    pub compact_json_threshold_mb: f64,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("extracted_content"),
            output_format: OutputFormat::Json,
            cache_index: None,
            compact_json_threshold_mb: 50.0,
        }
    }
}

/// Output artifact selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Structured JSON result.
    #[default]
    Json,
    /// Plain-text summary report.
    Text,
    /// Both artifacts.
    Both,
}

impl OutputFormat {
    pub fn includes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    pub fn includes_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }
}

impl ExtractConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
