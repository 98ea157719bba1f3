//! CLI subcommands.

pub mod cache;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use pdfex_core::ExtractConfig;

/// Load the configuration: an explicit path wins, then the default
/// location, then built-in defaults.
pub(crate) fn load_config(path: Option<&str>) -> anyhow::Result<ExtractConfig> {
    match path {
        Some(path) => Ok(ExtractConfig::from_file(Path::new(path))?),
        None => {
            let default = default_config_path();
            if default.exists() {
                Ok(ExtractConfig::from_file(&default)?)
            } else {
                Ok(ExtractConfig::default())
            }
        }
    }
}

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pdfex")
        .join("config.json")
}

/// Where the persistent cache index lives for a given configuration.
pub(crate) fn cache_index_path(config: &ExtractConfig) -> PathBuf {
    config
        .output
        .cache_index
        .clone()
        .unwrap_or_else(|| config.output.output_dir.join(".pdfex_index.json"))
}
