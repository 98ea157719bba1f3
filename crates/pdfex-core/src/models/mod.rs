//! Data models for extraction results and configuration.

pub mod config;
pub mod result;

pub use config::{ExtractConfig, ExtractionSettings, OutputFormat, OutputSettings};
pub use result::{DocumentMetadata, ExtractionResult, ImageInfo, PageRecord, Totals};
