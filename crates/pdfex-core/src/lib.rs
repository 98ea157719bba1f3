//! Core library for PDF content extraction.
//!
//! This crate provides:
//! - PDF document access (text, fonts, embedded images, metadata)
//! - A sequential extraction pipeline producing structured per-page records
//! - Content-hash caching to skip reprocessing of unchanged files
//! - JSON and plain-text result persistence

pub mod cache;
pub mod error;
pub mod extract;
pub mod hash;
pub mod models;
pub mod output;
pub mod pdf;

pub use cache::{CacheEntry, ExtractionCache};
pub use error::{
    DocumentError, ExtractError, PageError, Result, ValidationError, WriteError,
};
pub use extract::Extractor;
pub use models::{
    DocumentMetadata, ExtractConfig, ExtractionResult, ImageInfo, OutputFormat, PageRecord, Totals,
};
pub use output::SavedArtifacts;
pub use pdf::{DocumentReader, PdfDocument, RawImage};
