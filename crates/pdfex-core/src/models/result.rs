//! Structured extraction results.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Aggregate extraction result for one document.
///
/// Assembled once per extraction run and immutable afterwards. Serializes
/// losslessly: parsing the JSON artifact back yields a value equal to the
/// in-memory original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Path of the source file as given by the caller.
    pub source_path: String,

    /// Content hash of the source file, also the cache key.
    pub content_hash: String,

    /// When the extraction ran.
    pub timestamp: DateTime<Local>,

    /// Normalized document metadata.
    pub metadata: DocumentMetadata,

    /// Per-page records, ordered by page number.
    pub pages: Vec<PageRecord>,

    /// Word/character/image totals across all pages.
    pub totals: Totals,

    /// Distinct font names used anywhere in the document, sorted.
    pub fonts_used: Vec<String>,

    /// Source file size in megabytes.
    pub file_size_mb: f64,

    /// Wall-clock extraction duration in seconds.
    pub extraction_secs: f64,

    /// False when the document failed to open or any page failed.
    pub success: bool,

    /// Document-level and per-page error messages.
    pub errors: Vec<String>,
}

/// Extraction result for a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page number (1-indexed, strictly increasing within a document).
    pub page_number: u32,

    /// Extracted text, empty when extraction failed.
    pub text: String,

    /// Whitespace-delimited token count of `text`.
    pub word_count: usize,

    /// Character count of `text`, whitespace included.
    pub char_count: usize,

    /// Distinct font names used on this page, sorted. Empty when the
    /// document does not expose font information for the page.
    pub fonts: Vec<String>,

    /// Embedded image descriptors, empty when image extraction is disabled.
    pub images: Vec<ImageInfo>,

    /// Page media box `[x0, y0, x1, y1]` in PDF points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_box: Option<[f32; 4]>,

    /// Set when text extraction failed for this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Descriptor of one embedded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Position of the image within the page's XObject list.
    pub index: usize,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// Image encoding ("jpeg", "raw", ...).
    pub format: String,

    /// Size of the embedded stream in bytes.
    pub size_bytes: usize,
}

/// Document metadata normalized from the PDF Info dictionary.
///
/// A fixed set of known optional keys rather than an untyped map, so
/// downstream consumers have a stable contract. Date values keep the raw
/// PDF form (e.g. `D:20240101120000Z`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_date: Option<String>,

    /// Number of pages in the document.
    pub page_count: u32,
}

/// Aggregated counts across all pages of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub words: usize,
    pub chars: usize,
    pub images: usize,
}

impl DocumentMetadata {
    /// Key-value view of the populated fields, for report rendering.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        let fields: [(&'static str, &Option<String>); 7] = [
            ("title", &self.title),
            ("author", &self.author),
            ("subject", &self.subject),
            ("creator", &self.creator),
            ("producer", &self.producer),
            ("creation_date", &self.creation_date),
            ("mod_date", &self.mod_date),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                out.push((key, v.as_str()));
            }
        }
        out
    }
}
