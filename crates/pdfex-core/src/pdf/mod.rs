//! PDF document access.

mod document;
mod page;

pub use document::{PdfDocument, RawImage};
pub use page::process_page;

use crate::error::PageError;
use crate::models::DocumentMetadata;

/// Result type for page-level PDF operations.
pub type Result<T> = std::result::Result<T, PageError>;

/// Trait for PDF document readers.
///
/// Page-level text extraction is the only fallible operation; font and
/// image introspection degrade to empty results, which is not an error.
pub trait DocumentReader {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Normalized document metadata.
    fn metadata(&self) -> DocumentMetadata;

    /// Text of every page, in page order. One entry per page; a failed
    /// page yields an `Err` entry without affecting its neighbors.
    fn page_texts(&self) -> Vec<Result<String>>;

    /// Distinct font names used on a page.
    fn page_fonts(&self, page: u32) -> Vec<String>;

    /// Embedded image streams of a page.
    fn page_images(&self, page: u32) -> Vec<RawImage>;

    /// Media box of a page, if present.
    fn media_box(&self, page: u32) -> Option<[f32; 4]>;
}
