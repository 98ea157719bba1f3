//! Error types for the pdfex-core library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the pdfex library.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Input validation error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Document-level error (open/parse/decrypt).
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Single-page extraction error.
    #[error("page error: {0}")]
    Page(#[from] PageError),

    /// Output write error.
    #[error("write error: {0}")]
    Write(#[from] WriteError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors rejecting the input before extraction is attempted.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The input file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input file does not carry a .pdf extension.
    #[error("not a PDF file: {}", .0.display())]
    NotPdf(PathBuf),
}

/// Errors opening a document as a whole.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to parse the PDF structure.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and no usable password is available.
    #[error("PDF is encrypted and cannot be opened without a password")]
    Encrypted,

    /// The input is zero bytes long.
    #[error("PDF file is empty")]
    Empty,

    /// The PDF parsed but contains no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors local to a single page.
#[derive(Error, Debug)]
pub enum PageError {
    /// Text extraction failed for this page.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The requested page number does not exist.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors persisting extraction output.
#[derive(Error, Debug)]
pub enum WriteError {
    /// The output directory could not be created.
    #[error("failed to create output directory {}: {}", path.display(), reason)]
    CreateDir { path: PathBuf, reason: String },

    /// An output file could not be written.
    #[error("failed to write {}: {}", path.display(), reason)]
    WriteFile { path: PathBuf, reason: String },
}

/// Result type for the pdfex library.
pub type Result<T> = std::result::Result<T, ExtractError>;
