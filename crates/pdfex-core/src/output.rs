//! Result persistence: JSON artifacts and plain-text summaries.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::WriteError;
use crate::models::{ExtractionResult, OutputFormat};

/// Paths of the artifacts written for one result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedArtifacts {
    pub json: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

/// Write the selected artifacts for a result into `output_dir`.
///
/// Filenames derive from the source file stem and the extraction
/// timestamp, so repeated saves of the same result are idempotent while
/// distinct runs never collide. A failure here leaves the in-memory
/// result untouched and retrievable.
pub fn write_result(
    result: &ExtractionResult,
    output_dir: &Path,
    format: OutputFormat,
    compact_threshold_mb: f64,
) -> Result<SavedArtifacts, WriteError> {
    fs::create_dir_all(output_dir).map_err(|e| WriteError::CreateDir {
        path: output_dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let stem = Path::new(&result.source_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();
    let timestamp = result.timestamp.format("%Y%m%d_%H%M%S");

    let mut artifacts = SavedArtifacts::default();

    if format.includes_json() {
        let path = output_dir.join(format!("{}_{}.json", stem, timestamp));

        // Large documents get compact JSON to keep artifacts manageable
        let json = if result.file_size_mb > compact_threshold_mb {
            serde_json::to_string(result)
        } else {
            serde_json::to_string_pretty(result)
        }
        .map_err(|e| WriteError::WriteFile {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        fs::write(&path, json).map_err(|e| WriteError::WriteFile {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        info!("saved {}", path.display());
        artifacts.json = Some(path);
    }

    if format.includes_text() {
        let path = output_dir.join(format!("{}_{}_summary.txt", stem, timestamp));

        fs::write(&path, summary_report(result)).map_err(|e| WriteError::WriteFile {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        info!("saved {}", path.display());
        artifacts.summary = Some(path);
    }

    Ok(artifacts)
}

/// Human-readable rendering of a result, one section per concern and one
/// line per page.
pub fn summary_report(result: &ExtractionResult) -> String {
    let file_name = Path::new(&result.source_path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(&result.source_path);
    let hash_prefix: String = result.content_hash.chars().take(16).collect();

    let mut report = String::new();
    report.push_str("PDF EXTRACTION SUMMARY\n");
    report.push_str(&"=".repeat(50));
    report.push('\n');
    report.push('\n');
    report.push_str(&format!("File: {}\n", file_name));
    report.push_str(&format!("Size: {:.1} MB\n", result.file_size_mb));
    report.push_str(&format!("Hash: {}...\n", hash_prefix));
    report.push_str(&format!("Processed: {}\n", result.timestamp.to_rfc3339()));
    report.push_str(&format!("Time: {:.2} seconds\n", result.extraction_secs));
    report.push_str(&format!(
        "Status: {}\n",
        if result.success { "ok" } else { "failed" }
    ));
    report.push('\n');

    report.push_str("CONTENT STATISTICS\n");
    report.push_str(&"-".repeat(30));
    report.push('\n');
    report.push_str(&format!("Pages: {}\n", result.metadata.page_count));
    report.push_str(&format!("Words: {}\n", result.totals.words));
    report.push_str(&format!("Characters: {}\n", result.totals.chars));
    report.push_str(&format!("Images: {}\n", result.totals.images));
    report.push_str(&format!("Fonts: {}\n", result.fonts_used.len()));

    let metadata = result.metadata.entries();
    if !metadata.is_empty() {
        report.push('\n');
        report.push_str("METADATA\n");
        report.push_str(&"-".repeat(30));
        report.push('\n');
        for (key, value) in metadata {
            report.push_str(&format!("{}: {}\n", key, value));
        }
    }

    if !result.fonts_used.is_empty() && result.fonts_used.len() <= 10 {
        report.push('\n');
        report.push_str("FONTS USED\n");
        report.push_str(&"-".repeat(30));
        report.push('\n');
        for font in &result.fonts_used {
            report.push_str(&format!("  - {}\n", font));
        }
    }

    if !result.pages.is_empty() {
        report.push('\n');
        report.push_str("PAGES\n");
        report.push_str(&"-".repeat(30));
        report.push('\n');
        for page in &result.pages {
            match &page.error {
                Some(error) => report.push_str(&format!(
                    "Page {}: {} words, {} images (error: {})\n",
                    page.page_number,
                    page.word_count,
                    page.images.len(),
                    error
                )),
                None => report.push_str(&format!(
                    "Page {}: {} words, {} images\n",
                    page.page_number,
                    page.word_count,
                    page.images.len()
                )),
            }
        }
    }

    if !result.errors.is_empty() {
        report.push('\n');
        report.push_str("ERRORS\n");
        report.push_str(&"-".repeat(30));
        report.push('\n');
        for error in &result.errors {
            report.push_str(&format!("  - {}\n", error));
        }
    }

    if result.extraction_secs > 0.0 {
        let rate = result.totals.words as f64 / result.extraction_secs;
        report.push('\n');
        report.push_str(&format!("Processing rate: {:.0} words/second\n", rate));
    }

    report
}
