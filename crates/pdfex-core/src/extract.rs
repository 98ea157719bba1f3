//! Extraction orchestration.
//!
//! Pages are processed strictly sequentially: the document handle is not
//! safe for concurrent page access and page order must be preserved in
//! the output.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::cache::ExtractionCache;
use crate::error::{DocumentError, Result, ValidationError};
use crate::hash;
use crate::models::{DocumentMetadata, ExtractConfig, ExtractionResult, Totals};
use crate::output::{self, SavedArtifacts};
use crate::pdf::{process_page, DocumentReader, PdfDocument};

/// Drives the extraction pipeline for one document at a time.
///
/// The cache is injected explicitly; without one every call reprocesses
/// the file.
pub struct Extractor {
    config: ExtractConfig,
    cache: Option<ExtractionCache>,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Attach a result cache.
    pub fn with_cache(mut self, cache: ExtractionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&ExtractionCache> {
        self.cache.as_ref()
    }

    /// Extract a single document.
    ///
    /// Returns `Err` only for invalid input paths and I/O failures while
    /// hashing. Expected document failures (unparseable, encrypted) come
    /// back as a result with `success == false` and a top-level error;
    /// a single bad page is recorded on that page and extraction
    /// continues.
    pub fn extract(&self, path: &Path) -> Result<ExtractionResult> {
        let started = Instant::now();

        validate_input(path)?;

        let file_size_mb = fs::metadata(path)?.len() as f64 / (1024.0 * 1024.0);
        let content_hash = hash::hash_file(path)?;

        if let Some(result) = self.cached_result(&content_hash) {
            info!("cache hit for {}", path.display());
            return Ok(result);
        }

        info!("processing {} ({:.1} MB)", path.display(), file_size_mb);

        // The document handle lives exactly as long as this scope; all
        // exit paths below release it.
        let document = match PdfDocument::open(path) {
            Ok(document) => document,
            Err(e) => {
                warn!("cannot open {}: {}", path.display(), e);
                return Ok(failure_result(path, content_hash, file_size_mb, started, e));
            }
        };

        let metadata = document.metadata();
        let page_count = document.page_count();
        let enable_images = self.config.extraction.enable_images;

        let mut pages = Vec::with_capacity(page_count as usize);
        let mut errors = Vec::new();
        let mut totals = Totals::default();
        let mut fonts_used = BTreeSet::new();

        for (index, text) in document.page_texts().into_iter().enumerate() {
            let number = index as u32 + 1;
            let fonts = document.page_fonts(number);
            let raw_images = if enable_images {
                document.page_images(number)
            } else {
                Vec::new()
            };
            let media_box = document.media_box(number);

            let record = process_page(number, text, fonts, &raw_images, media_box, enable_images);

            if let Some(error) = &record.error {
                errors.push(format!("page {}: {}", number, error));
            }
            totals.words += record.word_count;
            totals.chars += record.char_count;
            totals.images += record.images.len();
            fonts_used.extend(record.fonts.iter().cloned());
            pages.push(record);

            if number % 10 == 0 {
                debug!("processed {}/{} pages", number, page_count);
            }
        }

        let success = errors.is_empty();
        let extraction_secs = started.elapsed().as_secs_f64();

        info!(
            "completed {} in {:.2}s: {} words, {} images",
            path.display(),
            extraction_secs,
            totals.words,
            totals.images
        );

        Ok(ExtractionResult {
            source_path: path.display().to_string(),
            content_hash,
            timestamp: Local::now(),
            metadata,
            pages,
            totals,
            fonts_used: fonts_used.into_iter().collect(),
            file_size_mb,
            extraction_secs,
            success,
            errors,
        })
    }

    /// Persist a result per the configured output settings.
    ///
    /// A successful JSON write of a successful extraction registers the
    /// artifact in the cache; failed extractions and text-only output are
    /// never cached.
    pub fn save(&mut self, result: &ExtractionResult) -> Result<SavedArtifacts> {
        let artifacts = output::write_result(
            result,
            &self.config.output.output_dir,
            self.config.output.output_format,
            self.config.output.compact_json_threshold_mb,
        )?;

        if result.success {
            if let (Some(cache), Some(json)) = (self.cache.as_mut(), artifacts.json.as_ref()) {
                cache.insert(result.content_hash.clone(), json.clone());
            }
        }

        Ok(artifacts)
    }

    /// Extract and persist in one step.
    pub fn process(&mut self, path: &Path) -> Result<(ExtractionResult, SavedArtifacts)> {
        let result = self.extract(path)?;
        let artifacts = self.save(&result)?;
        Ok((result, artifacts))
    }

    // A hit must reload as a full result; anything unreadable or stale on
    // disk downgrades to a miss.
    fn cached_result(&self, hash: &str) -> Option<ExtractionResult> {
        let entry = self.cache.as_ref()?.get(hash)?;
        let loaded = fs::read_to_string(&entry.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok());
        if loaded.is_none() {
            debug!("cache entry for {} unreadable, reprocessing", hash);
        }
        loaded
    }
}

fn validate_input(path: &Path) -> std::result::Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::NotFound(path.to_path_buf()));
    }
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf {
        return Err(ValidationError::NotPdf(path.to_path_buf()));
    }
    Ok(())
}

fn failure_result(
    path: &Path,
    content_hash: String,
    file_size_mb: f64,
    started: Instant,
    error: DocumentError,
) -> ExtractionResult {
    ExtractionResult {
        source_path: path.display().to_string(),
        content_hash,
        timestamp: Local::now(),
        metadata: DocumentMetadata::default(),
        pages: Vec::new(),
        totals: Totals::default(),
        fonts_used: Vec::new(),
        file_size_mb,
        extraction_secs: started.elapsed().as_secs_f64(),
        success: false,
        errors: vec![error.to_string()],
    }
}
