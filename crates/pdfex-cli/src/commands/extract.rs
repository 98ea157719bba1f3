//! Extract command - process a single PDF file.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use pdfex_core::{ExtractionCache, Extractor, OutputFormat};

use super::{cache_index_path, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory (default: from config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: CliFormat,

    /// Skip embedded image extraction
    #[arg(long)]
    no_images: bool,

    /// Disable the content-hash cache
    #[arg(long)]
    no_cache: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum CliFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
    /// Both artifacts
    Both,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Text => OutputFormat::Text,
            CliFormat::Both => OutputFormat::Both,
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(dir) = args.output_dir {
        config.output.output_dir = dir;
    }
    config.output.output_format = args.format.into();
    if args.no_images {
        config.extraction.enable_images = false;
    }

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message(format!("Processing {}...", args.input.display()));
    pb.set_position(10);

    let mut extractor = Extractor::new(config.clone());
    if !args.no_cache {
        extractor = extractor.with_cache(ExtractionCache::with_index(cache_index_path(&config)));
    }

    pb.set_position(30);
    let (result, artifacts) = extractor.process(&args.input)?;
    pb.finish_with_message("Done");

    // Both the success flag and every per-page error are shown, so a
    // partial success never reads as a clean run.
    if result.success {
        println!(
            "{} {}: {} pages, {} words, {} images",
            style("✓").green(),
            args.input.display(),
            result.metadata.page_count,
            result.totals.words,
            result.totals.images
        );
    } else {
        println!(
            "{} {}: extraction finished with {} error(s)",
            style("✗").red(),
            args.input.display(),
            result.errors.len()
        );
    }
    for error in &result.errors {
        eprintln!("  {} {}", style("!").yellow(), error);
    }

    if let Some(path) = &artifacts.json {
        println!("  JSON: {}", path.display());
    }
    if let Some(path) = &artifacts.summary {
        println!("  Summary: {}", path.display());
    }

    debug!("total processing time: {:?}", start.elapsed());

    if !result.success {
        anyhow::bail!("extraction of {} was not fully successful", args.input.display());
    }

    Ok(())
}
