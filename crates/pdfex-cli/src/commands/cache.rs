//! Cache command - inspect or clear the extraction cache index.

use clap::{Args, Subcommand};
use console::style;

use pdfex_core::ExtractionCache;

use super::{cache_index_path, load_config};

/// Arguments for the cache command.
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    command: CacheCommand,
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Show cached entries
    Show,

    /// Remove all cached entries
    Clear,
}

pub async fn run(args: CacheArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let index_path = cache_index_path(&config);

    match args.command {
        CacheCommand::Show => {
            let cache = ExtractionCache::with_index(index_path.clone());

            println!("Cache index: {}", index_path.display());
            if cache.is_empty() {
                println!("No cached extractions.");
                return Ok(());
            }

            println!("{} cached extraction(s):", cache.len());
            for entry in cache.entries() {
                let hash_prefix: String = entry.hash.chars().take(16).collect();
                println!("  {}...  {}", hash_prefix, entry.path.display());
            }
            Ok(())
        }
        CacheCommand::Clear => {
            let mut cache = ExtractionCache::with_index(index_path);
            let count = cache.len();
            cache.clear();

            println!(
                "{} Removed {} cached extraction(s)",
                style("✓").green(),
                count
            );
            Ok(())
        }
    }
}
