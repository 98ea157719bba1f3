//! Extraction result cache keyed by content hash.
//!
//! Process-local, single-writer: either purely in-memory or backed by a
//! JSON index file. Entries point at the JSON artifact of a prior
//! successful extraction; an unreadable entry is treated as a miss by the
//! caller, never as a failure.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Maps a file content hash to the artifact of a prior extraction.
///
/// Entries are replaced, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Content hash of the source file.
    pub hash: String,

    /// Path of the JSON artifact written for that extraction.
    pub path: PathBuf,

    /// When the entry was recorded.
    pub created: DateTime<Local>,
}

/// Content-hash cache for extraction results.
///
/// Constructed explicitly and passed into the orchestrator, so tests can
/// supply an isolated in-memory instance.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    entries: HashMap<String, CacheEntry>,
    index_path: Option<PathBuf>,
}

impl ExtractionCache {
    /// A cache that lives only for the process lifetime.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A cache persisted to a JSON index file.
    ///
    /// An existing index is loaded; a missing or corrupt one starts the
    /// cache empty.
    pub fn with_index(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("cache index {} is corrupt ({}), starting empty", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        debug!("cache index {}: {} entries", path.display(), entries.len());
        Self {
            entries,
            index_path: Some(path),
        }
    }

    /// Look up a prior extraction by content hash.
    pub fn get(&self, hash: &str) -> Option<&CacheEntry> {
        self.entries.get(hash)
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.entries.contains_key(hash)
    }

    /// Record an extraction artifact, replacing any prior entry.
    pub fn insert(&mut self, hash: String, path: PathBuf) {
        let entry = CacheEntry {
            hash: hash.clone(),
            path,
            created: Local::now(),
        };
        self.entries.insert(hash, entry);
        self.persist();
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// All entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index_path(&self) -> Option<&Path> {
        self.index_path.as_deref()
    }

    // Index write failures only cost future cache hits, so they are
    // logged rather than propagated.
    fn persist(&self) {
        let Some(path) = &self.index_path else {
            return;
        };
        match serde_json::to_string_pretty(&self.entries) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    warn!("failed to write cache index {}: {}", path.display(), e);
                }
            }
            Err(e) => warn!("failed to serialize cache index: {}", e),
        }
    }
}
