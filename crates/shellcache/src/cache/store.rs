use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::entry::CacheEntry;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// One named generation of cached entries, persisted as `<name>.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Generation {
    entries: HashMap<String, CacheEntry>,
}

/// Shared store of cache generations.
///
/// The in-memory map is authoritative; every write goes through the lock and
/// is persisted to disk before it returns. Concurrent writers to the same key
/// race benignly - entries are idempotent snapshots of the same resource and
/// last writer wins.
pub struct CacheStore {
    dir: PathBuf,
    generations: RwLock<HashMap<String, Generation>>,
}

impl CacheStore {
    /// Open the store at `dir`, loading any generations persisted by a
    /// previous run. Files that fail to parse are skipped, not fatal; they
    /// will be rewritten on the next put or purged on activation.
    pub fn open(dir: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&dir)?;

        let mut generations = HashMap::new();
        for dirent in std::fs::read_dir(&dir)? {
            let path = dirent?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match std::fs::read_to_string(&path)
                .map_err(CacheError::from)
                .and_then(|contents| Ok(serde_json::from_str::<Generation>(&contents)?))
            {
                Ok(generation) => {
                    debug!(
                        generation = name,
                        entries = generation.entries.len(),
                        "loaded cache generation"
                    );
                    generations.insert(name.to_string(), generation);
                }
                Err(e) => {
                    warn!(generation = name, error = %e, "skipping unreadable cache generation");
                }
            }
        }

        Ok(Self {
            dir,
            generations: RwLock::new(generations),
        })
    }

    /// Create the named generation if it does not exist yet.
    pub async fn ensure(&self, name: &str) -> Result<(), CacheError> {
        let mut generations = self.generations.write().await;
        if !generations.contains_key(name) {
            let generation = Generation::default();
            self.persist(name, &generation)?;
            generations.insert(name.to_string(), generation);
        }
        Ok(())
    }

    /// Store a response snapshot under the given generation.
    ///
    /// Only successful snapshots are ever stored; anything else is dropped
    /// here so no strategy can pollute a generation with error responses.
    pub async fn put(&self, name: &str, entry: CacheEntry) -> Result<(), CacheError> {
        if !entry.is_success() {
            debug!(url = %entry.url, status = entry.status, "refusing to cache non-success response");
            return Ok(());
        }

        let mut generations = self.generations.write().await;
        let generation = generations.entry(name.to_string()).or_default();
        generation.entries.insert(entry.url.clone(), entry);
        self.persist(name, generation)
    }

    /// Look up a URL across all generations.
    pub async fn match_url(&self, url: &str) -> Option<CacheEntry> {
        let generations = self.generations.read().await;
        generations
            .values()
            .find_map(|generation| generation.entries.get(url).cloned())
    }

    /// Look up a URL within one generation.
    pub async fn match_in(&self, name: &str, url: &str) -> Option<CacheEntry> {
        let generations = self.generations.read().await;
        generations.get(name)?.entries.get(url).cloned()
    }

    /// Names of all generations currently present.
    pub async fn generation_names(&self) -> Vec<String> {
        let generations = self.generations.read().await;
        let mut names: Vec<String> = generations.keys().cloned().collect();
        names.sort();
        names
    }

    /// Delete a whole generation, returning whether it existed.
    pub async fn delete_generation(&self, name: &str) -> Result<bool, CacheError> {
        let mut generations = self.generations.write().await;
        let existed = generations.remove(name).is_some();

        let path = self.generation_path(name);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(existed)
    }

    /// Number of entries in a generation, if it exists.
    pub async fn entry_count(&self, name: &str) -> Option<usize> {
        let generations = self.generations.read().await;
        generations.get(name).map(|g| g.entries.len())
    }

    /// Snapshot of a generation's entries, sorted by URL.
    pub async fn entries_in(&self, name: &str) -> Vec<CacheEntry> {
        let generations = self.generations.read().await;
        let mut entries: Vec<CacheEntry> = generations
            .get(name)
            .map(|g| g.entries.values().cloned().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.url.cmp(&b.url));
        entries
    }

    fn generation_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    fn persist(&self, name: &str, generation: &Generation) -> Result<(), CacheError> {
        let contents = serde_json::to_string_pretty(generation)?;
        std::fs::write(self.generation_path(name), contents)?;
        Ok(())
    }
}
