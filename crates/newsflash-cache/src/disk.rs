//! Disk-backed cache with a total byte bound

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use tokio::{fs, sync::RwLock};
use tracing::{debug, warn};

use crate::{entry::CachedResponse, error::CacheError, Result};

const FILE_EXT: &str = "cache";

/// Disk cache keyed by request URL, bounded to a fixed number of bytes.
///
/// Entries are stored one per file under the cache root. The index is
/// rebuilt from the directory on open, so entries survive restarts. When
/// the total size grows past the bound, least-recently-used entries are
/// evicted until the cache fits again.
pub struct DiskCache {
    root: PathBuf,
    max_bytes: u64,
    state: RwLock<Index>,
}

#[derive(Default)]
struct Index {
    entries: HashMap<String, IndexEntry>,
    clock: u64,
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    size: u64,
    last_access: u64,
}

impl Index {
    fn total_bytes(&self) -> u64 {
        self.entries.values().map(|e| e.size).sum()
    }

    fn touch(&mut self, name: &str) {
        self.clock += 1;
        let clock = self.clock;
        if let Some(entry) = self.entries.get_mut(name) {
            entry.last_access = clock;
        }
    }

    fn least_recent(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(name, _)| name.clone())
    }
}

impl DiskCache {
    /// Open a cache rooted at `root`, rebuilding the index from existing entries
    pub async fn open<P: AsRef<Path>>(root: P, max_bytes: u64) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if root.exists() && !root.is_dir() {
            return Err(CacheError::Storage {
                message: format!("cache root is not a directory: {}", root.display()),
            });
        }
        fs::create_dir_all(&root).await?;

        let mut index = Index::default();
        let mut dir = fs::read_dir(&root).await?;
        while let Some(dir_entry) = dir.next_entry().await? {
            let path = dir_entry.path();
            if !path.extension().map_or(false, |ext| ext == FILE_EXT) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let metadata = dir_entry.metadata().await?;
            index.clock += 1;
            index.entries.insert(
                name.to_string(),
                IndexEntry {
                    size: metadata.len(),
                    last_access: index.clock,
                },
            );
        }

        debug!(
            "Opened disk cache at {} with {} existing entries",
            root.display(),
            index.entries.len()
        );

        Ok(Self {
            root,
            max_bytes,
            state: RwLock::new(index),
        })
    }

    /// Total byte bound for this cache
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Retrieve the entry for `key`; expired entries are dropped on read
    pub async fn get(&self, key: &str) -> Result<Option<CachedResponse>> {
        let name = digest(key);
        let mut state = self.state.write().await;

        if !state.entries.contains_key(&name) {
            return Ok(None);
        }

        let path = self.entry_path(&name);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File vanished underneath the index
                state.entries.remove(&name);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let entry: CachedResponse = serde_json::from_slice(&raw)?;

        if entry.is_expired() {
            state.entries.remove(&name);
            drop(state);
            let _ = fs::remove_file(&path).await;
            return Ok(None);
        }

        state.touch(&name);
        Ok(Some(entry))
    }

    /// Store `response` under `key`, evicting old entries to stay under the bound.
    ///
    /// Entries larger than the bound itself are skipped.
    pub async fn put(&self, key: &str, response: &CachedResponse) -> Result<()> {
        let raw = serde_json::to_vec(response)?;
        let size = raw.len() as u64;

        if size > self.max_bytes {
            warn!(
                "Cache entry of {size} bytes exceeds the {} byte bound, skipping",
                self.max_bytes
            );
            return Ok(());
        }

        let name = digest(key);
        let path = self.entry_path(&name);
        fs::write(&path, raw).await?;

        let mut state = self.state.write().await;
        state.clock += 1;
        let last_access = state.clock;
        state.entries.insert(name, IndexEntry { size, last_access });

        while state.total_bytes() > self.max_bytes {
            let Some(victim) = state.least_recent() else {
                break;
            };
            state.entries.remove(&victim);
            let _ = fs::remove_file(self.entry_path(&victim)).await;
            debug!("Evicted cache entry {victim}");
        }

        Ok(())
    }

    /// Remove the entry for `key`, reporting whether it existed
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let name = digest(key);
        let mut state = self.state.write().await;

        let existed = state.entries.remove(&name).is_some();
        if existed {
            let _ = fs::remove_file(self.entry_path(&name)).await;
        }
        Ok(existed)
    }

    /// Remove every entry
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().await;
        for name in state.entries.keys() {
            let _ = fs::remove_file(self.entry_path(name)).await;
        }
        state.entries.clear();
        Ok(())
    }

    /// Number of entries currently indexed
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Total size of all indexed entries in bytes
    pub async fn size_bytes(&self) -> u64 {
        self.state.read().await.total_bytes()
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{FILE_EXT}"))
    }
}

/// Filesystem-safe digest of a cache key
fn digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}
