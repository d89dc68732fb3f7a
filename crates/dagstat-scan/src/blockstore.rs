//! Block store views.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jwalk::{Parallelism, WalkDir};

use dagstat_core::{ContentKey, ScanError};

/// File extension of stored blocks.
const BLOCK_EXTENSION: &str = ".data";

/// Lazy, unordered, finite sequence of stored keys.
pub type KeyIter<'a> = Box<dyn Iterator<Item = Result<ContentKey, ScanError>> + 'a>;

/// Read access to a content-addressed block store.
pub trait Blockstore {
    /// Start enumerating every stored key.
    ///
    /// Keys are produced incrementally and in no particular order. The
    /// sequence cannot be restarted; call again for a fresh pass.
    fn all_keys(&self) -> Result<KeyIter<'_>, ScanError>;

    /// Fetch the raw bytes of one block.
    fn get(&self, key: &ContentKey) -> Result<Vec<u8>, ScanError>;
}

/// Flat-file block store: one file per block, sharded by name.
///
/// Block `K` lives at `<root>/<shard>/<hex(K)>.data`, where the shard is
/// the `shard_length` characters before the last character of the name.
#[derive(Debug, Clone)]
pub struct FlatfsBlockstore {
    root: PathBuf,
    shard_length: usize,
}

impl FlatfsBlockstore {
    /// Create a view over a block directory.
    pub fn new(root: impl Into<PathBuf>, shard_length: usize) -> Self {
        Self {
            root: root.into(),
            shard_length,
        }
    }

    /// Block directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path where the block for `key` is stored.
    pub fn block_path(&self, key: &ContentKey) -> PathBuf {
        let name = hex::encode(key.to_bytes());
        let end = name.len().saturating_sub(1);
        let start = end.saturating_sub(self.shard_length);
        self.root
            .join(&name[start..end])
            .join(format!("{name}{BLOCK_EXTENSION}"))
    }

    /// Store a block and return its key. Existing blocks are left alone.
    pub fn put(&self, data: &[u8]) -> Result<ContentKey, ScanError> {
        let key = ContentKey::for_block(data);
        self.put_keyed(key, data)?;
        Ok(key)
    }

    /// Store bytes under an explicit key.
    ///
    /// The key is not checked against the content.
    pub fn put_keyed(&self, key: ContentKey, data: &[u8]) -> Result<(), ScanError> {
        let path = self.block_path(&key);
        if path.exists() {
            return Ok(());
        }
        if let Some(shard) = path.parent() {
            fs::create_dir_all(shard).map_err(|e| ScanError::io(shard, e))?;
        }
        fs::write(&path, data).map_err(|e| ScanError::io(&path, e))
    }

    /// Remove a block, if present.
    pub fn delete(&self, key: &ContentKey) -> Result<(), ScanError> {
        let path = self.block_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ScanError::io(path, err)),
        }
    }
}

impl Blockstore for FlatfsBlockstore {
    fn all_keys(&self) -> Result<KeyIter<'_>, ScanError> {
        if !self.root.is_dir() {
            return Err(ScanError::Enumerate {
                path: self.root.clone(),
                message: "block directory does not exist".to_string(),
            });
        }

        let walker = WalkDir::new(&self.root)
            .parallelism(Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            })
            .skip_hidden(true)
            .follow_links(false);

        let root = self.root.clone();
        let keys = walker.into_iter().filter_map(move |entry_result| {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_else(|| root.clone());
                    return Some(Err(ScanError::Enumerate {
                        path,
                        message: err.to_string(),
                    }));
                }
            };

            if !entry.file_type().is_file() {
                return None;
            }

            let file_name = entry.file_name().to_string_lossy();
            let Some(stem) = file_name.strip_suffix(BLOCK_EXTENSION) else {
                tracing::debug!(path = %entry.path().display(), "skipping non-block file");
                return None;
            };

            match hex::decode(stem)
                .ok()
                .and_then(|bytes| ContentKey::from_bytes(&bytes).ok())
            {
                Some(key) => Some(Ok(key)),
                None => {
                    tracing::warn!(path = %entry.path().display(), "skipping block file with invalid key name");
                    None
                }
            }
        });

        Ok(Box::new(keys))
    }

    fn get(&self, key: &ContentKey) -> Result<Vec<u8>, ScanError> {
        fs::read(self.block_path(key)).map_err(|e| ScanError::fetch(*key, e))
    }
}
