//! On-disk snapshot of the most recently fetched feed items.
//!
//! The whole collection is written at once and replaces whatever was cached
//! before. Writes go to a sibling temporary file that is renamed over the
//! cache, so readers only ever see the previous or the new collection.
//!
//! There is no locking: two processes exporting at the same time race, and
//! the last rename wins.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::{Result, RunnelError};
use crate::domain::FeedItem;

pub const CACHE_VERSION: u32 = 1;
const CACHE_FILE_NAME: &str = "cache.json";

pub trait ItemCache {
    /// Replace the cached collection with `items`.
    fn export(&self, items: &[FeedItem]) -> Result<()>;

    /// Load the cached collection.
    ///
    /// Returns `Ok(None)` when nothing has been cached yet (no file, or an
    /// empty one). A file that exists but cannot be decoded is an error.
    fn import(&self) -> Result<Option<Vec<FeedItem>>>;
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    items: &'a [FeedItem],
}

#[derive(Deserialize)]
struct CacheFile {
    version: u32,
    items: Vec<FeedItem>,
}

#[derive(Debug, Clone)]
pub struct FeedCache {
    path: PathBuf,
}

impl FeedCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `<cache dir>/runnel/cache.json`
    pub fn default_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| RunnelError::Other("Could not find cache directory".into()))?;
        Ok(cache_dir.join("runnel").join(CACHE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CACHE_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(path: &Path, source: io::Error) -> RunnelError {
        RunnelError::CacheIo {
            path: path.to_path_buf(),
            source,
        }
    }

    fn write_temp(tmp_path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = fs::File::create(tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl ItemCache for FeedCache {
    fn export(&self, items: &[FeedItem]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
        }

        let bytes = serde_json::to_vec(&CacheFileRef {
            version: CACHE_VERSION,
            items,
        })
        .map_err(|e| RunnelError::Other(format!("Failed to encode cache: {}", e)))?;

        let tmp_path = self.temp_path();
        tracing::debug!(path = ?tmp_path, bytes = bytes.len(), "writing cache to temporary file");

        if let Err(e) = Self::write_temp(&tmp_path, &bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Self::io_error(&tmp_path, e));
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Self::io_error(&self.path, e));
        }

        tracing::info!(path = ?self.path, items = items.len(), "cache exported");
        Ok(())
    }

    fn import(&self) -> Result<Option<Vec<FeedItem>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "no cache file yet");
                return Ok(None);
            }
            Err(e) => return Err(Self::io_error(&self.path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!(path = ?self.path, "cache file is empty");
            return Ok(None);
        }

        let file: CacheFile =
            serde_json::from_slice(&bytes).map_err(|source| RunnelError::CacheDecode {
                path: self.path.clone(),
                source,
            })?;

        if file.version != CACHE_VERSION {
            return Err(RunnelError::CacheVersion {
                path: self.path.clone(),
                found: file.version,
            });
        }

        tracing::debug!(path = ?self.path, items = file.items.len(), "cache imported");
        Ok(Some(file.items))
    }
}
