//! Flat-file cache: one file per key in a directory.

use super::Cache;
use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Cache storing each entry as `{dir}/{key}`.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open a cache rooted at `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(RecipeError::InvalidInput(format!("Invalid cache key: {:?}", key)));
        }
        Ok(self.dir.join(key))
    }
}

#[async_trait]
impl Cache for FileCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // Written to a temp file in the same directory, then renamed into place.
    #[instrument(skip(self, value))]
    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path)
            .map_err(|e| RecipeError::Cache(format!("Failed to write {:?}: {}", path, e)))?;

        debug!("Cached {} bytes at {:?}", value.len(), path);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
