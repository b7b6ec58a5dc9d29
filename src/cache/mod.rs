//! Key/value caches for expensive external results.
//!
//! Entries are read before write and never invalidated by the program.

mod file;
mod memory;
mod sqlite;

pub use file::FileCache;
pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use crate::config::{CacheBackend, Settings};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A string-valued cache.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Look up a key.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous entry.
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Backend name, for logging.
    fn name(&self) -> &'static str;
}

/// Build the transcription cache configured in settings.
pub fn create_cache(settings: &Settings) -> Result<Arc<dyn Cache>> {
    let cache: Arc<dyn Cache> = match settings.cache.backend {
        CacheBackend::File => Arc::new(FileCache::new(settings.transcription_cache_dir())?),
        CacheBackend::Sqlite => Arc::new(SqliteCache::new(&settings.sqlite_path())?),
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
    };
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_memory_cache() {
        let mut settings = Settings::default();
        settings.cache.backend = CacheBackend::Memory;

        let cache = create_cache(&settings).unwrap();
        assert_eq!(cache.name(), "memory");
    }

    #[test]
    fn test_create_file_cache_in_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.cache.backend = CacheBackend::File;
        settings.cache.transcription_dir = dir.path().join("outputs").to_string_lossy().into_owned();

        let cache = create_cache(&settings).unwrap();
        assert_eq!(cache.name(), "file");
        assert!(dir.path().join("outputs").is_dir());
    }
}
