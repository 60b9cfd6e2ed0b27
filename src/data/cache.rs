use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::LoadResult;
use super::loader::load_file;
use super::model::PostDataset;

// ---------------------------------------------------------------------------
// Session-scoped load cache
// ---------------------------------------------------------------------------

/// Memoizes loaded datasets by path: a file is parsed once per session and
/// every later request (re-opening it, switching back to it) reuses the
/// parsed copy.  Failed loads are never stored.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<PathBuf, Arc<PostDataset>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical form when the file exists, the path as given otherwise.
    fn key(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    /// Return the cached dataset for `path`, loading it on first request.
    pub fn get_or_load(&mut self, path: &Path) -> LoadResult<Arc<PostDataset>> {
        let key = Self::key(path);
        if let Some(ds) = self.entries.get(&key) {
            log::info!("Using cached dataset for {}", key.display());
            return Ok(Arc::clone(ds));
        }
        let dataset = Arc::new(load_file(path)?);
        log::info!("Loaded {} posts from {}", dataset.len(), key.display());
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the entry for `path` so the next request re-reads the file.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&Self::key(path)).is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn csv_file(rows: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Sentiment,Platform,Country,Hashtags,Hour,Likes,Retweets").unwrap();
        file.write_all(rows.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn second_request_is_served_from_cache() {
        let mut file = csv_file("Positive,Twitter,USA,#a,1,2,3\n");
        let mut cache = LoadCache::new();

        let first = cache.get_or_load(file.path()).unwrap();
        // Growing the file does not matter until the entry is invalidated.
        writeln!(file, "Negative,Twitter,USA,#b,1,2,3").unwrap();
        file.flush().unwrap();
        let second = cache.get_or_load(file.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
        assert_eq!(cache.entries.len(), 1);

        assert!(cache.invalidate(file.path()));
        let third = cache.get_or_load(file.path()).unwrap();
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = LoadCache::new();
        assert!(cache.get_or_load(Path::new("/no/such/posts.csv")).is_err());
        assert!(cache.entries.is_empty());
        assert!(!cache.invalidate(Path::new("/no/such/posts.csv")));
    }
}
