// src/cache/store.rs
// =============================================================================
// File-backed editorial cache.
//
// Layout:
//   <cache_dir>/editorial_1234_A.json
//   <cache_dir>/editorial_gym_102345_B1.json
//
// Reads never fail: a missing, unreadable, corrupt or expired record is a
// miss (and the bad file is removed). Writes go to a temp file first and are
// renamed into place, so a crash mid-write never leaves half a record.
// =============================================================================

use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::CacheRecord;
use crate::error::{EditorialError, Result};
use crate::problem::ProblemIdentifier;

pub struct EditorialCache {
    dir: PathBuf,
    ttl_hours: u64,
}

impl EditorialCache {
    // Opens (and creates if needed) the cache directory
    pub fn open(dir: impl Into<PathBuf>, ttl_hours: u64) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| cache_error("create cache directory", &dir, e))?;

        debug!(dir = %dir.display(), ttl_hours, "cache opened");
        Ok(Self { dir, ttl_hours })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// TTL stamped onto new records
    pub fn ttl_hours(&self) -> u64 {
        self.ttl_hours
    }

    fn record_path(&self, identifier: &ProblemIdentifier) -> PathBuf {
        self.dir.join(format!("{}.json", identifier.cache_key()))
    }

    // Returns the live record for a problem, if any
    pub fn get(&self, identifier: &ProblemIdentifier) -> Option<CacheRecord> {
        let path = self.record_path(identifier);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(problem = %identifier, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable cache record");
                return None;
            }
        };

        let record: CacheRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache record, removing");
                self.discard(identifier);
                return None;
            }
        };

        if record.is_expired(Utc::now()) {
            info!(problem = %identifier, cached_at = %record.cached_at, "cache record expired, removing");
            self.discard(identifier);
            return None;
        }

        info!(problem = %identifier, "cache hit");
        Some(record)
    }

    // Stores a record, replacing any previous one for the same problem
    pub fn set(&self, record: &CacheRecord) -> Result<()> {
        let path = self.record_path(&record.problem);
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| EditorialError::Cache(format!("Failed to serialize cache record: {}", e)))?;

        fs::write(&tmp, json).map_err(|e| cache_error("write", &tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            remove_quietly(&tmp);
            return Err(cache_error("rename into", &path, e));
        }

        debug!(path = %path.display(), "cache record written");
        Ok(())
    }

    // Returns true if a record existed
    pub fn delete(&self, identifier: &ProblemIdentifier) -> Result<bool> {
        let path = self.record_path(identifier);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(cache_error("delete", &path, e)),
        }
    }

    // Deletes a record that must not be served again; failures only get logged
    fn discard(&self, identifier: &ProblemIdentifier) {
        if let Err(e) = self.delete(identifier) {
            warn!(problem = %identifier, error = %e, "could not remove cache record");
        }
    }

    // Removes every record (and stray temp files), returns how many records went
    pub fn clear(&self) -> Result<usize> {
        let entries = fs::read_dir(&self.dir).map_err(|e| cache_error("list", &self.dir, e))?;

        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(|e| cache_error("list", &self.dir, e))?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if name.ends_with(".json") {
                fs::remove_file(&path).map_err(|e| cache_error("delete", &path, e))?;
                removed += 1;
            } else if name.ends_with(".json.tmp") {
                remove_quietly(&path);
            }
        }

        info!(removed, dir = %self.dir.display(), "cache cleared");
        Ok(removed)
    }
}

fn cache_error(action: &str, path: &Path, error: std::io::Error) -> EditorialError {
    EditorialError::Cache(format!("Failed to {} {}: {}", action, path.display(), error))
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        debug!(path = %path.display(), error = %e, "could not remove file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editorial::TutorialFormat;
    use chrono::Duration;
    use tempfile::TempDir;

    fn id(problem: &str) -> ProblemIdentifier {
        ProblemIdentifier::new("1234", problem, false)
    }

    fn record(problem: &str, ttl_hours: u64) -> CacheRecord {
        CacheRecord {
            problem: id(problem),
            tutorial_url: "https://codeforces.com/blog/entry/1".to_string(),
            tutorial_format: TutorialFormat::Html,
            markdown: format!("# 1234{}", problem),
            cached_at: Utc::now(),
            ttl_hours,
        }
    }

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let cache = EditorialCache::open(dir.path(), 24).unwrap();

        assert!(cache.get(&id("A")).is_none());
        cache.set(&record("A", 24)).unwrap();

        let hit = cache.get(&id("A")).unwrap();
        assert_eq!(hit.markdown, "# 1234A");
        assert!(dir.path().join("editorial_1234_A.json").exists());
        assert!(!dir.path().join("editorial_1234_A.json.tmp").exists());
    }

    #[test]
    fn test_open_creates_nested_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let cache = EditorialCache::open(&nested, 1).unwrap();
        assert!(nested.is_dir());
        assert_eq!(cache.dir(), nested.as_path());
    }

    #[test]
    fn test_expired_record_is_removed() {
        let dir = TempDir::new().unwrap();
        let cache = EditorialCache::open(dir.path(), 1).unwrap();

        let mut old = record("A", 1);
        old.cached_at = Utc::now() - Duration::hours(2);
        cache.set(&old).unwrap();

        assert!(cache.get(&id("A")).is_none());
        assert!(!dir.path().join("editorial_1234_A.json").exists());
    }

    #[test]
    fn test_corrupt_record_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = EditorialCache::open(dir.path(), 1).unwrap();
        fs::write(dir.path().join("editorial_1234_A.json"), "{ not json").unwrap();

        assert!(cache.get(&id("A")).is_none());
        assert!(!dir.path().join("editorial_1234_A.json").exists());
    }

    #[test]
    fn test_gym_and_contest_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let cache = EditorialCache::open(dir.path(), 24).unwrap();
        cache.set(&record("A", 24)).unwrap();

        assert!(cache.get(&ProblemIdentifier::new("1234", "A", true)).is_none());
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let cache = EditorialCache::open(dir.path(), 24).unwrap();
        cache.set(&record("A", 24)).unwrap();

        assert!(cache.delete(&id("A")).unwrap());
        assert!(!cache.delete(&id("A")).unwrap());
        assert!(cache.get(&id("A")).is_none());
    }

    #[test]
    fn test_clear_counts_records() {
        let dir = TempDir::new().unwrap();
        let cache = EditorialCache::open(dir.path(), 24).unwrap();
        cache.set(&record("A", 24)).unwrap();
        cache.set(&record("B", 24)).unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.clear().unwrap(), 0);
        assert!(dir.path().join("notes.txt").exists());
    }
}
