//! File-backed key-value cache.
//!
//! All keys live in one JSON object on disk. Every write rewrites the file,
//! so the last writer wins.

use crate::error::{CliError, Result};
use pronos_domain::{ArchivedAnalysis, KeyValueCache, PredictionBatch};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key of the most recent prediction batch.
pub const LATEST_PREDICTIONS_KEY: &str = "pronos.latest_predictions";

/// Key of the analysis archive.
pub const ARCHIVE_KEY: &str = "pronos.archive";

/// Cache persisted as a JSON object at `path`.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileCache {
    /// Open the cache at `path`; a missing file is an empty cache.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        debug!("Opened cache {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// Location of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl KeyValueCache for FileCache {
    type Error = CliError;

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// Read and decode a JSON value.
///
/// An entry that no longer decodes is treated as absent.
pub fn read_json<C, T>(cache: &C, key: &str) -> Result<Option<T>>
where
    C: KeyValueCache<Error = CliError>,
    T: DeserializeOwned,
{
    let Some(raw) = cache.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring unreadable cache entry {}: {}", key, e);
            Ok(None)
        }
    }
}

/// Encode and write a JSON value.
pub fn write_json<C, T>(cache: &mut C, key: &str, value: &T) -> Result<()>
where
    C: KeyValueCache<Error = CliError>,
    T: Serialize,
{
    cache.set(key, &serde_json::to_string(value)?)
}

/// Most recently fetched prediction batch.
pub fn latest_predictions<C>(cache: &C) -> Result<Option<PredictionBatch>>
where
    C: KeyValueCache<Error = CliError>,
{
    read_json(cache, LATEST_PREDICTIONS_KEY)
}

/// Archived analyses, newest first.
pub fn load_archive<C>(cache: &C) -> Result<Vec<ArchivedAnalysis>>
where
    C: KeyValueCache<Error = CliError>,
{
    Ok(read_json(cache, ARCHIVE_KEY)?.unwrap_or_default())
}

/// Replace the archive.
pub fn save_archive<C>(cache: &mut C, archive: &[ArchivedAnalysis]) -> Result<()>
where
    C: KeyValueCache<Error = CliError>,
{
    write_json(cache, ARCHIVE_KEY, &archive)
}
