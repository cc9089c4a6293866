use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Key-value store of average speeds keyed by network type.
pub trait SpeedStore: Send + Sync {
    fn has_average_speed(&self, network_type: &str) -> bool;

    /// Stored average, or `0.0` when nothing was recorded for `network_type`.
    fn average_speed(&self, network_type: &str) -> f32;

    fn set_average_speed(&self, network_type: &str, speed: f32) -> Result<()>;

    /// Replace the entry for `network_type` with `fold(previous)` and return
    /// the stored value. Read and write happen under one lock.
    fn update_average_speed(
        &self,
        network_type: &str,
        fold: &mut dyn FnMut(Option<f32>) -> f32,
    ) -> Result<f32>;
}

impl<S: SpeedStore + ?Sized> SpeedStore for std::sync::Arc<S> {
    fn has_average_speed(&self, network_type: &str) -> bool {
        (**self).has_average_speed(network_type)
    }

    fn average_speed(&self, network_type: &str) -> f32 { (**self).average_speed(network_type) }

    fn set_average_speed(&self, network_type: &str, speed: f32) -> Result<()> {
        (**self).set_average_speed(network_type, speed)
    }

    fn update_average_speed(
        &self,
        network_type: &str,
        fold: &mut dyn FnMut(Option<f32>) -> f32,
    ) -> Result<f32> {
        (**self).update_average_speed(network_type, fold)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemorySpeedStore {
    speeds: Mutex<HashMap<String, f32>>,
}

impl MemorySpeedStore {
    pub fn new() -> Self { Self::default() }
}

impl SpeedStore for MemorySpeedStore {
    fn has_average_speed(&self, network_type: &str) -> bool {
        lock(&self.speeds).contains_key(network_type)
    }

    fn average_speed(&self, network_type: &str) -> f32 {
        lock(&self.speeds)
            .get(network_type)
            .copied()
            .unwrap_or(0.0)
    }

    fn set_average_speed(&self, network_type: &str, speed: f32) -> Result<()> {
        lock(&self.speeds).insert(network_type.to_owned(), speed);
        Ok(())
    }

    fn update_average_speed(
        &self,
        network_type: &str,
        fold: &mut dyn FnMut(Option<f32>) -> f32,
    ) -> Result<f32> {
        let mut speeds = lock(&self.speeds);
        let speed = fold(speeds.get(network_type).copied());
        speeds.insert(network_type.to_owned(), speed);
        Ok(speed)
    }
}

/// Store persisted as a JSON object in a single file.
///
/// Every update rewrites the file through a temporary sibling that is then
/// renamed over it, so readers never observe a half-written file. The
/// in-memory copy only changes after the write succeeded.
#[derive(Debug)]
pub struct FileSpeedStore {
    path:   PathBuf,
    speeds: Mutex<BTreeMap<String, f32>>,
}

impl FileSpeedStore {
    /// Load the store at `path`. A missing or empty file opens as an empty
    /// store; the file is created on the first update.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let speeds = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| Error::Malformed {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(Error::Io(e)),
        };

        Ok(Self {
            path,
            speeds: Mutex::new(speeds),
        })
    }

    pub fn path(&self) -> &Path { &self.path }

    fn persist(&self, speeds: &BTreeMap<String, f32>) -> Result<()> {
        let json = serde_json::to_vec_pretty(speeds).map_err(Error::Encode)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staging = NamedTempFile::new_in(dir)?;
        staging.write_all(&json)?;
        staging.as_file().sync_all()?;
        staging.persist(&self.path)?;
        Ok(())
    }
}

impl SpeedStore for FileSpeedStore {
    fn has_average_speed(&self, network_type: &str) -> bool {
        lock(&self.speeds).contains_key(network_type)
    }

    fn average_speed(&self, network_type: &str) -> f32 {
        lock(&self.speeds)
            .get(network_type)
            .copied()
            .unwrap_or(0.0)
    }

    fn set_average_speed(&self, network_type: &str, speed: f32) -> Result<()> {
        let mut speeds = lock(&self.speeds);
        let mut updated = speeds.clone();
        updated.insert(network_type.to_owned(), speed);
        self.persist(&updated)?;
        *speeds = updated;
        Ok(())
    }

    fn update_average_speed(
        &self,
        network_type: &str,
        fold: &mut dyn FnMut(Option<f32>) -> f32,
    ) -> Result<f32> {
        let mut speeds = lock(&self.speeds);
        let speed = fold(speeds.get(network_type).copied());
        let mut updated = speeds.clone();
        updated.insert(network_type.to_owned(), speed);
        self.persist(&updated)?;
        *speeds = updated;
        Ok(speed)
    }
}
