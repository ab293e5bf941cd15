//! Dataset service — owns the cached sales tables
//!
//! Tables are immutable snapshots. A table is re-read only when the backing
//! file's fingerprint changed; otherwise every request shares the same
//! `Arc<Vec<_>>`. A failing load fails the in-flight request and leaves the
//! previous snapshot untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;

use super::loader::load_table;
use super::models::{OrderLine, ToppingLine};
use crate::utils::{AppError, AppResult};

/// Order lines table file name
pub const DISHES_TABLE: &str = "dishes.csv";
/// Topping lines table file name
pub const TOPPINGS_TABLE: &str = "dishes_toppings.csv";

/// Backing file fingerprint (modification time + length)
///
/// Stat-based change detection; a rewrite that keeps both mtime and length
/// identical is not detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: SystemTime,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> AppResult<Self> {
        let meta = std::fs::metadata(path)
            .map_err(|e| AppError::dataset(format!("failed to stat {}: {e}", path.display())))?;
        let modified = meta
            .modified()
            .map_err(|e| AppError::dataset(format!("failed to stat {}: {e}", path.display())))?;
        Ok(Self {
            modified,
            len: meta.len(),
        })
    }
}

struct CachedTable<T> {
    fingerprint: Fingerprint,
    rows: Arc<Vec<T>>,
}

/// One CSV table with a reload-on-change snapshot cache
pub struct TableCache<T> {
    path: PathBuf,
    slot: RwLock<Option<CachedTable<T>>>,
}

impl<T: DeserializeOwned> TableCache<T> {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            slot: RwLock::new(None),
        }
    }

    /// Current snapshot, reloading only when the backing file changed
    pub fn snapshot(&self) -> AppResult<Arc<Vec<T>>> {
        let fingerprint = Fingerprint::of(&self.path)?;

        {
            let slot = self.slot.read();
            if let Some(cached) = slot.as_ref()
                && cached.fingerprint == fingerprint
            {
                return Ok(cached.rows.clone());
            }
        }

        let mut slot = self.slot.write();
        // Double check: another request may have reloaded while we waited
        if let Some(cached) = slot.as_ref()
            && cached.fingerprint == fingerprint
        {
            return Ok(cached.rows.clone());
        }

        let started = std::time::Instant::now();
        let rows = Arc::new(load_table::<T>(&self.path)?);
        tracing::info!(
            table = %self.path.display(),
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Table loaded"
        );

        *slot = Some(CachedTable {
            fingerprint,
            rows: rows.clone(),
        });
        Ok(rows)
    }
}

/// Dataset service — serves snapshots of the two sales tables
///
/// Nothing is read eagerly; the first request (or health probe) triggers the
/// initial load.
pub struct DatasetService {
    order_lines: TableCache<OrderLine>,
    topping_lines: TableCache<ToppingLine>,
}

impl DatasetService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            order_lines: TableCache::new(data_dir.join(DISHES_TABLE)),
            topping_lines: TableCache::new(data_dir.join(TOPPINGS_TABLE)),
        }
    }

    /// Snapshot of the dish order lines (`dishes.csv`)
    pub fn order_lines(&self) -> AppResult<Arc<Vec<OrderLine>>> {
        self.order_lines.snapshot()
    }

    /// Snapshot of the topping lines (`dishes_toppings.csv`)
    pub fn topping_lines(&self) -> AppResult<Arc<Vec<ToppingLine>>> {
        self.topping_lines.snapshot()
    }
}
