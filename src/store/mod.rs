//! Durable, append-only record store.
//!
//! Records live in a single whole-file JSON snapshot that is loaded in full
//! before every operation and rewritten in full after every append. The
//! rewrite goes through a temp file and an atomic rename, and appends are
//! serialized behind a lock because load-then-rewrite is not safe under
//! concurrent writers.

mod error;
mod tests;

pub use error::Error;

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// One stored record.
///
/// The id is unique and strictly increasing in creation order. On the wire
/// (persisted snapshot and JSON export alike) the field is named `number`;
/// the rename is deliberate and load-bearing for compatibility with
/// existing consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "number")]
    pub id: u64,
    pub first: String,
    pub last: String,
}

/// A conjunctive query filter over record fields.
///
/// Every set field must match exactly; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub id: Option<u64>,
    pub first: Option<String>,
    pub last: Option<String>,
}

impl Filter {
    pub fn matches(&self, record: &Record) -> bool {
        self.id.map_or(true, |id| record.id == id)
            && self.first.as_deref().map_or(true, |f| record.first == f)
            && self.last.as_deref().map_or(true, |l| record.last == l)
    }
}

/// The file-backed record collection.
pub struct RecordStore {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl RecordStore {
    /// Create a store backed by the snapshot file at `path`.
    ///
    /// The file does not have to exist yet; it is created by the first
    /// append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// The snapshot file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Record>, Error> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Read(e)),
        };
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(Error::Corrupt)
    }

    async fn persist(&self, records: &[Record]) -> Result<(), Error> {
        let json = serde_json::to_vec(records)
            .map_err(|e| Error::Write(std::io::Error::from(e)))?;
        // Write to a sibling temp file first so a failed write never
        // clobbers the existing snapshot.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json).await.map_err(Error::Write)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(Error::Write)?;
        Ok(())
    }

    /// Append a new record and persist the whole snapshot.
    ///
    /// The new record gets the next id: one past the current maximum, or 1
    /// on an empty store. Appends are mutually exclusive; a concurrent
    /// append waits here rather than racing the rewrite.
    pub async fn append(&self, first: &str, last: &str) -> Result<Record, Error> {
        let _guard = self.append_lock.lock().await;

        let mut records = self.load().await?;
        // Ids are strictly increasing, so the last record holds the max.
        let id = records.last().map_or(1, |r| r.id + 1);
        let record = Record {
            id,
            first: first.to_string(),
            last: last.to_string(),
        };
        records.push(record.clone());
        self.persist(&records).await?;

        debug!("appended record {id} ({first} {last})");
        Ok(record)
    }

    /// Return all records matching `filter`, in insertion order.
    ///
    /// A missing or empty snapshot reads as no records. A snapshot that
    /// exists but cannot be decoded surfaces as [`Error::Corrupt`] so
    /// stored data never silently disappears from view.
    pub async fn query(&self, filter: &Filter) -> Result<Vec<Record>, Error> {
        let records = self.load().await?;
        Ok(records
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect())
    }
}
