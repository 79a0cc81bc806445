//! The prediction history.
//!
//! Every mutation rewrites the full serialized collection before returning.
//! If that write fails the in-memory change is undone, so the collection in
//! memory always matches what a restart would load.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use common::{PredictionOutcome, PredictionRecord, Result};
use tracing::{debug, info, warn};

use crate::ids::IdGenerator;
use crate::storage::KeyValueStore;

pub const DEFAULT_HISTORY_KEY: &str = "expiryHistory";

/// History handle for hosts that share the store between threads.
/// Hold the lock for the whole operation.
pub type SharedHistory<S> = Arc<Mutex<HistoryStore<S>>>;

pub fn new_shared_history<S: KeyValueStore>(store: HistoryStore<S>) -> SharedHistory<S> {
    Arc::new(Mutex::new(store))
}

pub struct HistoryStore<S: KeyValueStore> {
    storage: S,
    key: String,
    records: Vec<PredictionRecord>,
    ids: IdGenerator,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Load the history stored under `key`.
    ///
    /// Never fails: a missing key, a read error or unparseable content all
    /// yield an empty history.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<PredictionRecord>>(&raw) {
                Ok(records) => dedupe_ids(records),
                Err(e) => {
                    warn!("history {}: unreadable content, starting empty: {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("history {}: load failed, starting empty: {}", key, e);
                Vec::new()
            }
        };

        let high_water = load_high_water(&storage, &key);
        let last_id = records
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(0)
            .max(high_water);
        info!("history {}: loaded {} records", key, records.len());

        Self {
            storage,
            key,
            records,
            ids: IdGenerator::starting_after(last_id),
        }
    }

    /// Record a prediction as the newest entry and persist.
    pub fn insert(&mut self, outcome: PredictionOutcome) -> Result<PredictionRecord> {
        let id = self.ids.next_id();
        // Ids are never reissued, even once the record holding them is deleted.
        self.storage.set(&high_water_key(&self.key), &id.to_string())?;
        let record = PredictionRecord::from_outcome(id, outcome);
        self.records.insert(0, record.clone());

        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }

        info!(
            "history {}: recorded #{} {} expires {} ({})",
            self.key,
            record.id,
            record.product,
            record.expiry_date,
            record.status_label()
        );
        Ok(record)
    }

    /// Remove the record with `id` and persist.
    ///
    /// An unknown id leaves the records untouched and is not an error.
    /// Returns whether a record was removed.
    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let position = self.records.iter().position(|r| r.id == id);
        let removed = position.map(|idx| (idx, self.records.remove(idx)));

        if let Err(e) = self.persist() {
            if let Some((idx, record)) = removed {
                self.records.insert(idx, record);
            }
            return Err(e);
        }

        match &removed {
            Some((_, record)) => info!("history {}: deleted #{} {}", self.key, id, record.product),
            None => debug!("history {}: delete #{} matched nothing", self.key, id),
        }
        Ok(removed.is_some())
    }

    /// Records, newest first.
    pub fn all(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&PredictionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, handing back the backend (e.g. to simulate a restart).
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> Result<()> {
        let data = serde_json::to_string(&self.records)?;
        self.storage.set(&self.key, &data)
    }
}

/// Storage key holding the largest id ever issued for `key`.
pub fn high_water_key(key: &str) -> String {
    format!("{key}_lastId")
}

fn load_high_water<S: KeyValueStore>(storage: &S, key: &str) -> u64 {
    let hw_key = high_water_key(key);
    match storage.get(&hw_key) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("history {}: ignoring unreadable {}: {}", key, hw_key, e);
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            warn!("history {}: could not read {}: {}", key, hw_key, e);
            0
        }
    }
}

/// Keep the first (newest) occurrence of each id.
fn dedupe_ids(records: Vec<PredictionRecord>) -> Vec<PredictionRecord> {
    let mut seen = HashSet::new();
    let before = records.len();
    let kept: Vec<PredictionRecord> = records.into_iter().filter(|r| seen.insert(r.id)).collect();
    if kept.len() != before {
        warn!("history: dropped {} records with duplicate ids", before - kept.len());
    }
    kept
}
