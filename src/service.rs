//! Caller-facing facade over the engine and the history.

use common::{PredictionOutcome, PredictionRecord, Result, ShelfLifeTable, ValidationError};
use history_store::{FileStore, HistoryStore, KeyValueStore};
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;

/// Owns the shelf-life table, the history and the clock.
///
/// Single writer: callers that share one across threads wrap it in a mutex.
pub struct ExpiryService<S: KeyValueStore, C: Clock> {
    table: ShelfLifeTable,
    history: HistoryStore<S>,
    clock: C,
}

impl ExpiryService<FileStore, SystemClock> {
    /// File-backed service as described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let table = config.shelf_life_table()?;
        let storage = FileStore::open(&config.storage.dir)?;
        info!(
            "history storage: {} (key {})",
            storage.dir().display(),
            config.storage.history_key
        );
        let history = HistoryStore::load(storage, config.storage.history_key.clone());
        Ok(Self::new(
            table,
            history,
            SystemClock::new(config.clock.timezone),
        ))
    }
}

impl<S: KeyValueStore, C: Clock> ExpiryService<S, C> {
    pub fn new(table: ShelfLifeTable, history: HistoryStore<S>, clock: C) -> Self {
        Self {
            table,
            history,
            clock,
        }
    }

    /// Validate input and compute the expiry verdict as of today.
    /// Nothing is recorded.
    pub fn predict(
        &self,
        product: &str,
        mfg_date: Option<&str>,
    ) -> std::result::Result<PredictionOutcome, ValidationError> {
        prediction_engine::predict(product, mfg_date, &self.table, self.clock.today())
    }

    pub fn record_prediction(&mut self, outcome: PredictionOutcome) -> Result<PredictionRecord> {
        self.history.insert(outcome)
    }

    /// Returns whether a record was removed; unknown ids are not an error.
    pub fn remove_record(&mut self, id: u64) -> Result<bool> {
        self.history.delete(id)
    }

    /// History, newest first.
    pub fn list_records(&self) -> &[PredictionRecord] {
        self.history.all()
    }

    /// Predict and, on success, record in one step.
    pub fn submit(&mut self, product: &str, mfg_date: Option<&str>) -> Result<PredictionRecord> {
        let outcome = self.predict(product, mfg_date)?;
        self.record_prediction(outcome)
    }

    pub fn table(&self) -> &ShelfLifeTable {
        &self.table
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    pub fn into_history(self) -> HistoryStore<S> {
        self.history
    }
}
