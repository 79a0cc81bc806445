//! Persistent, newest-first history of expiry predictions.

pub mod ids;
pub mod storage;
pub mod store;

pub use ids::IdGenerator;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{new_shared_history, HistoryStore, SharedHistory, DEFAULT_HISTORY_KEY};
