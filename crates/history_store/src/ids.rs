//! Record id assignment.
//!
//! Ids are Unix milliseconds bumped forward when needed, so two inserts in the
//! same millisecond (or after the wall clock steps back) still get distinct,
//! increasing ids.

use chrono::Utc;

#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Start after `last_issued`, typically the largest id already stored.
    pub fn starting_after(last_issued: u64) -> Self {
        Self { last: last_issued }
    }

    pub fn next_id(&mut self) -> u64 {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(now_ms)
    }

    pub fn next_at(&mut self, now_ms: u64) -> u64 {
        let id = now_ms.max(self.last.saturating_add(1));
        self.last = id;
        id
    }

    pub fn last_issued(&self) -> u64 {
        self.last
    }
}
