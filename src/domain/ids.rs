//! Time-based identifiers.
//!
//! Ids are milliseconds since the Unix epoch, bumped past the last issued
//! value so two records created in the same millisecond still differ.

use chrono::Utc;

/// Issues strictly increasing time-based ids
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Start after `last` (the largest id already in use)
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }

    /// Issue the next id
    pub fn next_id(&mut self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = now.max(self.last.saturating_add(1));
        self.last = id;
        id
    }

    /// Make sure future ids are greater than `seen`
    pub fn observe(&mut self, seen: u64) {
        self.last = self.last.max(seen);
    }
}
