use mirage_shared::{InputBatch, KeyTable, Timestamp};

/// Tracks the configured key table and accumulates pressed-state samples
/// between flushes
pub(crate) struct InputTracker {
    keys: KeyTable,
    pending: InputBatch,
}

impl InputTracker {
    pub fn new() -> Self {
        Self {
            keys: KeyTable::new(),
            pending: InputBatch::default(),
        }
    }

    pub fn keys_mut(&mut self) -> &mut KeyTable {
        &mut self.keys
    }

    /// Record a pressed-state change for a configured key. Keys that were
    /// never declared are ignored.
    pub fn set_key(&mut self, code: &str, pressed: bool) {
        if let Some(slot) = self.keys.get_mut(code) {
            *slot = pressed;
        }
    }

    /// Record the current key table at `timestamp`, but only when at least
    /// one key is pressed
    pub fn sample(&mut self, timestamp: Timestamp) {
        if !self.keys.values().any(|pressed| *pressed) {
            return;
        }
        self.pending.entries.insert(timestamp, self.keys.clone());
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take the accumulated batch, leaving an empty one behind
    pub fn flush(&mut self) -> InputBatch {
        std::mem::take(&mut self.pending)
    }
}
