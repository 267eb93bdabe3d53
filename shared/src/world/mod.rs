use std::collections::BTreeMap;
use std::time::Duration;

use crate::state::{Step, Value};
use crate::types::Timestamp;

mod interpolate;

/// Temporal delta store: a baseline state plus the time-ordered partial
/// updates recorded since, bounded by a retention window.
///
/// Deltas older than the window (relative to "now") are irreversibly folded
/// into the baseline in timestamp order; folding happens as a by-product of
/// any range iteration rather than on its own schedule. All operations that
/// reason about the window take `now` explicitly; the World holds no clock
/// of its own.
pub struct World {
    baseline: Value,
    baseline_timestamp: Timestamp,
    retention: u64,
    deltas: BTreeMap<Timestamp, Value>,
    cached: Value,
}

impl World {
    /// Create a new World from a full baseline state known as of `timestamp`
    pub fn new(baseline: Value, timestamp: Timestamp, retention: Duration) -> Self {
        let cached = baseline.clone();
        Self {
            baseline,
            baseline_timestamp: timestamp,
            retention: retention.as_millis() as u64,
            deltas: BTreeMap::new(),
            cached,
        }
    }

    pub fn baseline(&self) -> &Value {
        &self.baseline
    }

    pub fn baseline_timestamp(&self) -> Timestamp {
        self.baseline_timestamp
    }

    /// Highest retained delta timestamp, if any deltas are retained
    pub fn latest_delta_timestamp(&self) -> Option<Timestamp> {
        self.deltas.keys().next_back().copied()
    }

    /// Store a partial update at `timestamp`. A delta already recorded at
    /// that timestamp coalesces with the new one by merge, so partial
    /// updates landing on the same logical tick accumulate rather than
    /// overwrite.
    pub fn put(&mut self, delta: Value, timestamp: Timestamp) {
        match self.deltas.get_mut(&timestamp) {
            Some(existing) => existing.merge_from(&delta),
            None => {
                self.deltas.insert(timestamp, delta);
            }
        }
    }

    /// Iterate retained deltas in ascending timestamp order, invoking `fold`
    /// for every delta with `start < timestamp <= stop`.
    ///
    /// As a side effect of iteration, every delta older than the retention
    /// window relative to `now` is folded into the baseline after `fold` has
    /// seen it, the baseline timestamp advances to it, and it is evicted.
    /// When `include_baseline` is set and `start < baseline_timestamp`,
    /// `fold` runs once more over the baseline with its `is_baseline` flag
    /// set; returning `Some` from that call replaces the accumulator, which
    /// lets the fold prepend the baseline underneath the accumulated deltas.
    pub fn range<A, F>(
        &mut self,
        start: Timestamp,
        stop: Timestamp,
        now: Timestamp,
        include_baseline: bool,
        init: A,
        mut fold: F,
    ) -> A
    where
        F: FnMut(&mut A, Timestamp, &Value, bool) -> Option<A>,
    {
        let mut acc = init;
        let timestamps: Vec<Timestamp> = self.deltas.keys().copied().collect();
        for timestamp in timestamps {
            if timestamp > start && timestamp <= stop {
                if let Some(delta) = self.deltas.get(&timestamp) {
                    fold(&mut acc, timestamp, delta, false);
                }
            }
            if now.saturating_sub(timestamp) > self.retention {
                if let Some(expired) = self.deltas.remove(&timestamp) {
                    self.baseline.merge_from(&expired);
                    self.baseline_timestamp = timestamp;
                }
            }
        }
        if include_baseline && start < self.baseline_timestamp {
            if let Some(replacement) =
                fold(&mut acc, self.baseline_timestamp, &self.baseline, true)
            {
                acc = replacement;
            }
        }
        acc
    }

    /// Flattened state as of `now`
    pub fn snapshot(&mut self, now: Timestamp) -> Value {
        self.snapshot_at(now, now)
    }

    /// Flattened state as of `timestamp`: the baseline plus every retained
    /// delta up to `timestamp`, later samples overwriting earlier ones at
    /// the leaf level
    pub fn snapshot_at(&mut self, timestamp: Timestamp, now: Timestamp) -> Value {
        self.range(
            0,
            timestamp,
            now,
            true,
            Value::map(),
            |acc, _, tree, is_baseline| {
                if is_baseline {
                    let mut flattened = tree.clone();
                    flattened.merge_from(acc);
                    Some(flattened)
                } else {
                    acc.merge_from(tree);
                    None
                }
            },
        )
    }

    /// The raw per-timestamp deltas needed to bring an observer whose
    /// watermark is `watermark` up to date. The caller is responsible for
    /// picking the maximum returned timestamp as the new watermark.
    pub fn changes_since(
        &mut self,
        watermark: Timestamp,
        now: Timestamp,
    ) -> BTreeMap<Timestamp, Value> {
        self.range(
            watermark,
            now,
            now,
            false,
            BTreeMap::new(),
            |acc, timestamp, delta, _| {
                acc.insert(timestamp, delta.clone());
                None
            },
        )
    }

    /// Value at `path` in the state as of `timestamp`, or in the cached
    /// current snapshot when no timestamp is given. `None` when the path
    /// does not resolve.
    pub fn path_at(
        &mut self,
        path: &[Step],
        timestamp: Option<Timestamp>,
        now: Timestamp,
    ) -> Option<Value> {
        match timestamp {
            Some(timestamp) => self.snapshot_at(timestamp, now).select(path).cloned(),
            None => self.cached.select(path).cloned(),
        }
    }

    /// Publish `snapshot` as the current captured/rendered state, queryable
    /// through [`World::path_at`] without a timestamp
    pub fn cache_snapshot(&mut self, snapshot: Value) {
        self.cached = snapshot;
    }

    pub fn cached(&self) -> &Value {
        &self.cached
    }
}
