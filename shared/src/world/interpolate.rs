use crate::state::{Step, Value};
use crate::types::Timestamp;

use super::World;

impl World {
    /// Continuous-time estimate of the state at `target`.
    ///
    /// Deltas at or before `target` are adopted directly. For deltas past
    /// it, each numeric leaf blends between its last known sample and the
    /// upcoming one; a leaf with no usable pair (missing, non-numeric, or
    /// unchanged) snaps to its last known value, and the upcoming delta's
    /// other leaves stay invisible until the target reaches them.
    ///
    /// A target at or before the baseline timestamp yields the baseline
    /// exactly; there is no backward extrapolation.
    pub fn interpolate(&mut self, target: Timestamp, now: Timestamp) -> Value {
        if target <= self.baseline_timestamp() {
            return self.baseline().clone();
        }

        let mut result = self.baseline().clone();
        let mut shadow = shadow_of(&result, self.baseline_timestamp());

        self.range(0, now, now, false, (), |_, timestamp, delta, _| {
            if timestamp <= target {
                // Already arrived: adopt directly, and stamp every leaf the
                // delta mentions with its sample time
                result.merge_from(delta);
                shadow.merge_from(&shadow_of(delta, timestamp));
            } else {
                // Straddling the target: rewrite a copy of the delta so that
                // blendable leaves hold their interpolated value and every
                // other leaf is nulled out, then let the null-swallowing
                // merge apply only the blended ones
                let mut arrivals = delta.clone();
                arrivals.each_mut(|leaf, path| {
                    *leaf = match blended_leaf(leaf, path, &result, &shadow, timestamp, target) {
                        Some(blended) => Value::Number(blended),
                        None => Value::Null,
                    };
                });
                result.merge_from(&arrivals);
            }
            None
        });

        result
    }
}

/// A tree parallel in shape to `tree` whose every leaf is the timestamp of
/// the sample it came from
fn shadow_of(tree: &Value, timestamp: Timestamp) -> Value {
    let mut shadow = tree.clone();
    shadow.each_mut(|leaf, _| {
        *leaf = Value::Number(timestamp as f64);
    });
    shadow
}

/// Linear blend of one leaf between its last known sample and an upcoming
/// one, weighted by how far `target` still is from the upcoming sample.
/// `None` means no blend applies and the leaf must snap to last known.
fn blended_leaf(
    leaf: &Value,
    path: &[Step],
    result: &Value,
    shadow: &Value,
    timestamp: Timestamp,
    target: Timestamp,
) -> Option<f64> {
    let new_value = leaf.as_number().filter(|n| n.is_finite())?;
    let old_value = result
        .select(path)?
        .as_number()
        .filter(|n| n.is_finite())?;
    let old_timestamp = shadow.select(path)?.as_number()?;
    let new_timestamp = timestamp as f64;

    if new_value == old_value || new_timestamp <= old_timestamp {
        return None;
    }

    let span = new_timestamp - old_timestamp;
    let lead = new_timestamp - target as f64;
    Some(old_value + (new_value - old_value) * lead / span)
}
