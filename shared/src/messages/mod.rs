use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::Value;
use crate::types::Timestamp;

/// Pressed-state table for the observer's configured input keys
pub type KeyTable = BTreeMap<String, bool>;

/// Authority-to-observer state update: every retained delta past the
/// observer's watermark, tagged with the authority's send time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub deltas: BTreeMap<Timestamp, Value>,
    pub sent_at: Timestamp,
}

impl Update {
    /// Highest delta timestamp carried by this update
    pub fn latest(&self) -> Option<Timestamp> {
        self.deltas.keys().next_back().copied()
    }
}

/// Observer-to-authority input batch accumulated since the last flush
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputBatch {
    pub entries: BTreeMap<Timestamp, KeyTable>,
}

impl InputBatch {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Messages exchanged over a connection. The transport is expected to
/// deliver them ordered and reliably, with arbitrary delay; the codec is
/// the transport's concern (every variant is serde-ready).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    /// Sent once at connect, from the authority: the identity object the
    /// connect hook produced for this observer
    Identity { observer: Value },
    /// Authority to observer
    Update(Update),
    /// Observer to authority
    Input(InputBatch),
}
