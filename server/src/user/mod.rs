use mirage_shared::{InputBatch, TimeQueue, Timestamp};

use crate::transport::Connection;

// UserKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct UserKey(u64);

impl UserKey {
    pub(crate) fn new(value: u64) -> Self {
        UserKey(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

/// Per-observer connection record: the transport handle, the replication
/// watermark (highest delta timestamp already delivered), and the lag
/// simulation queue for incoming input batches
pub(crate) struct User {
    pub connection: Box<dyn Connection>,
    pub watermark: Timestamp,
    pub lagged_inputs: TimeQueue<InputBatch>,
}

impl User {
    pub fn new(connection: Box<dyn Connection>) -> Self {
        Self {
            connection,
            watermark: 0,
            lagged_inputs: TimeQueue::new(),
        }
    }
}
