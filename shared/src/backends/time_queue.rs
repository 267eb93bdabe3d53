use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::Timestamp;

/// A queue that holds items back until their delivery time has been
/// reached. Items sharing a delivery time come out in insertion order.
///
/// Used to simulate network lag: received packets are queued with a due
/// time in the near future and only processed once it has passed.
pub struct TimeQueue<T> {
    queue: BinaryHeap<ItemContainer<T>>,
    counter: u64,
}

impl<T> TimeQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            counter: 0,
        }
    }

    pub fn add_item(&mut self, due: Timestamp, item: T) {
        self.counter += 1;
        self.queue.push(ItemContainer {
            due,
            order: self.counter,
            item,
        });
    }

    /// Whether an item has come due
    pub fn has_item(&self, now: Timestamp) -> bool {
        self.queue
            .peek()
            .is_some_and(|container| container.due <= now)
    }

    /// Pop the earliest item whose delivery time has passed
    pub fn pop_item(&mut self, now: Timestamp) -> Option<T> {
        if self.has_item(now) {
            self.queue.pop().map(|container| container.item)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for TimeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct ItemContainer<T> {
    due: Timestamp,
    order: u64,
    item: T,
}

impl<T> PartialEq for ItemContainer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.order == other.order
    }
}

impl<T> Eq for ItemContainer<T> {}

impl<T> Ord for ItemContainer<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse the comparison so the earliest
        // due time (then lowest insertion order) surfaces first
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl<T> PartialOrd for ItemContainer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
