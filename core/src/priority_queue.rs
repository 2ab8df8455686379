//! `IncidentQueue`: max-priority queue with stable FIFO ties.
//!
//! Each entry carries a strictly increasing insertion sequence that breaks
//! ties: among equal priorities the earlier insert comes out first. A
//! re-inserted item gets a fresh sequence, so it queues behind everything
//! already waiting at its priority.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::point::Priority;

struct Entry<T> {
    priority: Priority,
    seq:      Reverse<u64>,
    item:     T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

pub struct IncidentQueue<T> {
    heap:     BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for IncidentQueue<T> {
    fn default() -> Self {
        Self {
            heap:     BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> IncidentQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(log n).
    pub fn insert(&mut self, item: T, priority: Priority) {
        let seq = Reverse(self.next_seq);
        self.next_seq += 1;
        self.heap.push(Entry { priority, seq, item });
    }

    /// Remove and return the highest-priority, earliest-inserted item.
    /// O(log n). `None` when empty.
    pub fn remove_max(&mut self) -> Option<T> {
        self.heap.pop().map(|e| e.item)
    }

    /// Priority of the item `remove_max` would return next.
    pub fn peek_priority(&self) -> Option<Priority> {
        self.heap.peek().map(|e| e.priority)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
