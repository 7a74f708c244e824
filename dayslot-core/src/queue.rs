//! Max-priority queue over task handles.
//!
//! A binary heap laid out in a `Vec`. Unlike `std::collections::BinaryHeap`
//! it exposes slot indices so a queued task's key can be raised in place
//! (`promote`). Keys are snapshots: changing a task's priority elsewhere
//! does not move it here.

use crate::error::{Result, SchedulerError};
use crate::task::{PROMOTED_PRIORITY, Priority, TaskId};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub task_id: TaskId,
    pub priority: Priority,
}

impl QueueEntry {
    pub fn new(task_id: TaskId, priority: Priority) -> Self {
        Self { task_id, priority }
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority first; on ties the lower id ranks higher.
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.task_id.cmp(&self.task_id))
    }
}

fn left(i: usize) -> usize {
    2 * i + 1
}

fn right(i: usize) -> usize {
    2 * i + 2
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    heap: Vec<QueueEntry>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Entries in heap (structural) order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.heap.iter()
    }

    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.heap.get(index)
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.position_of(task_id).is_some()
    }

    pub fn position_of(&self, task_id: TaskId) -> Option<usize> {
        self.position(|e| e.task_id == task_id)
    }

    pub fn position(&self, pred: impl FnMut(&QueueEntry) -> bool) -> Option<usize> {
        self.heap.iter().position(pred)
    }

    pub fn push(&mut self, entry: QueueEntry) {
        self.heap.push(entry);
        let last = self.heap.len() - 1;
        self.sift_up(last);
        debug_assert!(self.is_heap());
    }

    /// Raise the key at `index` to `priority` and restore heap order.
    pub fn promote(&mut self, index: usize, priority: Priority) -> Result<()> {
        let len = self.heap.len();
        let entry = self
            .heap
            .get_mut(index)
            .ok_or(SchedulerError::IndexOutOfRange { index, len })?;
        if priority < entry.priority {
            return Err(SchedulerError::PriorityOrderingViolation {
                task_id: entry.task_id,
                current: entry.priority,
                requested: priority,
            });
        }
        entry.priority = priority;
        self.sift_up(index);
        debug_assert!(self.is_heap());
        Ok(())
    }

    /// Promote the entry at `index` above every natural priority.
    pub fn promote_to_max(&mut self, index: usize) -> Result<()> {
        self.promote(index, PROMOTED_PRIORITY)
    }

    pub fn peek_max(&self) -> Result<&QueueEntry> {
        self.heap.first().ok_or(SchedulerError::EmptyQueue)
    }

    pub fn pop_max(&mut self) -> Result<QueueEntry> {
        if self.heap.is_empty() {
            return Err(SchedulerError::EmptyQueue);
        }
        let max = self.heap.swap_remove(0);
        self.sift_down(0);
        debug_assert!(self.is_heap());
        Ok(max)
    }

    /// Heap-order invariant: every parent ranks at or above its children.
    pub fn is_heap(&self) -> bool {
        (1..self.heap.len()).all(|i| self.heap[parent(i)] >= self.heap[i])
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 && self.heap[parent(i)] < self.heap[i] {
            self.heap.swap(parent(i), i);
            i = parent(i);
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let (l, r) = (left(i), right(i));
            let mut largest = i;
            if l < len && self.heap[l] > self.heap[largest] {
                largest = l;
            }
            if r < len && self.heap[r] > self.heap[largest] {
                largest = r;
            }
            if largest == i {
                break;
            }
            self.heap.swap(i, largest);
            i = largest;
        }
    }
}
