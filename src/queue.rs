use crate::error::{ScheduleError, ScheduleResult};
use crate::task::Task;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Min-priority queue of pending tasks.
///
/// Lower `priority` values come out first. Tasks with equal priority come out
/// in the order they were pushed.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<QueuedTask>,
    next_seq: u64,
}

#[derive(Debug)]
struct QueuedTask {
    priority: i32,
    seq: u64,
    task: Task,
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTask {
    // BinaryHeap is a max-heap; reverse so the smallest (priority, seq) is on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueuedTask {
            priority: task.priority,
            seq,
            task,
        });
    }

    pub fn pop_min(&mut self) -> ScheduleResult<Task> {
        self.heap
            .pop()
            .map(|entry| entry.task)
            .ok_or(ScheduleError::EmptyQueue)
    }

    pub fn peek(&self) -> Option<&Task> {
        self.heap.peek().map(|entry| &entry.task)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pending tasks in the order `pop_min` would return them, without consuming the queue.
    pub fn ordered(&self) -> Vec<&Task> {
        let mut entries: Vec<&QueuedTask> = self.heap.iter().collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|entry| &entry.task).collect()
    }

    pub fn drain_ordered(&mut self) -> Vec<Task> {
        let mut tasks = Vec::with_capacity(self.heap.len());
        while let Ok(task) = self.pop_min() {
            tasks.push(task);
        }
        tasks
    }
}

impl Extend<Task> for PriorityQueue {
    fn extend<I: IntoIterator<Item = Task>>(&mut self, iter: I) {
        for task in iter {
            self.push(task);
        }
    }
}

impl FromIterator<Task> for PriorityQueue {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut queue = PriorityQueue::new();
        queue.extend(iter);
        queue
    }
}
