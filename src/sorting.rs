//! Stable ordering of placed slots.

use crate::error::ScheduleError;
use crate::slot::TimeSlot;
use std::fmt;
use std::str::FromStr;

/// Criterion used to re-order the slots inside each day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Workload,
    Deadline,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Priority, SortKey::Workload, SortKey::Deadline];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Priority => "priority",
            SortKey::Workload => "workload",
            SortKey::Deadline => "deadline",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Priority => "Priority",
            SortKey::Workload => "Workload",
            SortKey::Deadline => "Deadline",
        }
    }

    pub fn sort(&self, slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
        match self {
            SortKey::Priority => merge_sort(slots, |s| s.task().priority),
            SortKey::Workload => merge_sort(slots, |s| s.task().workload_minutes),
            SortKey::Deadline => merge_sort(slots, |s| s.task().deadline),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(SortKey::Priority),
            "workload" => Ok(SortKey::Workload),
            "deadline" => Ok(SortKey::Deadline),
            _ => Err(ScheduleError::InvalidSortKey(s.to_string())),
        }
    }
}

/// Stable top-down merge sort keyed by `key`.
///
/// Equal keys keep their original relative order: on a tie the element from
/// the left half is taken first.
pub fn merge_sort<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K + Copy,
{
    if items.len() <= 1 {
        return items;
    }
    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = merge_sort(left, key);
    let right = merge_sort(right, key);
    merge(left, right, key)
}

fn merge<T, K, F>(left: Vec<T>, right: Vec<T>, key: F) -> Vec<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut result = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => key(l) <= key(r),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        result.extend(next);
    }
    result
}
