use crate::task::Task;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A task bound to a concrete `[start, end)` placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    start: NaiveDateTime,
    end: NaiveDateTime,
    task: Task,
}

impl TimeSlot {
    /// `end` must be `task.end_time(start)`; the calendar computes it with
    /// checked arithmetic before building the slot.
    pub(crate) fn new(start: NaiveDateTime, end: NaiveDateTime, task: Task) -> Self {
        Self { start, end, task }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Day bucket this slot is filed under.
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        ranges_overlap(self.start, self.end, other.start, other.end)
    }
}

pub(crate) fn ranges_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}
