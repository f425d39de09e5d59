use crate::task::Task;
use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Pop attempted on an empty priority queue.
    EmptyQueue,
    /// No availability window can hold the task without overlapping a placed slot.
    Unschedulable { task: Task },
    InvalidSortKey(String),
    MalformedWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    InvalidWorkload { task: String, minutes: i64 },
    InvalidGranularity(i64),
    InvariantViolation(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::EmptyQueue => write!(f, "priority queue is empty"),
            ScheduleError::Unschedulable { task } => write!(
                f,
                "task '{}' could not be scheduled: not enough time",
                task.name
            ),
            ScheduleError::InvalidSortKey(key) => write!(
                f,
                "invalid sort key '{key}' (expected priority, workload or deadline)"
            ),
            ScheduleError::MalformedWindow { start, end } => write!(
                f,
                "availability window end {end} must be after start {start}"
            ),
            ScheduleError::InvalidWorkload { task, minutes } => write!(
                f,
                "task '{task}' has non-positive workload {minutes} minutes"
            ),
            ScheduleError::InvalidGranularity(minutes) => write!(
                f,
                "probing granularity must be positive (got {minutes} minutes)"
            ),
            ScheduleError::InvariantViolation(message) => {
                write!(f, "calendar invariant violated: {message}")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
