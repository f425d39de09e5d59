use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A scheduling request. Never mutated once handed to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub deadline: NaiveDateTime,
    /// Time the task occupies once started, in whole minutes.
    pub workload_minutes: i64,
    /// Lower values are placed first.
    pub priority: i32,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        deadline: NaiveDateTime,
        workload_minutes: i64,
        priority: i32,
    ) -> Self {
        Self {
            name: name.into(),
            deadline,
            workload_minutes,
            priority,
        }
    }

    /// Workload as a duration, saturating at `Duration::MAX` for minute
    /// counts chrono cannot represent.
    pub fn workload(&self) -> Duration {
        Duration::try_minutes(self.workload_minutes).unwrap_or(Duration::MAX)
    }

    /// When the task would end if started at `start`, or `None` when that
    /// instant is outside chrono's representable range.
    pub fn end_time(&self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        Duration::try_minutes(self.workload_minutes).and_then(|w| start.checked_add_signed(w))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Priority: {}, Workload: {} mins, Deadline: {}",
            self.name,
            self.priority,
            self.workload_minutes,
            self.deadline.format(DATETIME_FORMAT)
        )
    }
}

/// Parse a `YYYY-MM-DD HH:MM` timestamp.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT)
}
