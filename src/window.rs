use crate::error::{ScheduleError, ScheduleResult};
use crate::slot::TimeSlot;
use crate::task::DATETIME_FORMAT;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A contiguous range `[start, end)` in which tasks may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct AvailabilityWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawWindow> for AvailabilityWindow {
    type Error = ScheduleError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        AvailabilityWindow::new(raw.start, raw.end)
    }
}

impl AvailabilityWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> ScheduleResult<Self> {
        if end <= start {
            return Err(ScheduleError::MalformedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `slot` lies entirely inside this window.
    pub fn contains(&self, slot: &TimeSlot) -> bool {
        self.contains_range(slot.start(), slot.end())
    }

    pub fn contains_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start <= start && end <= self.end
    }
}

impl fmt::Display for AvailabilityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.start.format(DATETIME_FORMAT),
            self.end.format(DATETIME_FORMAT)
        )
    }
}
