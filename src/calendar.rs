use crate::error::{ScheduleError, ScheduleResult};
use crate::slot::{TimeSlot, ranges_overlap};
use crate::sorting::SortKey;
use crate::task::{DATETIME_FORMAT, Task};
use crate::window::AvailabilityWindow;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

pub const DEFAULT_GRANULARITY_MINUTES: i64 = 5;

/// Single-timeline calendar: availability windows plus the slots placed so far.
///
/// Slots are filed under the date of their start time. Overlap checks only
/// consult that bucket, so a slot running past midnight is not seen by
/// candidates starting on the following day.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    windows: Vec<AvailabilityWindow>,
    schedule: BTreeMap<NaiveDate, Vec<TimeSlot>>,
    granularity: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    windows: Vec<AvailabilityWindow>,
    #[serde(default = "default_granularity_minutes")]
    granularity_minutes: i64,
}

fn default_granularity_minutes() -> i64 {
    DEFAULT_GRANULARITY_MINUTES
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Calendar {
    pub fn new(windows: Vec<AvailabilityWindow>) -> Self {
        Self {
            windows,
            schedule: BTreeMap::new(),
            granularity: Duration::minutes(DEFAULT_GRANULARITY_MINUTES),
        }
    }

    pub fn with_granularity(
        windows: Vec<AvailabilityWindow>,
        granularity_minutes: i64,
    ) -> ScheduleResult<Self> {
        let mut calendar = Self::new(windows);
        calendar.set_granularity(granularity_minutes)?;
        Ok(calendar)
    }

    pub fn from_config(config: &CalendarConfig) -> ScheduleResult<Self> {
        Self::with_granularity(config.windows.clone(), config.granularity_minutes)
    }

    pub fn to_config(&self) -> CalendarConfig {
        CalendarConfig::from(self)
    }

    pub fn set_granularity(&mut self, minutes: i64) -> ScheduleResult<()> {
        self.granularity = Duration::try_minutes(minutes)
            .filter(|step| *step > Duration::zero())
            .ok_or(ScheduleError::InvalidGranularity(minutes))?;
        Ok(())
    }

    pub fn granularity(&self) -> Duration {
        self.granularity
    }

    pub fn add_window(&mut self, window: AvailabilityWindow) {
        self.windows.push(window);
    }

    /// Windows in the order they were supplied; this is the search order.
    pub fn windows(&self) -> &[AvailabilityWindow] {
        &self.windows
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.schedule.keys().copied()
    }

    pub fn slots_for(&self, day: NaiveDate) -> &[TimeSlot] {
        self.schedule.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every slot, day by day, in current bucket order.
    pub fn slots(&self) -> impl Iterator<Item = &TimeSlot> + '_ {
        self.schedule.values().flatten()
    }

    pub fn slot_count(&self) -> usize {
        self.schedule.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }

    /// Whether `task` could start at `start` without overlapping the slots of
    /// that day and while lying inside some availability window.
    pub fn is_available(&self, start: NaiveDateTime, task: &Task) -> bool {
        let Some(end) = task.end_time(start) else {
            return false;
        };
        let clashes = self
            .slots_for(start.date())
            .iter()
            .any(|slot| ranges_overlap(start, end, slot.start(), slot.end()));
        if clashes {
            return false;
        }
        self.windows.iter().any(|w| w.contains_range(start, end))
    }

    /// Earliest start inside the first window (in supplied order) that can take
    /// the task. Later windows are only tried once earlier ones are exhausted,
    /// even if they begin sooner.
    pub fn find_next_available_time(&self, task: &Task) -> Option<NaiveDateTime> {
        self.find_free_range(task).map(|(start, _)| start)
    }

    /// A task whose end would fall outside chrono's range never fits.
    fn find_free_range(&self, task: &Task) -> Option<(NaiveDateTime, NaiveDateTime)> {
        if task.workload_minutes <= 0 {
            return None;
        }
        for (idx, window) in self.windows.iter().enumerate() {
            let mut candidate = window.start();
            while let Some(end) = task.end_time(candidate) {
                if end > window.end() {
                    break;
                }
                if self.is_available(candidate, task) {
                    debug!(task = %task.name, window = idx, start = %candidate, "found free start");
                    return Some((candidate, end));
                }
                match candidate.checked_add_signed(self.granularity) {
                    Some(next) => candidate = next,
                    None => break,
                }
            }
            debug!(task = %task.name, window = idx, "window exhausted");
        }
        None
    }

    pub fn add_to_calendar(&mut self, task: Task) -> ScheduleResult<NaiveDateTime> {
        self.place(task).map(|slot| slot.start())
    }

    /// Same as `add_to_calendar` but hands back a copy of the recorded slot.
    pub fn place(&mut self, task: Task) -> ScheduleResult<TimeSlot> {
        if task.workload_minutes <= 0 {
            return Err(ScheduleError::InvalidWorkload {
                minutes: task.workload_minutes,
                task: task.name,
            });
        }
        let Some((start, end)) = self.find_free_range(&task) else {
            warn!(task = %task.name, workload = task.workload_minutes, "not enough time to schedule");
            return Err(ScheduleError::Unschedulable { task });
        };
        info!(task = %task.name, priority = task.priority, start = %start, "scheduled");
        let slot = TimeSlot::new(start, end, task);
        self.schedule.entry(slot.day()).or_default().push(slot.clone());
        Ok(slot)
    }

    /// Re-order the slots of every day bucket by `key`. Leaves the calendar
    /// untouched when the key is not recognised.
    pub fn sort_scheduled_tasks(&mut self, key: &str) -> ScheduleResult<()> {
        let key: SortKey = key.parse()?;
        self.sort_by(key);
        Ok(())
    }

    pub fn sort_by(&mut self, key: SortKey) {
        for slots in self.schedule.values_mut() {
            let bucket = std::mem::take(slots);
            *slots = key.sort(bucket);
        }
        debug!(key = %key, days = self.schedule.len(), "sorted scheduled tasks");
    }

    /// Insert a previously placed slot, e.g. from a snapshot, after checking it
    /// against the calendar invariants.
    pub fn restore_slot(&mut self, slot: TimeSlot) -> ScheduleResult<()> {
        let task = slot.task();
        if task.workload_minutes <= 0 {
            return Err(ScheduleError::InvalidWorkload {
                task: task.name.clone(),
                minutes: task.workload_minutes,
            });
        }
        if task.end_time(slot.start()) != Some(slot.end()) {
            return Err(ScheduleError::InvariantViolation(format!(
                "slot for '{}' ends at {} but its workload is {} minutes",
                task.name,
                slot.end(),
                task.workload_minutes
            )));
        }
        if !self.windows.iter().any(|w| w.contains(&slot)) {
            return Err(ScheduleError::InvariantViolation(format!(
                "slot for '{}' at {} is outside every availability window",
                task.name,
                slot.start()
            )));
        }
        if let Some(other) = self
            .slots_for(slot.day())
            .iter()
            .find(|other| other.overlaps(&slot))
        {
            return Err(ScheduleError::InvariantViolation(format!(
                "slot for '{}' at {} overlaps '{}' at {}",
                task.name,
                slot.start(),
                other.task().name,
                other.start()
            )));
        }
        self.schedule.entry(slot.day()).or_default().push(slot);
        Ok(())
    }

    pub fn check_invariants(&self) -> ScheduleResult<()> {
        for (day, slots) in &self.schedule {
            for (i, a) in slots.iter().enumerate() {
                if a.day() != *day {
                    return Err(ScheduleError::InvariantViolation(format!(
                        "slot for '{}' filed under {} but starts on {}",
                        a.task().name,
                        day,
                        a.day()
                    )));
                }
                if !self.windows.iter().any(|w| w.contains(a)) {
                    return Err(ScheduleError::InvariantViolation(format!(
                        "slot for '{}' at {} is outside every availability window",
                        a.task().name,
                        a.start()
                    )));
                }
                if let Some(b) = slots[i + 1..].iter().find(|b| a.overlaps(b)) {
                    return Err(ScheduleError::InvariantViolation(format!(
                        "'{}' overlaps '{}' on {}",
                        a.task().name,
                        b.task().name,
                        day
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Calendar is empty.");
        }
        for (day, slots) in &self.schedule {
            writeln!(f, "\n{}:", day.format("%Y-%m-%d"))?;
            for slot in slots {
                writeln!(
                    f,
                    "  {} - {} | {} (Priority {})",
                    slot.start().format("%H:%M"),
                    slot.end().format("%H:%M"),
                    slot.task().name,
                    slot.task().priority
                )?;
            }
        }
        Ok(())
    }
}

impl CalendarConfig {
    pub fn new(windows: Vec<AvailabilityWindow>, granularity_minutes: i64) -> Self {
        Self {
            windows,
            granularity_minutes,
        }
    }

    pub fn windows(&self) -> &[AvailabilityWindow] {
        &self.windows
    }

    pub fn granularity_minutes(&self) -> i64 {
        self.granularity_minutes
    }

    pub fn describe(&self) -> String {
        let windows = self
            .windows
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "granularity={}m, windows=[{}]",
            self.granularity_minutes, windows
        )
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_GRANULARITY_MINUTES)
    }
}

impl From<&Calendar> for CalendarConfig {
    fn from(calendar: &Calendar) -> Self {
        Self {
            windows: calendar.windows.clone(),
            granularity_minutes: calendar.granularity.num_minutes(),
        }
    }
}

/// Formats a timestamp the way every textual surface of the crate does.
pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}
