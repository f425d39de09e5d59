use super::{PersistenceError, PersistenceResult};
use crate::{
    calendar::{Calendar, CalendarConfig, format_datetime},
    queue::PriorityQueue,
    slot::TimeSlot,
    task::{Task, parse_datetime},
    window::AvailabilityWindow,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Everything needed to resume a planning session: the calendar configuration,
/// the slots already placed (in presentation order) and the tasks still queued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    pub config: CalendarConfig,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
    #[serde(default)]
    pub pending: Vec<Task>,
}

impl CalendarSnapshot {
    pub fn capture(calendar: &Calendar, pending: &PriorityQueue) -> PersistenceResult<Self> {
        super::validate_calendar(calendar)?;
        let pending: Vec<&Task> = pending.ordered();
        super::validate_stored_tasks(pending.iter().copied())?;
        Ok(Self {
            config: calendar.to_config(),
            slots: calendar.slots().cloned().collect(),
            pending: pending.into_iter().cloned().collect(),
        })
    }

    pub fn into_parts(self) -> PersistenceResult<(Calendar, PriorityQueue)> {
        super::validate_stored_tasks(&self.pending)?;
        super::validate_stored_tasks(self.slots.iter().map(TimeSlot::task))?;
        let mut calendar = Calendar::from_config(&self.config)?;
        for slot in self.slots {
            calendar.restore_slot(slot)?;
        }
        let queue = self.pending.into_iter().collect::<PriorityQueue>();
        Ok((calendar, queue))
    }
}

pub fn save_snapshot_to_json<P: AsRef<Path>>(
    calendar: &Calendar,
    pending: &PriorityQueue,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = CalendarSnapshot::capture(calendar, pending)?;
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(path = %path.as_ref().display(), slots = snapshot.slots.len(), "saved snapshot");
    Ok(())
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<(Calendar, PriorityQueue)> {
    let file = File::open(path.as_ref())?;
    let snapshot: CalendarSnapshot = serde_json::from_reader(file)?;
    snapshot.into_parts()
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskCsvRecord {
    name: String,
    priority: i32,
    workload_minutes: i64,
    deadline: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct WindowCsvRecord {
    start: String,
    end: String,
}

#[derive(Debug, Serialize)]
struct SlotCsvRecord<'a> {
    day: String,
    start: String,
    end: String,
    name: &'a str,
    priority: i32,
    workload_minutes: i64,
    deadline: String,
}

impl<'a> From<&'a TimeSlot> for SlotCsvRecord<'a> {
    fn from(slot: &'a TimeSlot) -> Self {
        let task = slot.task();
        Self {
            day: slot.day().to_string(),
            start: format_datetime(slot.start()),
            end: format_datetime(slot.end()),
            name: task.name.as_str(),
            priority: task.priority,
            workload_minutes: task.workload_minutes,
            deadline: format_datetime(task.deadline),
        }
    }
}

/// Read tasks from a CSV file with a `name,priority,workload_minutes,deadline` header.
pub fn import_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Task>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut tasks = Vec::new();
    for (idx, record) in reader.deserialize::<TaskCsvRecord>().enumerate() {
        let record = record?;
        let deadline = parse_datetime(&record.deadline).map_err(|err| {
            PersistenceError::InvalidData(format!(
                "row {}: invalid deadline '{}': {err}",
                idx + 1,
                record.deadline
            ))
        })?;
        tasks.push(Task::new(
            record.name,
            deadline,
            record.workload_minutes,
            record.priority,
        ));
    }
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

/// Read availability windows from a CSV file with a `start,end` header.
pub fn import_windows_from_csv<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<Vec<AvailabilityWindow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut windows = Vec::new();
    for (idx, record) in reader.deserialize::<WindowCsvRecord>().enumerate() {
        let record = record?;
        let parse = |value: &str| {
            parse_datetime(value).map_err(|err| {
                PersistenceError::InvalidData(format!(
                    "row {}: invalid timestamp '{}': {err}",
                    idx + 1,
                    value
                ))
            })
        };
        let start = parse(&record.start)?;
        let end = parse(&record.end)?;
        windows.push(AvailabilityWindow::new(start, end)?);
    }
    Ok(windows)
}

pub fn export_slots_to_csv<P: AsRef<Path>>(calendar: &Calendar, path: P) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for slot in calendar.slots() {
        writer.serialize(SlotCsvRecord::from(slot))?;
    }
    writer.flush()?;
    Ok(())
}
