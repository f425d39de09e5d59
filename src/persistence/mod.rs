use crate::calendar::Calendar;
use crate::error::ScheduleError;
use crate::task::Task;
use crate::validation;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    Csv(csv::Error),
    Schedule(ScheduleError),
    InvalidData(String),
    NotFound,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::Schedule(err) => write!(f, "schedule error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::NotFound => write!(f, "no calendar stored"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<ScheduleError> for PersistenceError {
    fn from(value: ScheduleError) -> Self {
        Self::Schedule(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait CalendarStore {
    fn save_calendar(&self, calendar: &Calendar) -> PersistenceResult<()>;
    fn load_calendar(&self) -> PersistenceResult<Option<Calendar>>;
}

/// Validation for freshly imported tasks.
pub fn validate_tasks(tasks: &[Task]) -> PersistenceResult<()> {
    validation::validate_task_collection(tasks)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

/// Validation for tasks that were already queued or placed. Accepts anything
/// the engine itself accepts.
pub fn validate_stored_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
) -> PersistenceResult<()> {
    for task in tasks {
        validation::validate_task_shape(task)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
    }
    Ok(())
}

pub fn validate_calendar(calendar: &Calendar) -> PersistenceResult<()> {
    calendar.check_invariants()?;
    validate_stored_tasks(calendar.slots().map(|slot| slot.task()))
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    CalendarSnapshot, export_slots_to_csv, import_tasks_from_csv, import_windows_from_csv,
    load_snapshot_from_json, save_snapshot_to_json,
};
