pub mod calendar;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod persistence;
pub mod queue;
pub mod report;
pub mod scheduler;
pub mod slot;
pub mod sorting;
pub mod task;
pub mod validation;
pub mod window;

pub use calendar::{Calendar, CalendarConfig, DEFAULT_GRANULARITY_MINUTES};
pub use error::{ScheduleError, ScheduleResult};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteCalendarStore;
pub use persistence::{
    CalendarSnapshot, CalendarStore, PersistenceError, export_slots_to_csv, import_tasks_from_csv,
    import_windows_from_csv, load_snapshot_from_json, save_snapshot_to_json, validate_calendar,
    validate_stored_tasks, validate_tasks,
};
pub use queue::PriorityQueue;
pub use report::{render_df_as_text_table, slots_dataframe};
pub use scheduler::{Placement, RejectedTask, ScheduleReport, Scheduler};
pub use slot::TimeSlot;
pub use sorting::{SortKey, merge_sort};
pub use task::{Task, parse_datetime};
pub use validation::TaskValidationError;
pub use window::AvailabilityWindow;
