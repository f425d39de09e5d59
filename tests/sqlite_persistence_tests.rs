#![cfg(feature = "sqlite")]

use chrono::{NaiveDate, NaiveDateTime};
use task_planner::{
    AvailabilityWindow, Calendar, CalendarStore, SortKey, SqliteCalendarStore, Task,
};
use tempfile::NamedTempFile;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 2, 3)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[test]
fn sqlite_store_round_trip_calendar() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteCalendarStore::new(file.path()).unwrap();

    let mut calendar = Calendar::new(vec![AvailabilityWindow::new(at(8, 0), at(12, 0)).unwrap()]);
    calendar
        .add_to_calendar(Task::new("Backlog grooming", at(17, 0), 50, 4))
        .unwrap();
    calendar
        .add_to_calendar(Task::new("Incident review", at(17, 0), 30, 1))
        .unwrap();
    calendar.sort_by(SortKey::Priority);

    store.save_calendar(&calendar).unwrap();
    let loaded = store.load_calendar().unwrap().expect("calendar stored");

    assert_eq!(loaded, calendar);
    let names: Vec<&str> = loaded.slots().map(|s| s.task().name.as_str()).collect();
    assert_eq!(names, vec!["Incident review", "Backlog grooming"]);
}

#[test]
fn empty_store_loads_nothing() {
    let store = SqliteCalendarStore::in_memory().unwrap();
    assert!(store.load_calendar().unwrap().is_none());
}

#[test]
fn saving_replaces_previous_contents() {
    let store = SqliteCalendarStore::in_memory().unwrap();
    let window = AvailabilityWindow::new(at(8, 0), at(12, 0)).unwrap();

    let mut first = Calendar::new(vec![window]);
    first
        .add_to_calendar(Task::new("Old", at(17, 0), 30, 1))
        .unwrap();
    store.save_calendar(&first).unwrap();

    let second = Calendar::new(vec![window]);
    store.save_calendar(&second).unwrap();

    let loaded = store.load_calendar().unwrap().unwrap();
    assert!(loaded.is_empty());
    assert_eq!(loaded.windows(), &[window]);
}

#[test]
fn negative_priority_slots_can_be_saved() {
    let store = SqliteCalendarStore::in_memory().unwrap();
    let mut calendar = Calendar::new(vec![AvailabilityWindow::new(at(8, 0), at(12, 0)).unwrap()]);
    calendar
        .add_to_calendar(Task::new("Pager duty", at(17, 0), 45, -1))
        .unwrap();

    store.save_calendar(&calendar).unwrap();
    let loaded = store.load_calendar().unwrap().unwrap();
    assert_eq!(loaded, calendar);
}
