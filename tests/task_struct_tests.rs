use chrono::{Duration, NaiveDate, NaiveDateTime};
use task_planner::{AvailabilityWindow, ScheduleError, Task, parse_datetime, validation};

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

#[test]
fn task_exposes_workload_as_duration_and_formats() {
    let task = Task::new("Design review", dt(2025, 1, 10, 17, 0), 90, 2);
    assert_eq!(task.workload(), Duration::minutes(90));
    assert_eq!(
        task.to_string(),
        "Design review | Priority: 2, Workload: 90 mins, Deadline: 2025-01-10 17:00"
    );
}

#[test]
fn task_json_round_trip() {
    let task = Task::new("Deploy", dt(2025, 1, 10, 17, 0), 45, 1);
    let json = serde_json::to_string(&task).unwrap();
    let parsed: Task = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, task);
}

#[test]
fn parse_datetime_accepts_minute_format() {
    assert_eq!(parse_datetime(" 2025-01-06 09:30 ").unwrap(), dt(2025, 1, 6, 9, 30));
    assert!(parse_datetime("2025-01-06").is_err());
    assert!(parse_datetime("06/01/2025 09:30").is_err());
}

#[test]
fn malformed_window_is_rejected_at_construction() {
    let start = dt(2025, 1, 6, 10, 0);
    assert_eq!(
        AvailabilityWindow::new(start, start),
        Err(ScheduleError::MalformedWindow { start, end: start })
    );
    assert!(AvailabilityWindow::new(start, dt(2025, 1, 6, 9, 0)).is_err());

    let ok = AvailabilityWindow::new(start, dt(2025, 1, 6, 12, 0)).unwrap();
    assert_eq!(ok.duration(), Duration::hours(2));
}

#[test]
fn malformed_window_is_rejected_when_deserializing() {
    let bad = r#"{"start":"2025-01-06T10:00:00","end":"2025-01-06T09:00:00"}"#;
    let err = serde_json::from_str::<AvailabilityWindow>(bad).unwrap_err();
    assert!(err.to_string().contains("must be after start"), "{err}");

    let good = r#"{"start":"2025-01-06T09:00:00","end":"2025-01-06T10:00:00"}"#;
    let window: AvailabilityWindow = serde_json::from_str(good).unwrap();
    assert_eq!(window.start(), dt(2025, 1, 6, 9, 0));
}

#[test]
fn validation_rejects_bad_tasks() {
    let deadline = dt(2025, 1, 10, 17, 0);
    assert!(validation::validate_task(&Task::new("ok", deadline, 10, 0)).is_ok());

    let err = validation::validate_task(&Task::new("zero", deadline, 0, 1)).unwrap_err();
    assert!(err.to_string().contains("non-positive workload"));

    let err = validation::validate_task(&Task::new("  ", deadline, 10, 1)).unwrap_err();
    assert!(err.to_string().contains("non-empty name"));

    let err = validation::validate_task(&Task::new("neg", deadline, 10, -1)).unwrap_err();
    assert!(err.to_string().contains("negative priority"));
}

#[test]
fn end_time_is_checked_against_date_range() {
    let start = dt(2025, 1, 6, 9, 0);
    let task = Task::new("Short", dt(2025, 1, 10, 17, 0), 45, 1);
    assert_eq!(task.end_time(start), Some(dt(2025, 1, 6, 9, 45)));

    let huge = Task::new("Eternal", dt(2025, 1, 10, 17, 0), 10_000_000_000_000, 1);
    assert_eq!(huge.end_time(start), None);

    let unrepresentable = Task::new("Max", dt(2025, 1, 10, 17, 0), i64::MAX, 1);
    assert_eq!(unrepresentable.end_time(start), None);
    assert_eq!(unrepresentable.workload(), Duration::MAX);
}

#[test]
fn shape_check_allows_negative_priority() {
    let deadline = dt(2025, 1, 10, 17, 0);
    let task = Task::new("urgent", deadline, 10, -3);
    assert!(validation::validate_task_shape(&task).is_ok());
    assert!(validation::validate_task(&task).is_err());
    assert!(validation::validate_task_shape(&Task::new("", deadline, 10, 1)).is_err());
}
