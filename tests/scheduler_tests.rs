use chrono::{NaiveDate, NaiveDateTime};
use task_planner::{AvailabilityWindow, Calendar, Scheduler, SortKey, Task};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn task(name: &str, workload: i64, priority: i32) -> Task {
    Task::new(name, at(18, 0), workload, priority)
}

fn morning() -> Calendar {
    Calendar::new(vec![AvailabilityWindow::new(at(9, 0), at(11, 0)).unwrap()])
}

#[test]
fn higher_priority_tasks_are_placed_first() {
    let mut calendar = morning();
    let mut scheduler = Scheduler::new();
    scheduler.add_task(task("low", 30, 5));
    scheduler.add_task(task("high", 30, 1));
    scheduler.add_task(task("mid", 30, 3));

    let report = scheduler.schedule_all(&mut calendar);

    let order: Vec<&str> = report.placed.iter().map(|p| p.task_name.as_str()).collect();
    assert_eq!(order, vec!["high", "mid", "low"]);
    assert_eq!(report.placed[0].start, at(9, 0));
    assert_eq!(report.placed[1].start, at(9, 30));
    assert_eq!(report.placed[2].start, at(10, 0));
    assert_eq!(report.placed[2].end, at(10, 30));
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn unschedulable_task_does_not_block_later_tasks() {
    let mut calendar = morning();
    let mut scheduler = Scheduler::new();
    scheduler.add_task(task("fills most", 100, 1));
    scheduler.add_task(task("too big", 60, 2));
    scheduler.add_task(task("fits", 20, 3));

    let report = scheduler.schedule_all(&mut calendar);

    assert_eq!(report.attempted(), 3);
    let placed: Vec<&str> = report.placed.iter().map(|p| p.task_name.as_str()).collect();
    assert_eq!(placed, vec!["fills most", "fits"]);
    assert_eq!(report.unscheduled.len(), 1);
    assert_eq!(report.unscheduled[0].task.name, "too big");
    assert_eq!(report.placed[1].start, at(10, 40));
    assert!(report.to_cli_summary().contains("unscheduled=too big"));
    calendar.check_invariants().unwrap();
}

#[test]
fn invalid_workload_is_reported_and_run_continues() {
    let mut calendar = morning();
    let mut scheduler = Scheduler::new();
    scheduler.add_task(task("empty", 0, 1));
    scheduler.add_task(task("real", 15, 2));

    let report = scheduler.schedule_all(&mut calendar);

    assert_eq!(report.placed.len(), 1);
    assert_eq!(report.unscheduled[0].task.name, "empty");
    assert!(report.unscheduled[0].reason.contains("non-positive workload"));
}

#[test]
fn equal_priority_tasks_are_placed_in_arrival_order_and_stay_stable() {
    let mut calendar = morning();
    let mut scheduler = Scheduler::new();
    scheduler.add_task(task("first", 20, 2));
    scheduler.add_task(task("second", 20, 2));
    scheduler.add_task(task("urgent", 20, 1));

    scheduler.schedule_all(&mut calendar);
    calendar.sort_by(SortKey::Priority);

    let day = at(0, 0).date();
    let names: Vec<&str> = calendar
        .slots_for(day)
        .iter()
        .map(|s| s.task().name.as_str())
        .collect();
    assert_eq!(names, vec!["urgent", "first", "second"]);
}

#[test]
fn empty_queue_produces_empty_report() {
    let mut calendar = morning();
    let report = Scheduler::new().schedule_all(&mut calendar);
    assert_eq!(report.attempted(), 0);
    assert!(calendar.is_empty());
}

#[test]
fn oversized_workload_is_rejected_without_stopping_the_run() {
    let mut calendar = morning();
    let mut scheduler = Scheduler::new();
    scheduler.add_task(task("eternal", 10_000_000_000_000, 1));
    scheduler.add_task(task("quick", 15, 2));

    let report = scheduler.schedule_all(&mut calendar);

    assert_eq!(report.unscheduled.len(), 1);
    assert_eq!(report.unscheduled[0].task.name, "eternal");
    assert_eq!(report.unscheduled[0].reason, "not enough time");
    assert_eq!(report.placed[0].task_name, "quick");
    assert_eq!(report.placed[0].end, at(9, 15));
}
