#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_schedules_by_priority() {
    let script = "window 2025-01-06 09:00 2025-01-06 10:00\n\
                  task 2 30 2025-01-07 17:00 Write report\n\
                  task 1 30 2025-01-07 17:00 Fix login\n\
                  task 3 30 2025-01-07 17:00 Tidy desk\n\
                  schedule\nquit\n";
    let assert = run_cli(script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Scheduled 'Fix login' at 2025-01-06 09:00."));
    assert!(output.contains("Scheduled 'Write report' at 2025-01-06 09:30."));
    assert!(output.contains("Couldn't schedule 'Tidy desk'"));
    assert!(output.contains("09:00 - 09:30 | Fix login (Priority 1)"));
}

#[test]
fn cli_rejects_inverted_window() {
    run_cli("window 2025-01-06 12:00 2025-01-06 09:00\nquit\n")
        .success()
        .stdout(str_contains("End must be after start."));
}

#[test]
fn cli_rejects_unknown_sort_key() {
    run_cli("sort colour\nquit\n")
        .success()
        .stdout(str_contains("Invalid sort option."));
}

#[test]
fn cli_sorts_by_workload() {
    let script = "window 2025-01-06 09:00 2025-01-06 12:00\n\
                  task 1 60 2025-01-07 17:00 Long\n\
                  task 2 15 2025-01-07 17:00 Short\n\
                  schedule\nsort workload\nquit\n";
    let assert = run_cli(script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let sorted = output
        .split("Tasks sorted by Workload:")
        .last()
        .unwrap_or_default();
    let short = sorted.find("Short").expect("Short listed");
    let long = sorted.find("Long").expect("Long listed");
    assert!(short < long, "workload sort should list Short first:\n{sorted}");
}

#[test]
fn cli_rejects_non_positive_workload() {
    run_cli("task 1 0 2025-01-07 17:00 Nothing\nquit\n")
        .success()
        .stdout(str_contains("Invalid input:"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "window 2025-01-06 09:00 2025-01-06 10:00\n\
         task 1 30 2025-01-07 17:00 Persisted\n\
         schedule\n\
         save json {path}\n\
         window 2025-01-08 09:00 2025-01-08 10:00\n\
         task 1 20 2025-01-09 17:00 Temp\n\
         schedule\n\
         load json {path}\n\
         quit\n"
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Calendar saved to"));
    let after_reload = output
        .split("Calendar loaded from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("Persisted"));
    assert!(
        !after_reload.contains("Temp"),
        "slot placed after saving should not survive reload:\n{after_reload}"
    );
}

#[test]
fn cli_exits_on_end_of_input() {
    run_cli("help\n")
        .success()
        .stdout(str_contains("Welcome to the Task Scheduler!"));
}
