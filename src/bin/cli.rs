use chrono::NaiveDateTime;
use std::io::{self, Write};
use std::str::SplitWhitespace;
use task_planner::{
    AvailabilityWindow, Calendar, ScheduleError, Scheduler, SortKey, Task,
    export_slots_to_csv, import_tasks_from_csv, import_windows_from_csv, load_snapshot_from_json,
    logging, parse_datetime, render_df_as_text_table, save_snapshot_to_json, slots_dataframe,
    validation,
};

/// Reads the next two tokens as `YYYY-MM-DD HH:MM`.
fn take_datetime(parts: &mut SplitWhitespace<'_>) -> Option<Result<NaiveDateTime, String>> {
    let date = parts.next()?;
    let time = parts.next()?;
    let joined = format!("{date} {time}");
    Some(parse_datetime(&joined).map_err(|_| format!("Invalid timestamp '{joined}' (YYYY-MM-DD HH:MM)")))
}

fn print_help() {
    println!(
        "Commands:\n  help                                         Show this help\n  window <YYYY-MM-DD HH:MM> <YYYY-MM-DD HH:MM>  Add an availability window\n  windows                                      List availability windows\n  task <priority> <workload_min> <YYYY-MM-DD HH:MM> <name...>\n                                               Queue a task\n  pending                                      List queued tasks in priority order\n  schedule                                     Place every queued task\n  show                                         Show the calendar per day\n  table                                        Show placed slots as a table\n  sort <priority|workload|deadline>            Re-order each day's slots\n  granularity <minutes>                        Set the probing step\n  import tasks <csv_path>                      Queue tasks from CSV\n  import windows <csv_path>                    Add windows from CSV\n  export csv <path>                            Write placed slots to CSV\n  save json <path>                             Save calendar and queue\n  load json <path>                             Load calendar and queue\n  quit|exit                                    Exit"
    );
}

fn print_windows(calendar: &Calendar) {
    if calendar.windows().is_empty() {
        println!("No availability windows.");
        return;
    }
    for (idx, window) in calendar.windows().iter().enumerate() {
        println!("  {}. {}", idx + 1, window);
    }
}

fn print_pending(scheduler: &Scheduler) {
    let queue = scheduler.queue();
    if queue.is_empty() {
        println!("No pending tasks.");
        return;
    }
    for task in queue.ordered() {
        println!("  {}", task);
    }
}

fn print_table(calendar: &Calendar) {
    match slots_dataframe(calendar) {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error building table: {}", e),
    }
}

fn run_schedule(scheduler: &mut Scheduler, calendar: &mut Calendar) {
    if scheduler.pending() == 0 {
        println!("No pending tasks.");
        return;
    }
    println!("Scheduling tasks...");
    let report = scheduler.schedule_all(calendar);
    for placement in &report.placed {
        println!(
            "Scheduled '{}' at {}.",
            placement.task_name,
            placement.start.format("%Y-%m-%d %H:%M")
        );
    }
    for rejected in &report.unscheduled {
        println!(
            "Couldn't schedule '{}' — {}.",
            rejected.task.name, rejected.reason
        );
    }
    print!("{}", calendar);
}

fn main() {
    logging::init_tracing();

    let mut calendar = Calendar::default();
    let mut scheduler = Scheduler::new();

    println!("Welcome to the Task Scheduler! Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "window" => {
                let start = take_datetime(&mut parts);
                let end = take_datetime(&mut parts);
                match (start, end) {
                    (Some(Ok(start)), Some(Ok(end))) => {
                        match AvailabilityWindow::new(start, end) {
                            Ok(window) => {
                                calendar.add_window(window);
                                println!("Window added: {}", window);
                            }
                            Err(ScheduleError::MalformedWindow { .. }) => {
                                println!("End must be after start.")
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    (Some(Err(msg)), _) | (_, Some(Err(msg))) => println!("{}", msg),
                    _ => println!("Usage: window <YYYY-MM-DD HH:MM> <YYYY-MM-DD HH:MM>"),
                }
            }
            "windows" => print_windows(&calendar),
            "task" => {
                let priority_s = parts.next();
                let workload_s = parts.next();
                let deadline = take_datetime(&mut parts);
                let name = parts.collect::<Vec<_>>().join(" ");
                match (priority_s, workload_s, deadline) {
                    (Some(priority_s), Some(workload_s), Some(deadline)) if !name.is_empty() => {
                        let priority: i32 = match priority_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid priority");
                                continue;
                            }
                        };
                        let workload: i64 = match workload_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid workload");
                                continue;
                            }
                        };
                        let deadline = match deadline {
                            Ok(d) => d,
                            Err(msg) => {
                                println!("{}", msg);
                                continue;
                            }
                        };
                        let task = Task::new(name, deadline, workload, priority);
                        match validation::validate_task(&task) {
                            Ok(_) => {
                                println!("Task added: {}", task);
                                scheduler.add_task(task);
                            }
                            Err(e) => println!("Invalid input: {}", e),
                        }
                    }
                    _ => println!(
                        "Usage: task <priority> <workload_min> <YYYY-MM-DD HH:MM> <name...>"
                    ),
                }
            }
            "pending" => print_pending(&scheduler),
            "schedule" => run_schedule(&mut scheduler, &mut calendar),
            "show" => print!("{}", calendar),
            "table" => print_table(&calendar),
            "sort" => match parts.next() {
                Some(key_s) => match key_s.parse::<SortKey>() {
                    Ok(key) => {
                        calendar.sort_by(key);
                        println!("\nTasks sorted by {}:", key.label());
                        print!("{}", calendar);
                    }
                    Err(_) => println!("Invalid sort option."),
                },
                None => println!("Usage: sort <priority|workload|deadline>"),
            },
            "granularity" => match parts.next().map(str::parse::<i64>) {
                Some(Ok(minutes)) => match calendar.set_granularity(minutes) {
                    Ok(_) => println!("Granularity set to {} minutes.", minutes),
                    Err(e) => println!("Error: {}", e),
                },
                Some(Err(_)) => println!("Invalid minutes"),
                None => println!("Usage: granularity <minutes>"),
            },
            "import" => {
                let kind = parts.next();
                let path = parts.next();
                match (kind, path) {
                    (Some("tasks"), Some(path)) => match import_tasks_from_csv(path) {
                        Ok(tasks) => {
                            let count = tasks.len();
                            for task in tasks {
                                scheduler.add_task(task);
                            }
                            println!("Imported {} tasks from {}.", count, path);
                        }
                        Err(e) => println!("Error importing tasks: {}", e),
                    },
                    (Some("windows"), Some(path)) => match import_windows_from_csv(path) {
                        Ok(windows) => {
                            let count = windows.len();
                            for window in windows {
                                calendar.add_window(window);
                            }
                            println!("Imported {} windows from {}.", count, path);
                        }
                        Err(e) => println!("Error importing windows: {}", e),
                    },
                    _ => println!("Usage: import <tasks|windows> <csv_path>"),
                }
            }
            "export" => match (parts.next(), parts.next()) {
                (Some("csv"), Some(path)) => match export_slots_to_csv(&calendar, path) {
                    Ok(_) => println!("Slots exported to {}.", path),
                    Err(e) => println!("Error exporting slots: {}", e),
                },
                _ => println!("Usage: export csv <path>"),
            },
            "save" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => {
                    match save_snapshot_to_json(&calendar, scheduler.queue(), path) {
                        Ok(_) => println!("Calendar saved to {}.", path),
                        Err(e) => println!("Error saving calendar: {}", e),
                    }
                }
                _ => println!("Usage: save json <path>"),
            },
            "load" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match load_snapshot_from_json(path) {
                    Ok((loaded, queue)) => {
                        calendar = loaded;
                        scheduler = Scheduler::with_queue(queue);
                        println!("Calendar loaded from {}.", path);
                        print!("{}", calendar);
                    }
                    Err(e) => println!("Error loading calendar: {}", e),
                },
                _ => println!("Usage: load json <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}

