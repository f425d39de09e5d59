use crate::calendar::Calendar;
use crate::error::ScheduleError;
use crate::queue::PriorityQueue;
use crate::task::Task;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Drains a priority queue into a calendar, highest priority first.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: PriorityQueue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub task_name: String,
    pub priority: i32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedTask {
    pub task: Task,
    pub reason: String,
}

/// Outcome of one `schedule_all` run, in the order tasks were attempted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub placed: Vec<Placement>,
    pub unscheduled: Vec<RejectedTask>,
}

impl ScheduleReport {
    pub fn attempted(&self) -> usize {
        self.placed.len() + self.unscheduled.len()
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = vec![
            format!("attempted={}", self.attempted()),
            format!("placed={}", self.placed.len()),
        ];
        if !self.unscheduled.is_empty() {
            let names = self
                .unscheduled
                .iter()
                .map(|r| r.task.name.as_str())
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("unscheduled={}", names));
        }
        parts.join(", ")
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queue(queue: PriorityQueue) -> Self {
        Self { queue }
    }

    pub fn add_task(&mut self, task: Task) {
        self.queue.push(task);
    }

    pub fn queue(&self) -> &PriorityQueue {
        &self.queue
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Place every queued task. A task that cannot be placed is reported and
    /// the remaining tasks are still attempted.
    pub fn schedule_all(&mut self, calendar: &mut Calendar) -> ScheduleReport {
        let mut report = ScheduleReport::default();
        while let Ok(task) = self.queue.pop_min() {
            match calendar.place(task.clone()) {
                Ok(slot) => report.placed.push(Placement {
                    start: slot.start(),
                    end: slot.end(),
                    task_name: task.name,
                    priority: task.priority,
                }),
                Err(ScheduleError::Unschedulable { .. }) => {
                    report.unscheduled.push(RejectedTask {
                        reason: "not enough time".to_string(),
                        task,
                    });
                }
                Err(err) => {
                    warn!(task = %task.name, error = %err, "task rejected");
                    report.unscheduled.push(RejectedTask {
                        reason: err.to_string(),
                        task,
                    });
                }
            }
        }
        info!(summary = %report.to_cli_summary(), "scheduling run finished");
        report
    }
}
