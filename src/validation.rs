use crate::task::Task;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskValidationError {}

/// Checks every task the calendar can hold must pass, wherever it came from.
pub fn validate_task_shape(task: &Task) -> Result<(), TaskValidationError> {
    if task.name.trim().is_empty() {
        return Err(TaskValidationError::new("task requires a non-empty name"));
    }

    if task.workload_minutes <= 0 {
        return Err(TaskValidationError::new(format!(
            "task '{}' has non-positive workload {} (must be at least 1 minute)",
            task.name, task.workload_minutes
        )));
    }

    Ok(())
}

/// Checks for new requests from the CLI, CSV import and HTTP. Stricter than
/// `validate_task_shape`: user input may not use negative priorities.
pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    validate_task_shape(task)?;

    if task.priority < 0 {
        return Err(TaskValidationError::new(format!(
            "task '{}' has negative priority {}",
            task.name, task.priority
        )));
    }

    Ok(())
}

/// Validate each task. Duplicate names are allowed but logged, since the
/// calendar does not stop the same request from being placed twice.
pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        validate_task(task)?;
        if !seen.insert(task.name.as_str()) {
            warn!(task = %task.name, "duplicate task name in batch");
        }
    }
    Ok(())
}
