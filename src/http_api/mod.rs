use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    AvailabilityWindow, Calendar, ScheduleError, ScheduleReport, Scheduler, Task, TimeSlot,
    validation,
};

/// Shared calendar. Every handler that places or re-orders slots holds the
/// lock for the whole search-then-insert sequence.
#[derive(Clone)]
pub struct AppState {
    calendar: Arc<Mutex<Calendar>>,
}

impl AppState {
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar: Arc::new(Mutex::new(calendar)),
        }
    }

    pub fn with_shared(calendar: Arc<Mutex<Calendar>>) -> Self {
        Self { calendar }
    }

    fn calendar(&self) -> Arc<Mutex<Calendar>> {
        self.calendar.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Invalid(String),
    InvalidSortKey(String),
    Unschedulable(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::Unschedulable { .. } => ApiError::Unschedulable(value.to_string()),
            ScheduleError::InvalidSortKey(_) => ApiError::InvalidSortKey(value.to_string()),
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::InvalidSortKey(message) => {
                (StatusCode::BAD_REQUEST, "invalid_sort_key", message)
            }
            ApiError::Unschedulable(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unschedulable", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct SortPayload {
    key: String,
}

#[derive(Debug, Deserialize)]
struct WindowPayload {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/windows", get(list_windows).post(add_window))
        .route("/tasks", post(place_task))
        .route("/schedule", get(get_schedule).post(schedule_batch))
        .route("/schedule/sort", post(sort_schedule))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, calendar: Calendar) -> std::io::Result<()> {
    let state = AppState::new(calendar);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_windows(State(state): State<AppState>) -> Json<Vec<AvailabilityWindow>> {
    let calendar = state.calendar();
    let windows = calendar.lock().windows().to_vec();
    Json(windows)
}

async fn add_window(
    State(state): State<AppState>,
    Json(payload): Json<WindowPayload>,
) -> Result<(StatusCode, Json<AvailabilityWindow>), ApiError> {
    let window = AvailabilityWindow::new(payload.start, payload.end)?;
    state.calendar().lock().add_window(window);
    Ok((StatusCode::CREATED, Json(window)))
}

async fn get_schedule(State(state): State<AppState>) -> Json<Vec<DaySchedule>> {
    let calendar = state.calendar();
    let days = day_schedules(&calendar.lock());
    Json(days)
}

async fn place_task(
    State(state): State<AppState>,
    Json(task): Json<Task>,
) -> Result<(StatusCode, Json<TimeSlot>), ApiError> {
    validation::validate_task(&task).map_err(|err| ApiError::invalid(err.to_string()))?;
    let calendar = state.calendar();
    let slot = calendar.lock().place(task)?;
    Ok((StatusCode::CREATED, Json(slot)))
}

async fn schedule_batch(
    State(state): State<AppState>,
    Json(tasks): Json<Vec<Task>>,
) -> Result<Json<ScheduleReport>, ApiError> {
    validation::validate_task_collection(&tasks)
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    let mut scheduler = Scheduler::new();
    for task in tasks {
        scheduler.add_task(task);
    }
    let calendar = state.calendar();
    let report = {
        let mut guard = calendar.lock();
        scheduler.schedule_all(&mut guard)
    };
    Ok(Json(report))
}

async fn sort_schedule(
    State(state): State<AppState>,
    Json(payload): Json<SortPayload>,
) -> Result<Json<Vec<DaySchedule>>, ApiError> {
    let calendar = state.calendar();
    let days = {
        let mut guard = calendar.lock();
        guard.sort_scheduled_tasks(&payload.key)?;
        day_schedules(&guard)
    };
    Ok(Json(days))
}

fn day_schedules(calendar: &Calendar) -> Vec<DaySchedule> {
    calendar
        .days()
        .map(|day| DaySchedule {
            day,
            slots: calendar.slots_for(day).to_vec(),
        })
        .collect()
}
