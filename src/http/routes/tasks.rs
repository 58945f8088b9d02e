use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{routing::{get, put}, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::application::task_service::TaskService;
use crate::domain::task::{NewTask, Task, TaskAnalytics, TaskId, TaskPatch};
use crate::http::types::ApiError;

#[derive(Clone)]
pub struct AppState<S: TaskService> { pub service: S }

pub fn router<S: TaskService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route("/api/tasks/analytics", get(analytics::<S>))
        .route("/api/tasks/pending-dates", get(pending_dates::<S>))
        .route("/api/tasks/:id", put(update_task::<S>).delete(delete_task::<S>))
        .with_state(state)
}

#[derive(Deserialize)]
struct DateQuery { date: NaiveDate }

async fn list_tasks<S: TaskService>(State(state): State<AppState<S>>, query: Result<Query<DateQuery>, QueryRejection>) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(DateQuery { date }) = query?;
    Ok(Json(state.service.list_by_date(date).await?))
}

async fn create_task<S: TaskService>(State(state): State<AppState<S>>, payload: Result<Json<NewTask>, JsonRejection>) -> Result<Json<Task>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.service.create(input).await?))
}

async fn update_task<S: TaskService>(State(state): State<AppState<S>>, id: Result<Path<i64>, PathRejection>, payload: Result<Json<TaskPatch>, JsonRejection>) -> Result<Json<Task>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    Ok(Json(state.service.update(TaskId(id), patch).await?))
}

async fn delete_task<S: TaskService>(State(state): State<AppState<S>>, id: Result<Path<i64>, PathRejection>) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.service.delete(TaskId(id)).await?;
    Ok(StatusCode::OK)
}

async fn analytics<S: TaskService>(State(state): State<AppState<S>>, query: Result<Query<DateQuery>, QueryRejection>) -> Result<Json<TaskAnalytics>, ApiError> {
    let Query(DateQuery { date }) = query?;
    Ok(Json(state.service.analytics(date).await?))
}

async fn pending_dates<S: TaskService>(State(state): State<AppState<S>>) -> Result<Json<Vec<NaiveDate>>, ApiError> {
    Ok(Json(state.service.list_pending_dates().await?))
}
