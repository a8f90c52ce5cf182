use std::sync::Arc;

use warp::http::StatusCode;
use warp::{Rejection, Reply};

use super::error::{Action, ApiError};
use crate::models::{CreateTaskRequest, MessageResponse, UpdateTaskRequest};
use crate::services::AppState;

/// GET /api/tasks
pub async fn list_tasks(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    let tasks = state
        .tasks
        .list()
        .await
        .map_err(ApiError::rejection(Action::FetchTasks))?;
    Ok(warp::reply::json(&tasks))
}

/// GET /api/tasks/stats
pub async fn task_stats(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    let stats = state
        .tasks
        .stats()
        .await
        .map_err(ApiError::rejection(Action::FetchStats))?;
    Ok(warp::reply::json(&stats))
}

/// POST /api/tasks
pub async fn create_task(
    req: CreateTaskRequest,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    let task = state
        .tasks
        .create(req)
        .await
        .map_err(ApiError::rejection(Action::CreateTask))?;
    Ok(warp::reply::with_status(
        warp::reply::json(&task),
        StatusCode::CREATED,
    ))
}

/// PUT /api/tasks/:id
pub async fn update_task(
    id: String,
    req: UpdateTaskRequest,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    let task = state
        .tasks
        .update(&id, req)
        .await
        .map_err(ApiError::rejection(Action::UpdateTask))?;
    Ok(warp::reply::json(&task))
}

/// DELETE /api/tasks/:id
pub async fn delete_task(id: String, state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    state
        .tasks
        .delete(&id)
        .await
        .map_err(ApiError::rejection(Action::DeleteTask))?;
    Ok(warp::reply::json(&MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
