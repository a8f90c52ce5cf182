//! 错误到 HTTP 响应的映射

use std::convert::Infallible;

use warp::http::StatusCode;
use warp::reject::Reject;
use warp::{Rejection, Reply};

use crate::models::ErrorResponse;
use crate::services::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FetchTasks,
    CreateTask,
    UpdateTask,
    DeleteTask,
    FetchStats,
}

impl Action {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::FetchTasks => "Failed to fetch tasks",
            Self::CreateTask => "Failed to create task",
            Self::UpdateTask => "Failed to update task",
            Self::DeleteTask => "Failed to delete task",
            Self::FetchStats => "Failed to fetch statistics",
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub action: Action,
    pub source: ServiceError,
}

impl Reject for ApiError {}

impl ApiError {
    pub fn rejection(action: Action) -> impl Fn(ServiceError) -> Rejection {
        move |source| warp::reject::custom(ApiError { action, source })
    }
}

/// 校验错误与存储错误统一为 500，仅 not-found 单独返回 404
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(api_err) = err.find::<ApiError>() {
        match &api_err.source {
            ServiceError::NotFound => {
                tracing::debug!(action = ?api_err.action, "Task not found");
                (StatusCode::NOT_FOUND, "Task not found")
            }
            other => {
                tracing::error!(action = ?api_err.action, error = %other, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    api_err.action.failure_message(),
                )
            }
        }
    } else if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        tracing::error!(error = %body_err, "Malformed request body");
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
    } else if err.is_not_found() || err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::NOT_FOUND, "Not found")
    } else {
        tracing::error!(rejection = ?err, "Unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
    };

    let body = warp::reply::json(&ErrorResponse {
        error: message.to_string(),
    });
    Ok(warp::reply::with_status(body, status))
}
