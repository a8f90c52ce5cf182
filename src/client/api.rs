//! REST API 客户端

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::update::{ApiEvent, Command};
use crate::models::{
    CreateTaskRequest, ErrorResponse, MessageResponse, Task, TaskStats, UpdateTaskRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
}

/// 不设超时、不重试，失败只上报一次
#[derive(Debug, Clone)]
pub struct TaskApi {
    client: Client,
    base_url: String,
}

impl TaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/tasks{}", self.base_url, path)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.client.get(self.url("")).send().await?;
        parse(response).await
    }

    pub async fn fetch_stats(&self) -> Result<TaskStats, ClientError> {
        let response = self.client.get(self.url("/stats")).send().await?;
        parse(response).await
    }

    pub async fn create_task(&self, req: &CreateTaskRequest) -> Result<Task, ClientError> {
        let response = self.client.post(self.url("")).json(req).send().await?;
        parse(response).await
    }

    pub async fn update_task(
        &self,
        id: Uuid,
        req: &UpdateTaskRequest,
    ) -> Result<Task, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/{id}")))
            .json(req)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/{id}")))
            .send()
            .await?;
        parse(response).await
    }

    /// 执行一条看板命令，结果包装成事件回送给状态机
    pub async fn execute(&self, command: Command) -> ApiEvent {
        tracing::debug!(?command, "Executing API command");
        match command {
            Command::FetchTasks => ApiEvent::TasksLoaded(self.list_tasks().await),
            Command::FetchStats => ApiEvent::StatsLoaded(self.fetch_stats().await),
            Command::Create(req) => ApiEvent::Created(self.create_task(&req).await),
            Command::Update(id, req) => ApiEvent::Updated(self.update_task(id, &req).await),
            Command::Toggle { id, request, status } => ApiEvent::Toggled {
                status,
                result: self.update_task(id, &request).await,
            },
            Command::Delete(id) => ApiEvent::Deleted(self.delete_task(id).await.map(|_| ())),
        }
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}
