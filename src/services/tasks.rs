use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::ValidationErrors;

use super::store::{StoreError, TaskStore};
use crate::models::{CreateTaskRequest, Task, TaskStats, TaskStatus, UpdateTaskRequest};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("task not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 任务业务逻辑：字段校验、时间戳与 id 分配、统计
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.list_newest_first().await?)
    }

    pub async fn create(&self, req: CreateTaskRequest) -> Result<Task, ServiceError> {
        let fields = req.into_fields()?;
        let task = self.store.insert(Task::new(fields, Utc::now())).await?;
        tracing::debug!(task_id = %task.id, "Task created");
        Ok(task)
    }

    pub async fn update(&self, id: &str, req: UpdateTaskRequest) -> Result<Task, ServiceError> {
        let id = parse_id(id)?;
        let fields = match req.into_fields() {
            Ok(fields) => fields,
            // 不存在的任务优先报 not found
            Err(errors) => {
                if !self.store.exists(id).await? {
                    tracing::debug!(task_id = %id, error = %errors, "Update for missing task");
                    return Err(ServiceError::NotFound);
                }
                return Err(errors.into());
            }
        };
        let task = self
            .store
            .replace(id, fields, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound)?;
        tracing::debug!(task_id = %task.id, status = %task.status, "Task updated");
        Ok(task)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id)?;
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound);
        }
        tracing::debug!(task_id = %id, "Task deleted");
        Ok(())
    }

    /// 四次独立计数再计算完成率
    pub async fn stats(&self) -> Result<TaskStats, ServiceError> {
        let total = self.store.count(None).await?;
        let completed = self.store.count(Some(TaskStatus::Completed)).await?;
        let in_progress = self.store.count(Some(TaskStatus::InProgress)).await?;
        let pending = self.store.count(Some(TaskStatus::Pending)).await?;

        Ok(TaskStats::from_counts(total, completed, in_progress, pending))
    }
}

// 非法 id 不可能对应任何任务
fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::NotFound)
}
