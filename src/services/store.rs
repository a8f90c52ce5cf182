//! 任务存储抽象

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Task, TaskFields, TaskStatus};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("corrupt task row {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },

    #[error("unsupported database url `{0}` (expected postgres://, postgresql:// or memory://)")]
    UnsupportedUrl(String),
}

/// 单一 Task 集合上的持久化操作，每次写入立即生效
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: Task) -> Result<Task, StoreError>;

    /// 按 created_at 倒序返回全部任务
    async fn list_newest_first(&self) -> Result<Vec<Task>, StoreError>;

    /// 整体替换可变字段并刷新 updated_at，任务不存在时返回 None
    async fn replace(
        &self,
        id: Uuid,
        fields: TaskFields,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError>;

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError>;

    /// 硬删除，返回是否删除了任务
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// status 为 None 时统计全部任务
    async fn count(&self, status: Option<TaskStatus>) -> Result<u64, StoreError>;
}
