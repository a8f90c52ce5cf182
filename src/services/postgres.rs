//! PostgreSQL 存储（sqlx）

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::store::{StoreError, TaskStore};
use crate::config::DatabaseConfig;
use crate::models::{Task, TaskFields, TaskPriority, TaskStatus};

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: String,
    status: String,
    priority: String,
    category: Option<String>,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StoreError::Corrupt { id: row.id, reason };
        let status = row.status.parse::<TaskStatus>().map_err(|e| corrupt(format!("{e}")))?;
        let priority = row.priority.parse::<TaskPriority>().map_err(|e| corrupt(format!("{e}")))?;

        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status,
            priority,
            category: row.category,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Connected to PostgreSQL, migrations applied");

        Ok(Self { pool })
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, task: Task) -> Result<Task, StoreError> {
        let row: TaskRow = sqlx::query_as(
            "INSERT INTO tasks \
             (id, title, description, status, priority, category, due_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(&task.category)
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_newest_first(&self) -> Result<Vec<Task>, StoreError> {
        let rows: Vec<TaskRow> = sqlx::query_as("SELECT * FROM tasks ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn replace(
        &self,
        id: Uuid,
        fields: TaskFields,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError> {
        let row: Option<TaskRow> = sqlx::query_as(
            "UPDATE tasks SET \
             title = $2, description = $3, status = $4, priority = $5, \
             category = $6, due_date = $7, updated_at = GREATEST($8, created_at) \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.status.as_str())
        .bind(fields.priority.as_str())
        .bind(&fields.category)
        .bind(fields.due_date)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(found)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, status: Option<TaskStatus>) -> Result<u64, StoreError> {
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE status = $1")
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count.max(0) as u64)
    }
}
