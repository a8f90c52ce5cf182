//! 进程内存储，用于开发环境与测试（`memory://`）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{StoreError, TaskStore};
use crate::models::{Task, TaskFields, TaskStatus};

#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: Task) -> Result<Task, StoreError> {
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn list_newest_first(&self) -> Result<Vec<Task>, StoreError> {
        // 先按插入顺序反转，created_at 相同时后插入的排在前面
        let mut tasks: Vec<Task> = self.tasks.read().await.iter().rev().cloned().collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn replace(
        &self,
        id: Uuid,
        fields: TaskFields,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.apply(fields, now);
            task.clone()
        }))
    }

    async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tasks.read().await.iter().any(|t| t.id == id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() != before)
    }

    async fn count(&self, status: Option<TaskStatus>) -> Result<u64, StoreError> {
        let tasks = self.tasks.read().await;
        let count = match status {
            Some(status) => tasks.iter().filter(|t| t.status == status).count(),
            None => tasks.len(),
        };
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateTaskRequest, UpdateTaskRequest};
    use chrono::TimeZone;
    use tokio_test::block_on;

    fn task_at(title: &str, hour: u32) -> Task {
        let fields = CreateTaskRequest::new(title, "details").into_fields().unwrap();
        Task::new(fields, Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap())
    }

    #[test]
    fn test_list_is_newest_first() {
        let store = MemoryTaskStore::new();
        block_on(async {
            store.insert(task_at("middle", 10)).await.unwrap();
            store.insert(task_at("oldest", 8)).await.unwrap();
            store.insert(task_at("newest", 12)).await.unwrap();

            let titles: Vec<String> = store
                .list_newest_first()
                .await
                .unwrap()
                .into_iter()
                .map(|t| t.title)
                .collect();
            assert_eq!(titles, vec!["newest", "middle", "oldest"]);
        });
    }

    #[test]
    fn test_replace_missing_task_returns_none() {
        let store = MemoryTaskStore::new();
        let fields = UpdateTaskRequest::from(&task_at("x", 1)).into_fields().unwrap();
        let replaced = block_on(store.replace(Uuid::new_v4(), fields, Utc::now())).unwrap();
        assert!(replaced.is_none());
    }

    #[test]
    fn test_replace_overwrites_fields_and_refreshes_updated_at() {
        let store = MemoryTaskStore::new();
        let task = block_on(store.insert(task_at("before", 9))).unwrap();

        let mut req = UpdateTaskRequest::from(&task);
        req.title = Some("after".into());
        req.status = Some("completed".into());
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        let updated = block_on(store.replace(task.id, req.into_fields().unwrap(), now))
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.title, "after");
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(updated.updated_at, now);
    }

    #[test]
    fn test_delete_and_count() {
        let store = MemoryTaskStore::new();
        block_on(async {
            let a = store.insert(task_at("a", 1)).await.unwrap();
            store.insert(task_at("b", 2)).await.unwrap();

            assert_eq!(store.count(None).await.unwrap(), 2);
            assert_eq!(store.count(Some(TaskStatus::Pending)).await.unwrap(), 2);
            assert_eq!(store.count(Some(TaskStatus::Completed)).await.unwrap(), 0);

            assert!(store.delete(a.id).await.unwrap());
            assert!(!store.delete(a.id).await.unwrap());
            assert_eq!(store.count(None).await.unwrap(), 1);
        });
    }
}
