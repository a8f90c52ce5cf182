//! HTTP 路由定义

pub mod error;
pub mod tasks;

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use warp::path::FullPath;
use warp::{Filter, Rejection, Reply};

use crate::services::AppState;

pub use error::{handle_rejection, Action, ApiError};

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// 全部路由：REST API + 单页应用回退，错误统一转换为 JSON
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let static_dir = state.config.server.static_dir.clone();
    api_routes(state)
        .or(spa_fallback(static_dir))
        .recover(handle_rejection)
}

fn api_routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let list = warp::path!("api" / "tasks")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(tasks::list_tasks);

    let stats = warp::path!("api" / "tasks" / "stats")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(tasks::task_stats);

    let create = warp::path!("api" / "tasks")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(tasks::create_task);

    let update = warp::path!("api" / "tasks" / String)
        .and(warp::put())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(tasks::update_task);

    let delete = warp::path!("api" / "tasks" / String)
        .and(warp::delete())
        .and(with_state(state))
        .and_then(tasks::delete_task);

    list.or(stats).or(create).or(update).or(delete)
}

/// 未匹配的 GET 请求：先找静态文件，再回退到 index.html。
/// /api 下的路径不参与回退，否则 API 错误会被首页掩盖
fn spa_fallback(
    static_dir: String,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let index = Path::new(&static_dir).join("index.html");
    warp::get()
        .and(outside_api())
        .and(
            warp::fs::dir(static_dir)
                .or(warp::fs::file(index))
                .unify(),
        )
}

fn outside_api() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path::full()
        .and_then(|path: FullPath| async move {
            let path = path.as_str();
            if path == "/api" || path.starts_with("/api/") {
                Err(warp::reject::not_found())
            } else {
                Ok(())
            }
        })
        .untuple_one()
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T: DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DatabaseConfig, LogConfig, ServerConfig};
    use crate::models::{Task, TaskFields, TaskStats, TaskStatus};
    use crate::services::{MemoryTaskStore, StoreError, TaskStore};
    use serde_json::{json, Value};
    use warp::http::StatusCode;

    fn test_state() -> Arc<AppState> {
        state_with(Arc::new(MemoryTaskStore::new()))
    }

    fn state_with(store: Arc<dyn TaskStore>) -> Arc<AppState> {
        let config = AppConfig {
            server: ServerConfig {
                port: 0,
                static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
            },
            database: DatabaseConfig {
                url: "memory://".to_string(),
                max_connections: 1,
            },
            log: LogConfig {
                filter: "debug".to_string(),
            },
        };
        Arc::new(AppState::with_store(config, store))
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl TaskStore for FailingStore {
        async fn insert(&self, _task: Task) -> Result<Task, StoreError> {
            Err(StoreError::UnsupportedUrl("offline://".into()))
        }

        async fn list_newest_first(&self) -> Result<Vec<Task>, StoreError> {
            Err(StoreError::UnsupportedUrl("offline://".into()))
        }

        async fn replace(
            &self,
            _id: uuid::Uuid,
            _fields: TaskFields,
            _now: chrono::DateTime<chrono::Utc>,
        ) -> Result<Option<Task>, StoreError> {
            Err(StoreError::UnsupportedUrl("offline://".into()))
        }

        async fn exists(&self, _id: uuid::Uuid) -> Result<bool, StoreError> {
            Err(StoreError::UnsupportedUrl("offline://".into()))
        }

        async fn delete(&self, _id: uuid::Uuid) -> Result<bool, StoreError> {
            Err(StoreError::UnsupportedUrl("offline://".into()))
        }

        async fn count(&self, _status: Option<TaskStatus>) -> Result<u64, StoreError> {
            Err(StoreError::UnsupportedUrl("offline://".into()))
        }
    }

    async fn create<F>(filter: &F, body: Value) -> Task
    where
        F: Filter + 'static,
        F::Extract: Reply + Send,
    {
        let res = warp::test::request()
            .method("POST")
            .path("/api/tasks")
            .json(&body)
            .reply(filter)
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        serde_json::from_slice(res.body()).unwrap()
    }

    fn error_message(body: &[u8]) -> String {
        let value: Value = serde_json::from_slice(body).unwrap();
        value["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let filter = routes(test_state());
        let res = warp::test::request()
            .method("POST")
            .path("/api/tasks")
            .json(&json!({"title": "A", "description": "B"}))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "pending");
        assert_eq!(body["priority"], "medium");
        assert!(body["id"].is_string());
        assert!(body["createdAt"].is_string());
        assert!(body["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_create_validation_failure_is_500() {
        let filter = routes(test_state());
        let res = warp::test::request()
            .method("POST")
            .path("/api/tasks")
            .json(&json!({"title": "A", "priority": "urgent"}))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_message(res.body()), "Failed to create task");
    }

    #[tokio::test]
    async fn test_malformed_json_is_generic_500() {
        let filter = routes(test_state());
        let res = warp::test::request()
            .method("POST")
            .path("/api/tasks")
            .header("content-type", "application/json")
            .body("{not json")
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_message(res.body()), "Something went wrong!");
    }

    #[tokio::test]
    async fn test_list_returns_newest_first() {
        let filter = routes(test_state());
        let first = create(&filter, json!({"title": "first", "description": "x"})).await;
        let second = create(&filter, json!({"title": "second", "description": "x"})).await;

        let res = warp::test::request()
            .method("GET")
            .path("/api/tasks")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);

        let tasks: Vec<Task> = serde_json::from_slice(res.body()).unwrap();
        let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_replaces_task() {
        let filter = routes(test_state());
        let task = create(
            &filter,
            json!({"title": "A", "description": "B", "category": "home", "dueDate": "2030-02-03"}),
        )
        .await;

        let res = warp::test::request()
            .method("PUT")
            .path(&format!("/api/tasks/{}", task.id))
            .json(&json!({
                "title": "A2",
                "description": "B2",
                "status": "in-progress",
                "priority": "high"
            }))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["id"], task.id.to_string());
        assert_eq!(body["title"], "A2");
        assert_eq!(body["status"], "in-progress");
        assert_eq!(body["priority"], "high");
        assert!(body.get("category").is_none());
        assert!(body.get("dueDate").is_none());
    }

    #[tokio::test]
    async fn test_update_missing_task_is_404() {
        let filter = routes(test_state());
        let res = warp::test::request()
            .method("PUT")
            .path(&format!("/api/tasks/{}", uuid::Uuid::new_v4()))
            .json(&json!({
                "title": "A",
                "description": "B",
                "status": "pending",
                "priority": "low"
            }))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(res.body()), "Task not found");
    }

    #[tokio::test]
    async fn test_incomplete_update_of_missing_task_is_404() {
        let filter = routes(test_state());
        let res = warp::test::request()
            .method("PUT")
            .path(&format!("/api/tasks/{}", uuid::Uuid::new_v4()))
            .json(&json!({"title": "x"}))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(res.body()), "Task not found");
    }

    #[tokio::test]
    async fn test_incomplete_update_of_existing_task_is_500() {
        let filter = routes(test_state());
        let task = create(&filter, json!({"title": "A", "description": "B"})).await;

        let res = warp::test::request()
            .method("PUT")
            .path(&format!("/api/tasks/{}", task.id))
            .json(&json!({"title": "x"}))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_message(res.body()), "Failed to update task");
    }

    #[tokio::test]
    async fn test_create_accepts_epoch_millis_due_date() {
        let filter = routes(test_state());
        let task = create(
            &filter,
            json!({"title": "A", "description": "B", "dueDate": 946684800000i64}),
        )
        .await;

        assert_eq!(task.due_date, chrono::NaiveDate::from_ymd_opt(2000, 1, 1));
    }

    #[tokio::test]
    async fn test_delete_task_then_404() {
        let filter = routes(test_state());
        let task = create(&filter, json!({"title": "A", "description": "B"})).await;
        let path = format!("/api/tasks/{}", task.id);

        let res = warp::test::request()
            .method("DELETE")
            .path(&path)
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["message"], "Task deleted successfully");

        let res = warp::test::request()
            .method("DELETE")
            .path(&path)
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats() {
        let filter = routes(test_state());

        let res = warp::test::request()
            .method("GET")
            .path("/api/tasks/stats")
            .reply(&filter)
            .await;
        let stats: TaskStats = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(stats, TaskStats::default());

        create(&filter, json!({"title": "A", "description": "B", "status": "completed"})).await;
        create(&filter, json!({"title": "A", "description": "B", "status": "in-progress"})).await;
        create(&filter, json!({"title": "A", "description": "B"})).await;

        let res = warp::test::request()
            .method("GET")
            .path("/api/tasks/stats")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(
            body,
            json!({
                "totalTasks": 3,
                "completedTasks": 1,
                "inProgressTasks": 1,
                "pendingTasks": 1,
                "completionRate": 33
            })
        );
    }

    #[tokio::test]
    async fn test_unmatched_get_serves_index_page() {
        let filter = routes(test_state());
        let res = warp::test::request()
            .method("GET")
            .path("/board/some/deep/link")
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let html = String::from_utf8_lossy(res.body());
        assert!(html.contains("<title>Task Tracker</title>"));
    }

    #[tokio::test]
    async fn test_unmatched_post_is_404() {
        let filter = routes(test_state());
        let res = warp::test::request()
            .method("POST")
            .path("/nowhere")
            .json(&json!({}))
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(res.body()), "Not found");
    }

    #[tokio::test]
    async fn test_storage_failure_reports_failed_action() {
        let filter = routes(state_with(Arc::new(FailingStore)));

        for (method, path, expected) in [
            ("GET", "/api/tasks", "Failed to fetch tasks"),
            ("GET", "/api/tasks/stats", "Failed to fetch statistics"),
            ("DELETE", "/api/tasks/3f1c1a52-8a44-4c39-9d0e-7d0c6b1b6f00", "Failed to delete task"),
        ] {
            let res = warp::test::request()
                .method(method)
                .path(path)
                .reply(&filter)
                .await;
            assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method} {path}");
            assert_eq!(error_message(res.body()), expected);
        }
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_not_served_index() {
        let filter = routes(test_state());
        let res = warp::test::request()
            .method("GET")
            .path("/api/unknown")
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
