//! 应用状态与服务层

pub mod memory;
pub mod postgres;
pub mod store;
pub mod tasks;

use std::sync::Arc;

use crate::config::{AppConfig, DatabaseConfig};

pub use memory::MemoryTaskStore;
pub use postgres::PgTaskStore;
pub use store::{StoreError, TaskStore};
pub use tasks::{ServiceError, TaskService};

pub struct AppState {
    pub config: AppConfig,
    pub tasks: TaskService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, StoreError> {
        let store = open_store(&config.database).await?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn TaskStore>) -> Self {
        Self {
            config,
            tasks: TaskService::new(store),
        }
    }
}

/// 根据连接串的 scheme 选择存储后端
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn TaskStore>, StoreError> {
    let url = config.url.as_str();
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(Arc::new(PgTaskStore::connect(config).await?))
    } else if url.starts_with("memory://") {
        tracing::warn!("Using in-memory task store; data is lost on restart");
        Ok(Arc::new(MemoryTaskStore::new()))
    } else {
        Err(StoreError::UnsupportedUrl(url.to_string()))
    }
}
