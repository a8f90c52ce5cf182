//! 看板客户端：状态、更新、渲染与 HTTP 访问

pub mod api;
pub mod form;
pub mod state;
pub mod update;
pub mod view;

pub use api::{ClientError, TaskApi};
pub use form::{FormField, FormSubmission, TaskForm};
pub use state::{BoardState, Filters, PriorityFilter, StatusFilter, Toast, ToastKind};
pub use update::{ApiEvent, Command};
pub use view::{render, BoardView, StatCard, TaskCard};
