//! 命令与响应事件：看板状态机的输入输出
//!
//! 每个变更成功后都重新拉取完整列表与统计，两者是独立请求，返回顺序不定。

use std::time::Instant;

use uuid::Uuid;

use super::api::ClientError;
use super::form::FormSubmission;
use super::state::{BoardState, ToastKind};
use crate::models::{CreateTaskRequest, Task, TaskStats, TaskStatus, UpdateTaskRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchTasks,
    FetchStats,
    Create(CreateTaskRequest),
    Update(Uuid, UpdateTaskRequest),
    Toggle {
        id: Uuid,
        request: UpdateTaskRequest,
        status: TaskStatus,
    },
    Delete(Uuid),
}

impl Command {
    /// 这些命令期间显示加载遮罩
    pub fn shows_loading(&self) -> bool {
        matches!(
            self,
            Self::FetchTasks | Self::Create(_) | Self::Update(..) | Self::Delete(_)
        )
    }
}

#[derive(Debug)]
pub enum ApiEvent {
    TasksLoaded(Result<Vec<Task>, ClientError>),
    StatsLoaded(Result<TaskStats, ClientError>),
    Created(Result<Task, ClientError>),
    Updated(Result<Task, ClientError>),
    Toggled {
        status: TaskStatus,
        result: Result<Task, ClientError>,
    },
    Deleted(Result<(), ClientError>),
}

fn refresh() -> Vec<Command> {
    vec![Command::FetchTasks, Command::FetchStats]
}

impl BoardState {
    pub fn initial_commands() -> Vec<Command> {
        refresh()
    }

    /// 命令发出前调用
    pub fn begin(&mut self, command: &Command) {
        if command.shows_loading() {
            self.loading = true;
        }
    }

    /// 应用一次响应，返回需要继续发出的命令
    pub fn handle_api_event(&mut self, event: ApiEvent, now: Instant) -> Vec<Command> {
        match event {
            ApiEvent::TasksLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(tasks) => self.set_tasks(tasks),
                    Err(err) => {
                        tracing::warn!(error = %err, "Error fetching tasks");
                        self.toast("Failed to load tasks", ToastKind::Error, now);
                    }
                }
                Vec::new()
            }
            ApiEvent::StatsLoaded(result) => {
                match result {
                    Ok(stats) => self.stats = Some(stats),
                    Err(err) => tracing::warn!(error = %err, "Error fetching stats"),
                }
                Vec::new()
            }
            ApiEvent::Created(result) => {
                self.loading = false;
                self.finish_form_mutation(
                    result,
                    "Task created successfully!",
                    "Failed to create task",
                    now,
                )
            }
            ApiEvent::Updated(result) => {
                self.loading = false;
                self.finish_form_mutation(
                    result,
                    "Task updated successfully!",
                    "Failed to update task",
                    now,
                )
            }
            ApiEvent::Toggled { status, result } => match result {
                Ok(_) => {
                    self.toast(format!("Task marked as {status}!"), ToastKind::Success, now);
                    refresh()
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Error updating task status");
                    self.toast("Failed to update task status", ToastKind::Error, now);
                    Vec::new()
                }
            },
            ApiEvent::Deleted(result) => {
                self.loading = false;
                match result {
                    Ok(()) => {
                        self.toast("Task deleted successfully!", ToastKind::Success, now);
                        refresh()
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Error deleting task");
                        self.toast("Failed to delete task", ToastKind::Error, now);
                        Vec::new()
                    }
                }
            }
        }
    }

    fn finish_form_mutation(
        &mut self,
        result: Result<Task, ClientError>,
        success: &str,
        failure: &str,
        now: Instant,
    ) -> Vec<Command> {
        match result {
            Ok(_) => {
                self.toast(success, ToastKind::Success, now);
                self.close_form();
                refresh()
            }
            Err(err) => {
                tracing::warn!(error = %err, "{failure}");
                self.toast(failure, ToastKind::Error, now);
                Vec::new()
            }
        }
    }

    /// 表单提交：本地校验失败时只提示，不发请求
    pub fn submit_form(&mut self, now: Instant) -> Option<Command> {
        let form = self.form.as_ref()?;
        match form.submit() {
            Ok(FormSubmission::Create(req)) => Some(Command::Create(req)),
            Ok(FormSubmission::Update(id, req)) => Some(Command::Update(id, req)),
            Err(message) => {
                self.toast(message, ToastKind::Error, now);
                None
            }
        }
    }

    /// 完成状态切换，复用更新接口并发送完整文档
    pub fn toggle_command(&self, id: Uuid) -> Option<Command> {
        let task = self.find_task(id)?;
        let status = task.status.toggled();
        let mut request = UpdateTaskRequest::from(task);
        request.status = Some(status.to_string());
        Some(Command::Toggle {
            id,
            request,
            status,
        })
    }

    pub fn request_delete(&mut self, id: Uuid) {
        if self.find_task(id).is_some() {
            self.pending_delete = Some(id);
        }
    }

    pub fn confirm_delete(&mut self) -> Option<Command> {
        self.pending_delete.take().map(Command::Delete)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }
}
