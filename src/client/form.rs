//! 新建 / 编辑任务表单

use uuid::Uuid;

use crate::models::{CreateTaskRequest, Task, TaskPriority, TaskStatus, UpdateTaskRequest};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Category,
    DueDate,
    Status,
    Priority,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        Self::Title,
        Self::Description,
        Self::Category,
        Self::DueDate,
        Self::Status,
        Self::Priority,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title *",
            Self::Description => "Description *",
            Self::Category => "Category",
            Self::DueDate => "Due date (YYYY-MM-DD)",
            Self::Status => "Status",
            Self::Priority => "Priority",
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Status | Self::Priority)
    }

    fn next(self) -> Self {
        cycle(&Self::ALL, self, true)
    }

    fn prev(self) -> Self {
        cycle(&Self::ALL, self, false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    Create(CreateTaskRequest),
    Update(Uuid, UpdateTaskRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub editing_task_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub due_date: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub focus: FormField,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            editing_task_id: None,
            title: String::new(),
            description: String::new(),
            category: String::new(),
            due_date: String::new(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            focus: FormField::Title,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            editing_task_id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            focus: FormField::Title,
        }
    }

    pub fn heading(&self) -> &'static str {
        if self.editing_task_id.is_some() {
            "Edit Task"
        } else {
            "Add New Task"
        }
    }

    pub fn save_label(&self) -> &'static str {
        if self.editing_task_id.is_some() {
            "Update Task"
        } else {
            "Save Task"
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn text(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.title.clone(),
            FormField::Description => self.description.clone(),
            FormField::Category => self.category.clone(),
            FormField::DueDate => self.due_date.clone(),
            FormField::Status => self.status.to_string(),
            FormField::Priority => self.priority.to_string(),
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Category => Some(&mut self.category),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Status | FormField::Priority => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(text) = self.focused_text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    /// 在 status / priority 字段上切换取值
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            FormField::Status => self.status = cycle(&TaskStatus::ALL, self.status, forward),
            FormField::Priority => {
                self.priority = cycle(&TaskPriority::ALL, self.priority, forward)
            }
            _ => {}
        }
    }

    pub fn submit(&self) -> Result<FormSubmission, &'static str> {
        let title = self.title.trim();
        let description = self.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(REQUIRED_FIELDS_MESSAGE);
        }

        let submission = match self.editing_task_id {
            Some(id) => FormSubmission::Update(
                id,
                UpdateTaskRequest {
                    title: Some(title.to_string()),
                    description: Some(description.to_string()),
                    status: Some(self.status.to_string()),
                    priority: Some(self.priority.to_string()),
                    category: Some(self.category.clone()),
                    due_date: Some(self.due_date.clone()),
                },
            ),
            None => FormSubmission::Create(CreateTaskRequest {
                title: Some(title.to_string()),
                description: Some(description.to_string()),
                status: Some(self.status.to_string()),
                priority: Some(self.priority.to_string()),
                category: Some(self.category.clone()),
                due_date: Some(self.due_date.clone()),
            }),
        };
        Ok(submission)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    all[next]
}
