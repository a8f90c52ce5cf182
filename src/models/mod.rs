use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// 切换完成状态：completed 回到 pending，其余一律变为 completed
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::InProgress => Self::Completed,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownVariant {
                kind: "priority",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(fields: TaskFields, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            status: fields.status,
            priority: fields.priority,
            category: fields.category,
            due_date: fields.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// 整体覆盖可变字段，updated_at 不早于 created_at
    pub fn apply(&mut self, fields: TaskFields, now: DateTime<Utc>) {
        self.title = fields.title;
        self.description = fields.description;
        self.status = fields.status;
        self.priority = fields.priority;
        self.category = fields.category;
        self.due_date = fields.due_date;
        self.updated_at = now.max(self.created_at);
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// 经过校验的可变字段集合
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(
        required,
        length(min = 1, max = 100, message = "Title must be between 1 and 100 characters")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[validate(
        required,
        length(min = 1, max = 500, message = "Description must be between 1 and 500 characters")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[validate(length(max = 50, message = "Category must be less than 50 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(
        default,
        deserialize_with = "date_like",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    /// 校验并解析，缺省或空白的 status/priority 取默认值
    pub fn into_fields(self) -> Result<TaskFields, ValidationErrors> {
        self.validate()?;

        let status = match non_blank(self.status) {
            Some(raw) => parse_field::<TaskStatus>("status", &raw)?,
            None => TaskStatus::default(),
        };
        let priority = match non_blank(self.priority) {
            Some(raw) => parse_field::<TaskPriority>("priority", &raw)?,
            None => TaskPriority::default(),
        };

        Ok(TaskFields {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status,
            priority,
            category: non_blank(self.category),
            due_date: due_date_field(self.due_date)?,
        })
    }
}

/// 更新采用整体替换：title/description/status/priority 必填，
/// category 与 dueDate 缺省即清空
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(
        required,
        length(min = 1, max = 100, message = "Title must be between 1 and 100 characters")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[validate(
        required,
        length(min = 1, max = 500, message = "Description must be between 1 and 500 characters")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(required)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[validate(required)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[validate(length(max = 50, message = "Category must be less than 50 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(
        default,
        deserialize_with = "date_like",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<String>,
}

impl UpdateTaskRequest {
    pub fn into_fields(self) -> Result<TaskFields, ValidationErrors> {
        self.validate()?;

        let status = parse_field::<TaskStatus>("status", self.status.as_deref().unwrap_or(""))?;
        let priority =
            parse_field::<TaskPriority>("priority", self.priority.as_deref().unwrap_or(""))?;

        Ok(TaskFields {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status,
            priority,
            category: non_blank(self.category),
            due_date: due_date_field(self.due_date)?,
        })
    }
}

impl From<&Task> for UpdateTaskRequest {
    fn from(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
            status: Some(task.status.to_string()),
            priority: Some(task.priority.to_string()),
            category: task.category.clone(),
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub in_progress_tasks: u64,
    pub pending_tasks: u64,
    pub completion_rate: u32,
}

impl TaskStats {
    pub fn from_counts(total: u64, completed: u64, in_progress: u64, pending: u64) -> Self {
        Self {
            total_tasks: total,
            completed_tasks: completed,
            in_progress_tasks: in_progress,
            pending_tasks: pending,
            completion_rate: completion_rate(completed, total),
        }
    }
}

pub fn completion_rate(completed: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 接受 `YYYY-MM-DD`、RFC 3339 时间戳或不带时区的日期时间
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateLike {
    EpochMillis(i64),
    Text(String),
}

/// dueDate 可以是字符串，也可以是毫秒时间戳
fn date_like<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DateLike>::deserialize(deserializer)?.map(|value| match value {
        DateLike::Text(text) => text,
        // 超出范围的时间戳原样保留，交给校验报错
        DateLike::EpochMillis(ms) => DateTime::<Utc>::from_timestamp_millis(ms)
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_else(|| ms.to_string()),
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn due_date_field(raw: Option<String>) -> Result<Option<NaiveDate>, ValidationErrors> {
    match non_blank(raw) {
        Some(raw) => parse_due_date(&raw)
            .map(Some)
            .ok_or_else(|| field_error("due_date", "invalid_date")),
        None => Ok(None),
    }
}

fn parse_field<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ValidationErrors> {
    raw.parse::<T>()
        .map_err(|_| field_error(field, "invalid_variant"))
}

fn field_error(field: &'static str, code: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, ValidationError::new(code));
    errors
}
