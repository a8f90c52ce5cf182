//! 看板状态：任务镜像、筛选条件、表单与提示

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use uuid::Uuid;

use super::form::TaskForm;
use crate::models::{Task, TaskPriority, TaskStats, TaskStatus};

pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }

    /// all → pending → in-progress → completed → all
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(TaskStatus::Pending),
            Self::Only(TaskStatus::Pending) => Self::Only(TaskStatus::InProgress),
            Self::Only(TaskStatus::InProgress) => Self::Only(TaskStatus::Completed),
            Self::Only(TaskStatus::Completed) => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(TaskPriority),
}

impl PriorityFilter {
    pub fn matches(&self, priority: TaskPriority) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == priority,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(TaskPriority::High),
            Self::Only(TaskPriority::High) => Self::Only(TaskPriority::Medium),
            Self::Only(TaskPriority::Medium) => Self::Only(TaskPriority::Low),
            Self::Only(TaskPriority::Low) => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(priority) => priority.as_str(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
}

impl Filters {
    /// 三个条件取与；空搜索词匹配全部
    pub fn matches(&self, task: &Task) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = task.title.to_lowercase().contains(&term)
            || task.description.to_lowercase().contains(&term);

        matches_search && self.status.matches(task.status) && self.priority.matches(task.priority)
    }
}

/// 逾期优先，其次优先级降序，再按截止日期升序（无日期排后），最后创建时间降序
pub fn compare_tasks(a: &Task, b: &Task, today: NaiveDate) -> Ordering {
    b.is_overdue(today)
        .cmp(&a.is_overdue(today))
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

pub fn sort_tasks(tasks: &mut [Task], today: NaiveDate) {
    tasks.sort_by(|a, b| compare_tasks(a, b, today));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

/// 客户端的全部可变状态，显式传入更新与渲染函数
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub tasks: Vec<Task>,
    pub filtered_tasks: Vec<Task>,
    pub filters: Filters,
    pub stats: Option<TaskStats>,
    pub loading: bool,
    pub form: Option<TaskForm>,
    pub pending_delete: Option<Uuid>,
    pub selected: usize,
    pub toasts: Vec<Toast>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.apply_filters();
    }

    pub fn apply_filters(&mut self) {
        self.filtered_tasks = self
            .tasks
            .iter()
            .filter(|t| self.filters.matches(t))
            .cloned()
            .collect();
        self.clamp_selection();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.apply_filters();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.filters.search.push(c);
        self.apply_filters();
    }

    pub fn pop_search_char(&mut self) {
        self.filters.search.pop();
        self.apply_filters();
    }

    pub fn cycle_status_filter(&mut self) {
        self.filters.status = self.filters.status.next();
        self.apply_filters();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.filters.priority = self.filters.priority.next();
        self.apply_filters();
    }

    /// 当前筛选结果按展示顺序排列
    pub fn sorted_view(&self, today: NaiveDate) -> Vec<Task> {
        let mut view = self.filtered_tasks.clone();
        sort_tasks(&mut view, today);
        view
    }

    pub fn selected_task(&self, today: NaiveDate) -> Option<Task> {
        self.sorted_view(today).into_iter().nth(self.selected)
    }

    pub fn find_task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.filtered_tasks.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.filtered_tasks.len().saturating_sub(1));
    }

    pub fn open_new_form(&mut self) {
        self.form = Some(TaskForm::new());
    }

    pub fn open_edit_form(&mut self, id: Uuid) {
        if let Some(task) = self.find_task(id) {
            self.form = Some(TaskForm::edit(task));
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn editing_task_id(&self) -> Option<Uuid> {
        self.form.as_ref().and_then(|f| f.editing_task_id)
    }

    pub fn toast(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.toasts.push(Toast {
            message: message.into(),
            kind,
            shown_at: now,
        });
    }

    pub fn prune_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_TTL);
    }
}
