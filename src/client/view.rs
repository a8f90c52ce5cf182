//! 纯渲染：由状态生成完整的视图描述

use chrono::NaiveDate;
use uuid::Uuid;

use super::state::{BoardState, ToastKind};
use crate::models::{TaskPriority, TaskStats, TaskStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct TaskCard {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub overdue: bool,
    pub category: Option<String>,
    pub due: Option<String>,
    pub status_tag: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub cards: Vec<TaskCard>,
    pub stats: Vec<StatCard>,
    pub show_empty: bool,
    pub loading: bool,
    pub toasts: Vec<ToastView>,
    pub search: String,
    pub status_filter: &'static str,
    pub priority_filter: &'static str,
    pub confirm_delete: Option<String>,
}

/// Mon D, YYYY
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn stat_cards(stats: Option<&TaskStats>) -> Vec<StatCard> {
    let (total, completed, in_progress, rate) = stats
        .map(|s| {
            (
                s.total_tasks,
                s.completed_tasks,
                s.in_progress_tasks,
                s.completion_rate,
            )
        })
        .unwrap_or_default();

    vec![
        StatCard {
            label: "Total Tasks",
            value: total.to_string(),
        },
        StatCard {
            label: "Completed",
            value: completed.to_string(),
        },
        StatCard {
            label: "In Progress",
            value: in_progress.to_string(),
        },
        StatCard {
            label: "Completion Rate",
            value: format!("{rate}%"),
        },
    ]
}

pub fn render(state: &BoardState, today: NaiveDate) -> BoardView {
    let cards: Vec<TaskCard> = state
        .sorted_view(today)
        .into_iter()
        .enumerate()
        .map(|(idx, task)| TaskCard {
            id: task.id,
            completed: task.status == TaskStatus::Completed,
            overdue: task.is_overdue(today),
            due: task.due_date.map(format_due_date),
            status_tag: task.status.as_str().replace('-', " "),
            status: task.status,
            priority: task.priority,
            selected: idx == state.selected,
            title: task.title,
            description: task.description,
            category: task.category,
        })
        .collect();

    let confirm_delete = state
        .pending_delete
        .and_then(|id| state.find_task(id))
        .map(|t| t.title.clone());

    BoardView {
        show_empty: cards.is_empty(),
        cards,
        stats: stat_cards(state.stats.as_ref()),
        loading: state.loading,
        toasts: state
            .toasts
            .iter()
            .map(|t| ToastView {
                message: t.message.clone(),
                kind: t.kind,
            })
            .collect(),
        search: state.filters.search.clone(),
        status_filter: state.filters.status.label(),
        priority_filter: state.filters.priority.label(),
        confirm_delete,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::client::state::tests::{date, task};

    #[test]
    fn test_due_date_format() {
        assert_eq!(format_due_date(date(2024, 3, 5)), "Mar 5, 2024");
        assert_eq!(format_due_date(date(2024, 12, 25)), "Dec 25, 2024");
    }

    #[test]
    fn test_empty_state() {
        let view = render(&BoardState::new(), date(2024, 6, 1));
        assert!(view.show_empty);
        assert!(!view.loading);
        assert_eq!(view.stats[0].value, "0");
        assert_eq!(view.stats[3].value, "0%");
        assert_eq!(view.status_filter, "all");
    }

    #[test]
    fn test_cards_follow_sort_order() {
        let mut state = BoardState::new();
        let mut milk = task("Buy milk", TaskPriority::Low, Some(date(2000, 1, 1)), 1);
        milk.category = Some("errands".into());
        let mut report = task("Report", TaskPriority::High, None, 2);
        report.status = TaskStatus::InProgress;
        state.set_tasks(vec![report, milk]);

        let view = render(&state, date(2024, 6, 1));
        assert!(!view.show_empty);
        let first = &view.cards[0];
        assert_eq!(first.title, "Buy milk");
        assert!(first.overdue);
        assert!(first.selected);
        assert_eq!(first.due.as_deref(), Some("Jan 1, 2000"));
        assert_eq!(first.category.as_deref(), Some("errands"));

        let second = &view.cards[1];
        assert_eq!(second.status_tag, "in progress");
        assert!(!second.overdue);
        assert!(!second.selected);
    }

    #[test]
    fn test_stats_cards_from_latest_response() {
        let mut state = BoardState::new();
        state.stats = Some(TaskStats::from_counts(3, 2, 1, 0));
        let view = render(&state, date(2024, 6, 1));
        let values: Vec<_> = view.stats.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["3", "2", "1", "67%"]);
        assert_eq!(view.stats[3].label, "Completion Rate");
    }

    #[test]
    fn test_overlay_toasts_and_delete_prompt() {
        let mut state = BoardState::new();
        let t = task("Pay rent", TaskPriority::Medium, None, 1);
        state.set_tasks(vec![t.clone()]);
        state.loading = true;
        state.toast("Task updated successfully!", ToastKind::Success, Instant::now());
        state.request_delete(t.id);

        let view = render(&state, date(2024, 6, 1));
        assert!(view.loading);
        assert_eq!(view.toasts[0].message, "Task updated successfully!");
        assert_eq!(view.confirm_delete.as_deref(), Some("Pay rent"));
    }
}
