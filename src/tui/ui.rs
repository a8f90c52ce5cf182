use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{InputMode, TuiApp};
use crate::client::view::{BoardView, TaskCard};
use crate::client::{FormField, TaskForm, ToastKind};
use crate::models::TaskPriority;

pub fn draw(f: &mut Frame<'_>, app: &TuiApp, view: &BoardView) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(f, chunks[0], app, view);
    draw_stats(f, chunks[1], view);
    draw_tasks(f, chunks[2], view);
    draw_footer(f, chunks[3], app);

    if let Some(form) = &app.board.form {
        draw_form(f, size, form);
    }
    if let Some(title) = &view.confirm_delete {
        draw_confirm(f, size, title);
    }
    if view.loading {
        draw_loading(f, size);
    }
    draw_toasts(f, size, view);
}

fn draw_header(f: &mut Frame<'_>, area: Rect, app: &TuiApp, view: &BoardView) {
    let search_style = if app.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let line = Line::from(vec![
        Span::styled("Task Tracker", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  Search: "),
        Span::styled(format!("[{}]", view.search), search_style),
        Span::raw("  Status: "),
        Span::styled(view.status_filter, Style::default().fg(Color::Cyan)),
        Span::raw("  Priority: "),
        Span::styled(view.priority_filter, Style::default().fg(Color::Cyan)),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_stats(f: &mut Frame<'_>, area: Rect, view: &BoardView) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    for (card, column) in view.stats.iter().zip(columns.iter()) {
        let widget = Paragraph::new(Line::from(Span::styled(
            card.value.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(card.label));
        f.render_widget(widget, *column);
    }
}

fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::High => Color::Red,
        TaskPriority::Medium => Color::Yellow,
        TaskPriority::Low => Color::Green,
    }
}

fn card_item(card: &TaskCard) -> ListItem<'static> {
    let mut title_style = Style::default().add_modifier(Modifier::BOLD);
    if card.completed {
        title_style = title_style
            .add_modifier(Modifier::CROSSED_OUT)
            .fg(Color::DarkGray);
    }
    let check = if card.completed { "[x] " } else { "[ ] " };

    let mut first = vec![
        Span::raw(check),
        Span::styled(card.title.clone(), title_style),
        Span::raw("  "),
        Span::styled(
            card.priority.as_str().to_uppercase(),
            Style::default().fg(priority_color(card.priority)),
        ),
        Span::raw("  "),
        Span::styled(card.status_tag.clone(), Style::default().fg(Color::Cyan)),
    ];
    if card.overdue {
        first.push(Span::styled(
            "  OVERDUE",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let mut meta = Vec::new();
    if let Some(category) = &card.category {
        meta.push(Span::styled(
            format!("#{category}"),
            Style::default().fg(Color::Magenta),
        ));
    }
    if let Some(due) = &card.due {
        if !meta.is_empty() {
            meta.push(Span::raw("  "));
        }
        let due_style = if card.overdue {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Gray)
        };
        meta.push(Span::styled(format!("Due {due}"), due_style));
    }

    let mut lines = vec![
        Line::from(first),
        Line::from(Span::styled(
            format!("    {}", card.description),
            Style::default().fg(Color::Gray),
        )),
    ];
    if !meta.is_empty() {
        meta.insert(0, Span::raw("    "));
        lines.push(Line::from(meta));
    }
    ListItem::new(lines)
}

fn draw_tasks(f: &mut Frame<'_>, area: Rect, view: &BoardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Tasks ({})", view.cards.len()));

    if view.show_empty {
        let empty = Paragraph::new("No tasks found. Press 'a' to add one.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = view.cards.iter().map(card_item).collect();
    let selected = view.cards.iter().position(|c| c.selected);
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let hint = if app.board.pending_delete.is_some() {
        "y: confirm delete  any other key: cancel"
    } else if app.board.form.is_some() {
        "Tab/Shift+Tab: field  Left/Right: change  Enter: save  Esc: cancel"
    } else if app.input_mode == InputMode::Search {
        "Type to search  Enter/Esc: done"
    } else {
        "/: search  s/p: filter  a: add  e: edit  space: toggle  d: delete  r: refresh  q: quit"
    };
    let footer = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn draw_form(f: &mut Frame<'_>, size: Rect, form: &TaskForm) {
    let area = centered_rect(60, 60, size);
    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let focused = *field == form.focus;
            let value = if field.is_choice() {
                format!("< {} >", form.text(*field))
            } else {
                form.text(*field)
            };
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:<24}", field.label()), label_style),
                Span::raw(value),
            ])
        })
        .chain([
            Line::default(),
            Line::from(Span::styled(
                format!("[Enter] {}", form.save_label()),
                Style::default().fg(Color::Green),
            )),
        ])
        .collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(form.heading()));
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn draw_confirm(f: &mut Frame<'_>, size: Rect, title: &str) {
    let area = centered_rect(50, 20, size);
    let widget = Paragraph::new(format!("Are you sure you want to delete \"{title}\"? (y/n)"))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Delete Task"));
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn draw_loading(f: &mut Frame<'_>, size: Rect) {
    let area = centered_rect(20, 10, size);
    let widget = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn draw_toasts(f: &mut Frame<'_>, size: Rect, view: &BoardView) {
    if view.toasts.is_empty() || size.height < 3 {
        return;
    }
    let width = size.width.min(44);
    let height = (view.toasts.len() as u16 + 2).min(size.height - 1);
    let area = Rect::new(size.x + size.width - width, size.y, width, height);

    let lines: Vec<Line> = view
        .toasts
        .iter()
        .map(|t| {
            let color = match t.kind {
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
            };
            Line::from(Span::styled(t.message.clone(), Style::default().fg(color)))
        })
        .collect();
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::client::render;
    use crate::client::state::tests::{date, task};
    use crate::models::{TaskStats, TaskStatus};

    fn draw_text(app: &TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let view = render(&app.board, date(2024, 6, 1));
        terminal.draw(|f| draw(f, app, &view)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_empty_board() {
        let text = draw_text(&TuiApp::new());
        assert!(text.contains("No tasks found"));
        assert!(text.contains("Total Tasks"));
        assert!(text.contains("Completion Rate"));
    }

    #[test]
    fn test_cards_and_stats_are_drawn() {
        let mut app = TuiApp::new();
        let mut milk = task("Buy milk", TaskPriority::Low, Some(date(2000, 1, 1)), 1);
        milk.category = Some("errands".into());
        let mut report = task("Write report", TaskPriority::High, None, 2);
        report.status = TaskStatus::InProgress;
        app.board.set_tasks(vec![report, milk]);
        app.board.stats = Some(TaskStats::from_counts(2, 0, 1, 1));

        let text = draw_text(&app);
        assert!(text.contains("Buy milk"));
        assert!(text.contains("OVERDUE"));
        assert!(text.contains("Due Jan 1, 2000"));
        assert!(text.contains("#errands"));
        assert!(text.contains("in progress"));
        assert!(text.contains("Tasks (2)"));
        assert!(text.find("Buy milk") < text.find("Write report"));
    }

    #[test]
    fn test_form_and_toast_overlays() {
        let mut app = TuiApp::new();
        app.board.open_new_form();
        app.board
            .toast("Please fill in all required fields", ToastKind::Error, Instant::now());

        let text = draw_text(&app);
        assert!(text.contains("Add New Task"));
        assert!(text.contains("Save Task"));
        assert!(text.contains("< pending >"));
        assert!(text.contains("Please fill in all required fields"));
    }

    #[test]
    fn test_delete_prompt() {
        let mut app = TuiApp::new();
        let t = task("Pay rent", TaskPriority::Medium, None, 1);
        app.board.set_tasks(vec![t.clone()]);
        app.board.request_delete(t.id);

        let text = draw_text(&app);
        assert!(text.contains("Delete Task"));
        assert!(text.contains("y: confirm delete"));
    }
}
