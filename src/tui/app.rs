use std::time::Instant;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::client::{BoardState, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// 终端看板：在看板状态之上加输入模式
#[derive(Debug, Default)]
pub struct TuiApp {
    pub board: BoardState,
    pub input_mode: InputMode,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理一次按键，返回需要发给服务端的命令
    pub fn handle_key(&mut self, key: KeyEvent, today: NaiveDate, now: Instant) -> Vec<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }

        if self.board.pending_delete.is_some() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.board.confirm_delete().into_iter().collect()
                }
                _ => {
                    self.board.cancel_delete();
                    Vec::new()
                }
            };
        }

        if self.board.form.is_some() {
            return self.handle_form_key(key, now);
        }

        if self.input_mode == InputMode::Search {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => self.board.pop_search_char(),
                KeyCode::Char(c) => self.board.push_search_char(c),
                _ => {}
            }
            return Vec::new();
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char('s') => self.board.cycle_status_filter(),
            KeyCode::Char('p') => self.board.cycle_priority_filter(),
            KeyCode::Char('a') => self.board.open_new_form(),
            KeyCode::Char('e') => {
                if let Some(task) = self.board.selected_task(today) {
                    self.board.open_edit_form(task.id);
                }
            }
            KeyCode::Char(' ') => {
                return self
                    .board
                    .selected_task(today)
                    .and_then(|task| self.board.toggle_command(task.id))
                    .into_iter()
                    .collect();
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.board.selected_task(today) {
                    self.board.request_delete(task.id);
                }
            }
            KeyCode::Char('r') => return BoardState::initial_commands(),
            KeyCode::Down | KeyCode::Char('j') => self.board.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.board.select_prev(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_form_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => self.board.close_form(),
            KeyCode::Enter => return self.board.submit_form(now).into_iter().collect(),
            _ => {
                let Some(form) = self.board.form.as_mut() else {
                    return Vec::new();
                };
                match key.code {
                    KeyCode::Tab => form.focus_next(),
                    KeyCode::BackTab => form.focus_prev(),
                    KeyCode::Left => form.cycle_choice(false),
                    KeyCode::Right => form.cycle_choice(true),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Char(c) => form.insert_char(c),
                    _ => {}
                }
            }
        }
        Vec::new()
    }
}
