use std::io;

use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use crossterm::execute;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

pub type BoardTerminal = Terminal<CrosstermBackend<io::Stdout>>;

pub fn setup_terminal() -> io::Result<BoardTerminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

pub fn restore_terminal(terminal: &mut BoardTerminal) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}
