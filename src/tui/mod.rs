//! 终端看板：输入线程 + API 结果通道 + 定时器，三路 select 驱动重绘

mod app;
mod events;
mod terminal;
mod ui;

use std::time::{Duration, Instant};

use chrono::Local;
use tokio::sync::mpsc;

use crate::client::{render, ApiEvent, BoardState, Command, TaskApi};
pub use app::{InputMode, TuiApp};
use events::InputReader;
pub use terminal::{restore_terminal, setup_terminal, BoardTerminal};

const TICK: Duration = Duration::from_millis(250);

pub async fn run(api: TaskApi) -> anyhow::Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = TuiApp::new();
    let result = run_on_terminal(&mut terminal, &mut app, api).await;
    restore_terminal(&mut terminal);
    result
}

/// 每条命令各自发一个请求，不取消、不去重，后到的结果覆盖先到的
fn dispatch(
    app: &mut TuiApp,
    api: &TaskApi,
    tx: &mpsc::UnboundedSender<ApiEvent>,
    commands: Vec<Command>,
) {
    for command in commands {
        app.board.begin(&command);
        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let event = api.execute(command).await;
            let _ = tx.send(event);
        });
    }
}

pub async fn run_on_terminal(
    terminal: &mut BoardTerminal,
    app: &mut TuiApp,
    api: TaskApi,
) -> anyhow::Result<()> {
    tracing::debug!(server = api.base_url(), "Taskboard event loop starting");
    let (input_reader, mut input_rx) = InputReader::start();
    let (api_tx, mut api_rx) = mpsc::unbounded_channel();
    let mut tick = tokio::time::interval(TICK);

    dispatch(app, &api, &api_tx, BoardState::initial_commands());

    loop {
        let today = Local::now().date_naive();
        let view = render(&app.board, today);
        terminal.draw(|f| ui::draw(f, app, &view))?;

        tokio::select! {
            Some(key) = input_rx.recv() => {
                let commands = app.handle_key(key, today, Instant::now());
                dispatch(app, &api, &api_tx, commands);
            }
            Some(event) = api_rx.recv() => {
                let commands = app.board.handle_api_event(event, Instant::now());
                dispatch(app, &api, &api_tx, commands);
            }
            _ = tick.tick() => {
                app.board.prune_toasts(Instant::now());
            }
        }

        if app.should_quit {
            tracing::debug!("Exiting taskboard loop");
            break;
        }
    }

    input_reader.stop();
    Ok(())
}
