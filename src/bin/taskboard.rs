// 任务看板终端客户端
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use task_tracker::client::TaskApi;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Terminal board for the task tracker API")]
struct Args {
    /// API 服务地址
    #[arg(long, env = "TASKBOARD_SERVER_URL", default_value = "http://localhost:5000")]
    server_url: String,

    /// 日志文件，默认写到临时目录
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: PathBuf) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    // 终端被看板占用，日志只写文件
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_file = args
        .log_file
        .unwrap_or_else(|| std::env::temp_dir().join("taskboard.log"));
    init_logging(log_file)?;

    tracing::info!(server = %args.server_url, "Starting taskboard");
    task_tracker::tui::run(TaskApi::new(args.server_url)).await
}
