//! 任务追踪：REST 服务端与终端看板客户端

pub mod client;
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod tui;
