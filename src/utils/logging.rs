/// 日志工具模块
///
/// 初始化 tracing，并提供日志格式化的辅助函数
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// 初始化日志：写入配置的日志文件，避免和终端界面混在一起
///
/// `RUST_LOG` 优先；否则按 `verbose_logging` 取 debug / info
pub fn init(config: &Config) -> AppResult<()> {
    init_log_file(&config.output_log_file)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.output_log_file)
        .map_err(|e| AppError::file_write_failed(&config.output_log_file, e))?;

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试里可能被重复初始化，忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n答题客户端日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - PDF 答题客户端");
    info!("🌐 API 地址: {}", config.api_base_url);
    info!("📄 题目文档: {}", config.document_url);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
