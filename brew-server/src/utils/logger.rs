//! Logging Infrastructure
//!
//! Structured logging via `tracing-subscriber`, with optional daily rolling
//! file output.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with console output only
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` wins over `log_level` when it is set. File output is enabled
/// only when `log_dir` exists.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("brew_server={level},tower_http={level},{level}")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir() {
            let file_appender = tracing_appender::rolling::daily(log_path, "brew-server");
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
        eprintln!("LOG_DIR {dir} does not exist, logging to stdout");
    }

    subscriber.init();
}
