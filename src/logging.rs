// Centralized tracing setup: runtime log levels from env, pretty console
// output, optional structured JSON file output.
use std::env;
use std::fs;
use std::sync::OnceLock;
use tracing_subscriber::{
    fmt,
    EnvFilter,
    layer::{SubscriberExt, Layer},
    util::SubscriberInitExt,
};

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

pub fn init_logging(bin_name: &str) -> eyre::Result<()> {
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let log_to_file = env::var("LOG_TO_FILE").unwrap_or_else(|_| "false".to_string()) == "true";

    // Everything outside this crate is capped at warn
    let env_filter_console = EnvFilter::try_new(
        format!("warn,strategy_arena={}", console_log_level)
    ).unwrap_or_else(|_| EnvFilter::new("strategy_arena=info"));

    let console_layer = fmt::Layer::new()
        .pretty()
        .with_filter(env_filter_console);

    if log_to_file {
        let env_filter_file = EnvFilter::try_new(
            format!("warn,strategy_arena={}", file_log_level)
        ).unwrap_or_else(|_| EnvFilter::new("strategy_arena=info"));

        let log_dir = std::path::Path::new("logs");
        fs::create_dir_all(log_dir)?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H:%M:%S");
        let file_appender =
            tracing_appender::rolling::never(log_dir, format!("{}_{}.log", bin_name, timestamp));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok();

        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(non_blocking)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(env_filter_file);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(console_layer)
            .init();
    }

    Ok(())
}
