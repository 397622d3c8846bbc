use anyhow::{anyhow, Result};
use quill_config::LogConfig;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log files larger than this are truncated on startup.
const MAX_LOG_FILE_SIZE: u64 = 8 * 1024 * 1024;

const DEFAULT_STDERR_DIRECTIVES: &str = "quill=info,quill_core=info,quill_config=info";

/// Installs the global subscriber.
///
/// With a log file, everything allowed by the `[log]` config is written there.
/// Otherwise logs go to stderr, filtered by `RUST_LOG`.
pub fn init(maybe_log: Option<PathBuf>, log_config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let Some(log_path) = maybe_log else {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_STDERR_DIRECTIVES));

        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        return Ok(None);
    };

    if let Ok(metadata) = std::fs::metadata(&log_path) {
        if log_path.is_file() && metadata.len() > MAX_LOG_FILE_SIZE {
            std::fs::remove_file(&log_path)?;
        }
    }

    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow!("no file name in {log_path:?}"))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| anyhow!("{log_path:?} has no parent"))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(file_filter(log_config))
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(Some(guard))
}

/// `log-target` takes precedence over `max-level`.
fn file_filter(log_config: &LogConfig) -> EnvFilter {
    let directives = if log_config.log_target.is_empty() {
        log_config.max_level.as_str()
    } else {
        log_config.log_target.as_str()
    };

    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("debug"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_filter() {
        let mut log_config = LogConfig {
            max_level: "trace".into(),
            ..Default::default()
        };
        assert_eq!(file_filter(&log_config).to_string(), "trace");

        log_config.log_target = "quill_core=debug".into();
        assert_eq!(file_filter(&log_config).to_string(), "quill_core=debug");
    }
}
