//! Logging setup for the application.

use crate::config::{AppConfig, GlobalLogLevel, ProgressLogLevel};
use env_logger::{Builder, Env};
use log::LevelFilter;

const fn progress_filter(level: ProgressLogLevel) -> LevelFilter {
    match level {
        ProgressLogLevel::Trace => LevelFilter::Trace,
        ProgressLogLevel::Debug => LevelFilter::Debug,
        ProgressLogLevel::Info => LevelFilter::Info,
        ProgressLogLevel::Warn => LevelFilter::Warn,
    }
}

const fn global_filter(level: GlobalLogLevel) -> LevelFilter {
    match level {
        GlobalLogLevel::Trace => LevelFilter::Trace,
        GlobalLogLevel::Debug => LevelFilter::Debug,
        GlobalLogLevel::Info => LevelFilter::Info,
        GlobalLogLevel::Warn => LevelFilter::Warn,
        GlobalLogLevel::Error => LevelFilter::Error,
    }
}

/// Initializes the logger from the command-line levels.
///
/// `--log-level` sets the global filter and `--progress-log-level` the
/// filter of the progress reporter; `RUST_LOG` directives are applied on top
/// of both.
pub fn init_logger(config: &AppConfig) {
    let mut builder = Builder::new();
    builder.filter_level(global_filter(config.log_level));
    builder.filter_module(
        "voxel_forge::progress",
        progress_filter(config.progress_log_level),
    );
    builder.parse_env(Env::default());

    // A second initialization (tests driving `main` twice) keeps the first logger.
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }

    log::debug!(
        "Logger initialized with global log level: {:?}, progress log level: {:?}",
        config.log_level,
        config.progress_log_level
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(global_filter(GlobalLogLevel::Error), LevelFilter::Error);
        assert_eq!(global_filter(GlobalLogLevel::Info), LevelFilter::Info);
        assert_eq!(progress_filter(ProgressLogLevel::Warn), LevelFilter::Warn);
        assert_eq!(progress_filter(ProgressLogLevel::Trace), LevelFilter::Trace);
    }
}
