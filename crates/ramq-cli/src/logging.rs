//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Levels follow the validator's conventions: `error` for rule failures,
//! `warn` for non-fatal conditions like an empty catalogue match, `info`
//! for run summaries, `debug` for grouping counters.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` override the level when no explicit flag was given.
    pub use_env_filter: bool,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            format: LogFormat::default(),
            with_ansi: true,
            log_file: None,
        }
    }
}

/// Initialize the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let filter = if config.use_env_filter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level_filter.to_string()))
    } else {
        EnvFilter::new(config.level_filter.to_string())
    };

    macro_rules! init_with_writer {
        ($writer:expr) => {
            match config.format {
                LogFormat::Json => {
                    let layer = fmt::layer().json().with_writer($writer);
                    tracing_subscriber::registry().with(filter).with(layer).init();
                }
                LogFormat::Compact => {
                    let layer = fmt::layer()
                        .compact()
                        .with_writer($writer)
                        .with_ansi(config.with_ansi)
                        .with_target(false)
                        .without_time();
                    tracing_subscriber::registry().with(filter).with(layer).init();
                }
                LogFormat::Pretty => {
                    let layer = fmt::layer()
                        .with_writer($writer)
                        .with_ansi(config.with_ansi)
                        .with_target(false)
                        .without_time();
                    tracing_subscriber::registry().with(filter).with(layer).init();
                }
            }
        };
    }

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_with_writer!(std::sync::Arc::new(file));
    } else {
        init_with_writer!(io::stderr);
    }
    Ok(())
}
