use std::sync::Once;

use env_logger::fmt::TimestampPrecision;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax (e.g. "info",
/// "framepace=trace"). Frame timing is easier to read with sub-second
/// timestamps, hence the millisecond default.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub timestamp: Option<TimestampPrecision>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamp: Some(TimestampPrecision::Millis),
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder
            .write_style(config.write_style)
            .format_timestamp(config.timestamp);

        if builder.try_init().is_err() {
            // Another logger was installed first (tests, embedding host).
            return;
        }

        log::debug!("logging initialized");
    });
}
