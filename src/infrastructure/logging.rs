use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LogFormat;
use crate::domain::DomainError;

pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Map the accepted level vocabulary onto `tracing` directives
///
/// `fatal` and `panic` have no `tracing` counterpart and fold into `error`.
pub fn filter_directive(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" | "fatal" | "panic" => Some("error"),
        _ => None,
    }
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), DomainError> {
    let directive = filter_directive(&config.level).ok_or_else(|| {
        DomainError::configuration(format!("Unknown log level '{}'", config.level))
    })?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
    };

    result.map_err(|e| DomainError::configuration(format!("Failed to init logging: {}", e)))?;

    tracing::info!("Logging initialized with level: {}", directive);
    Ok(())
}
