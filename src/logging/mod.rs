//! Structured logging setup
//!
//! Diagnostics go to stderr through `tracing` so that command output on
//! stdout stays machine-readable. Correlation IDs tag every backend request
//! of a session.

pub mod correlation;

pub use correlation::generate_correlation_id;

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives for a logging config: the base level followed by
/// `pingpad::<component>=<level>` for each override, in component order.
///
/// ```
/// use pingpad::config::LoggingConfig;
/// use pingpad::logging::build_filter_directives;
///
/// let mut config = LoggingConfig::default();
/// config.level = "info".to_string();
/// config.component_levels.insert("analytics".to_string(), "debug".to_string());
///
/// assert_eq!(build_filter_directives(&config), "info,pingpad::analytics=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut directives = vec![config.level.clone()];
    directives.extend(
        config
            .component_levels
            .iter()
            .map(|(component, level)| format!("pingpad::{}={}", component, level)),
    );
    directives.join(",")
}

/// Initialize the global tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over the configured levels when set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(build_filter_directives(config)));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.show_target);
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Compact => registry.with(layer.compact()).try_init()?,
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
        LogFormat::Json => registry.with(layer.json()).try_init()?,
    }

    Ok(())
}
