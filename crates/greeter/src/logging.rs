//! Logging system setup and configuration.
//!
//! Initializes tracing-subscriber with human-readable or JSON output.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the logging system with the specified configuration.
///
/// Logs go to stderr so the run report on stdout stays clean.
///
/// # Arguments
///
/// * `config` - Logging configuration from the config file
/// * `json_format` - Whether to force JSON output format (CLI override)
///
/// # Returns
///
/// `Ok(())` once the global subscriber is installed, or an error if one
/// was already set.
///
/// # Features
///
/// * **Environment variable support** - `RUST_LOG` takes precedence over `config.level`
/// * **Flexible formatting** - Human-readable or JSON output
pub fn setup_logging(
    config: &LoggingSettings,
    json_format: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if json_format || config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_names(true),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    info!("🔧 Logging initialized with level: {}", log_level);
    Ok(())
}

/// Logs which greeter build is starting and the plugins it will mount.
///
/// # Arguments
///
/// * `plugins` - Registered plugin names, in load order
pub fn display_banner(plugins: &[String]) {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("UNK");
    info!("👋 Scaffold greeter v{} starting", version);
    info!("🔌 Plugins: {}", plugins.join(", "));
}
