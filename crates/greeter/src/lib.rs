//! # Scaffold Greeter
//!
//! Demonstration application for the `scaffold` plugin framework. Two
//! plugins extend the application's hooks; the English plugin depends on
//! the Spanish one, so the Spanish farewell is registered first.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! greeter
//!
//! # Skip a plugin and print the report as JSON
//! greeter --skip es_plugin-1.0.0 --json-report
//!
//! # Verbose JSON logging
//! greeter --log-level debug --json-logs
//! ```
//!
//! ## Configuration
//!
//! Configuration is read from a TOML file (default: `greeter.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! SIGINT (Ctrl+C) or SIGTERM while plugins are loading cancels the load
//! pass at its next resolution step.

use tracing::error;

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod plugins;
mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Runs the greeter: parse arguments, set up logging, load the plugins and
/// print the report to stdout.
///
/// # Returns
///
/// `Ok(())` after the report is printed. Startup and run failures are
/// logged and end the process with exit code 1.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Load configuration to get logging settings
    let mut config = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default();
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    let json_report = args.json_report;
    let application = match Application::new(args).await {
        Ok(application) => application,
        Err(e) => {
            error!("❌ Failed to start application: {e}");
            std::process::exit(1);
        }
    };

    match application.run().await {
        Ok(report) if json_report => println!("{}", serde_json::to_string_pretty(&report)?),
        Ok(report) => print!("{report}"),
        Err(e) => {
            error!("❌ Application error: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

// Re-export main types for potential library usage
pub use app::{App, Fareweller, Greeter, Report};
pub use config::{LoggingSettings, PluginSettings};
