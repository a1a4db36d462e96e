//! Command-line interface handling for the greeter demo.
//!
//! Flags given here override the matching settings of the configuration file.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "greeter.toml";

/// Command line arguments parsed from user input.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Plugin names to skip in addition to the configured ones
    pub skip: Vec<String>,
    /// Print the run report as JSON instead of text
    pub json_report: bool,
}

/// Builds the clap command describing every supported flag.
pub fn command() -> Command {
    Command::new("greeter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mounts the greeting plugins and prints what they contributed")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip")
                .short('s')
                .long("skip")
                .value_name("PLUGIN")
                .help("Skip loading a plugin by name (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("json-report")
                .long("json-report")
                .help("Print the run report as JSON")
                .action(ArgAction::SetTrue),
        )
}

impl CliArgs {
    /// Parses command line arguments using clap.
    ///
    /// # Returns
    ///
    /// A `CliArgs` instance containing all parsed command-line options.
    ///
    /// # Exits
    ///
    /// Prints usage and exits the process on unknown flags or `--help`.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Builds the arguments from matches of [`command`].
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            skip: matches
                .get_many::<String>("skip")
                .map(|names| names.cloned().collect())
                .unwrap_or_default(),
            json_report: matches.get_flag("json-report"),
        }
    }
}
