//! Main application logic and lifecycle management.
//!
//! The [`App`] value owns the hooks the plugins extend; [`Application`] wires
//! configuration, the plugin manager and a load pass together.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    logging::display_banner,
    plugins::{EnPlugin, EsPlugin},
    signals::cancel_on_interrupt,
};
use scaffold::{Dependency, Hook, Info, Manager, TaggedHook, Tagger};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Tag a farewell must carry for the close handlers to run
pub const FAREWELL_TAG: &str = "romantic";

/// Payload of the run hook
#[derive(Debug, Clone, Default)]
pub struct Greeter {
    pub greetings: Vec<String>,
}

/// Payload of the close hook
#[derive(Debug, Clone)]
pub struct Fareweller {
    pub salutations: Vec<String>,
    tags: Vec<String>,
}

impl Fareweller {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            salutations: Vec::new(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for Fareweller {
    fn default() -> Self {
        Self::new([FAREWELL_TAG])
    }
}

impl Tagger for Fareweller {
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// The application value plugins are mounted against
#[derive(Debug)]
pub struct App {
    greeter: Hook<Greeter>,
    fareweller: TaggedHook<Fareweller>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            greeter: Hook::new(),
            fareweller: TaggedHook::new(Arc::new(Hook::new()), [FAREWELL_TAG]),
        }
    }

    /// Hook triggered when the application runs
    pub fn on_run(&self) -> &Hook<Greeter> {
        &self.greeter
    }

    /// Hook triggered when the application closes
    pub fn on_close(&self) -> &TaggedHook<Fareweller> {
        &self.fareweller
    }
}

/// What one run of the application produced
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub greetings: Vec<String>,
    pub salutations: Vec<String>,
    pub plugins: Vec<Info>,
    pub graph: Vec<Dependency>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[*] Running...")?;
        for greeting in &self.greetings {
            writeln!(f, "{greeting}")?;
        }
        writeln!(f, "\n[!] Closing...")?;
        for salutation in &self.salutations {
            writeln!(f, "{salutation}")?;
        }
        writeln!(f, "\n[+] Dependency Graph:")?;
        for dep in &self.graph {
            writeln!(f, "{dep}")?;
        }
        Ok(())
    }
}

/// Main application struct.
///
/// Holds the validated configuration, the plugin manager with every
/// greeting plugin registered, and the application value they extend.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Plugin registry
    manager: Arc<Manager<App>>,
    /// Hooks the plugins attach to
    app: Arc<App>,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// # Arguments
    ///
    /// * `args` - Parsed command-line arguments
    ///
    /// # Returns
    ///
    /// An `Application` with every greeting plugin registered, or an error
    /// if the configuration could not be read or failed validation.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating a default if missing)
    /// 2. Apply command-line overrides; `--skip` names are added to `plugins.skip`
    /// 3. Validate the merged configuration
    /// 4. Register the plugins and log the startup banner
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }
        if args.json_logs {
            config.logging.json_format = true;
        }
        for name in args.skip {
            if !config.plugins.skip.contains(&name) {
                config.plugins.skip.push(name);
            }
        }

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        let application = Self::with_config(config);
        display_banner(&application.manager.names());
        Ok(application)
    }

    /// Builds the application from an already validated configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let manager = Manager::new();
        manager.register(EnPlugin);
        manager.register(EsPlugin);
        info!("🔌 Registered {} plugin(s)", manager.count());

        Self {
            config,
            manager: Arc::new(manager),
            app: Arc::new(App::new()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn manager(&self) -> &Manager<App> {
        &self.manager
    }

    /// Loads the plugins, cancelling the pass on interrupt, then triggers
    /// both hooks.
    ///
    /// # Returns
    ///
    /// The [`Report`] of what the plugins contributed, or the first error of
    /// the load pass (`cancelled` if an interrupt arrived first) or of a hook.
    pub async fn run(&self) -> Result<Report, Box<dyn std::error::Error>> {
        let token = CancellationToken::new();
        let interrupt = tokio::spawn(cancel_on_interrupt(token.clone()));
        let result = self.run_with_cancellation(token).await;
        interrupt.abort();
        result
    }

    /// Same as [`Application::run`] with a caller-controlled cancellation token.
    pub async fn run_with_cancellation(
        &self,
        token: CancellationToken,
    ) -> Result<Report, Box<dyn std::error::Error>> {
        let manager = self.manager.clone();
        let app = self.app.clone();
        let loaders = self.config.plugins.loaders();

        // Mounts are synchronous; keep them off the async workers
        tokio::task::spawn_blocking(move || {
            manager.load_with_cancellation(token, &app, loaders)
        })
        .await??;

        let mut greeter = Greeter::default();
        self.app.on_run().trigger(&mut greeter)?;

        let mut fareweller = Fareweller::default();
        self.app.on_close().trigger(&mut fareweller)?;

        Ok(Report {
            greetings: greeter.greetings,
            salutations: fareweller.salutations,
            plugins: self
                .manager
                .names()
                .iter()
                .filter_map(|name| self.manager.lookup(name))
                .collect(),
            graph: self.manager.graph(),
        })
    }
}
