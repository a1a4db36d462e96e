//! Plugin trait definitions and the record the manager keeps per plugin

use crate::context::Context;
use crate::error::ScaffoldError;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A compile-time plugin mounted against an application of type `T`
pub trait Plugin<T>: Send + Sync {
    /// Returns the unique, stable name of this plugin
    fn name(&self) -> &str;

    /// Mount the plugin, extending the application reachable through `ctx`.
    ///
    /// Dependencies are declared by calling [`Context::lazy`] from here.
    fn mount(&self, ctx: &Context<'_, T>) -> Result<(), ScaffoldError>;
}

/// A plugin dependency relationship
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Dependency {
    /// Plugin that requested the dependency
    pub from: String,
    /// Plugin that was requested
    pub to: String,
}

impl Dependency {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Snapshot of what the manager knows about a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    /// Plugin name
    pub name: String,
    /// Time spent mounting the plugin, zero if it was never mounted
    pub runtime: Duration,
    /// Dependencies the plugin requested while mounting
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Default)]
struct RecordState {
    runtime: Option<Duration>,
    dependencies: Vec<Dependency>,
}

/// Manager-owned wrapper adding timing and dependency bookkeeping to a plugin
pub(crate) struct PluginRecord<T> {
    name: String,
    plugin: Box<dyn Plugin<T>>,
    state: RwLock<RecordState>,
}

impl<T> PluginRecord<T> {
    pub(crate) fn new(plugin: Box<dyn Plugin<T>>) -> Self {
        Self {
            name: plugin.name().to_string(),
            plugin,
            state: RwLock::new(RecordState::default()),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn mount(&self, ctx: &Context<'_, T>) -> Result<(), ScaffoldError> {
        self.plugin.mount(ctx)
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.state.read().runtime.is_some()
    }

    /// Mark the plugin as mounted.
    pub(crate) fn update_runtime(&self, elapsed: Duration) {
        // A mounted plugin always reports a non-zero runtime
        self.state.write().runtime = Some(elapsed.max(Duration::from_nanos(1)));
    }

    /// Record that this plugin requested `name`, once per target.
    pub(crate) fn depends_on(&self, name: &str) -> bool {
        let mut state = self.state.write();
        if state.dependencies.iter().any(|dep| dep.to == name) {
            return false;
        }
        state.dependencies.push(Dependency::new(self.name.as_str(), name));
        true
    }

    pub(crate) fn stat(&self) -> Info {
        let state = self.state.read();
        Info {
            name: self.name.clone(),
            runtime: state.runtime.unwrap_or_default(),
            dependencies: state.dependencies.clone(),
        }
    }
}

impl<T> fmt::Debug for PluginRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRecord")
            .field("name", &self.name)
            .field("state", &*self.state.read())
            .finish()
    }
}
