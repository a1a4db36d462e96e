//! Plugin manager owning the registry of plugins

use crate::context::Context;
use crate::error::{ErrorKind, ScaffoldError};
use crate::loader::Loader;
use crate::plugin::{Dependency, Info, Plugin, PluginRecord};
use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Plugin manager for registering plugins and mounting them against an application
pub struct Manager<T> {
    /// Registered plugins by name
    plugins: DashMap<String, Arc<PluginRecord<T>>>,
}

impl<T> Default for Manager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Manager<T> {
    pub fn new() -> Self {
        Self {
            plugins: DashMap::new(),
        }
    }

    /// Register a plugin, replacing any plugin registered under the same name.
    pub fn register<P>(&self, plugin: P)
    where
        P: Plugin<T> + 'static,
    {
        self.register_boxed(Box::new(plugin));
    }

    /// Register an already boxed plugin.
    ///
    /// A plugin without a name has no identity and is ignored.
    pub fn register_boxed(&self, plugin: Box<dyn Plugin<T>>) {
        let record = PluginRecord::new(plugin);
        if record.name().is_empty() {
            warn!("⚠️ Ignoring plugin registered without a name");
            return;
        }
        self.plugins
            .insert(record.name().to_string(), Arc::new(record));
    }

    /// Mount every registered plugin against `app`.
    ///
    /// Returns the first error; plugins mounted before it stay mounted.
    pub fn load(&self, app: &T, loaders: Vec<Box<dyn Loader>>) -> Result<(), ScaffoldError> {
        self.load_with_cancellation(CancellationToken::new(), app, loaders)
    }

    /// Mount every registered plugin, stopping at the next resolution step
    /// once `cancel` fires.
    pub fn load_with_cancellation(
        &self,
        cancel: CancellationToken,
        app: &T,
        loaders: Vec<Box<dyn Loader>>,
    ) -> Result<(), ScaffoldError> {
        let ctx = Context::new(self, app, loaders, cancel);
        let names = self.names();

        info!("🔌 Loading {} registered plugin(s)", names.len());
        for name in &names {
            if let Err(e) = ctx.lazy(name) {
                if e.kind() == ErrorKind::Cancelled {
                    warn!("🛑 Plugin loading cancelled");
                }
                return Err(e);
            }
        }

        info!("🎉 Plugin loading complete: {} plugin(s)", names.len());
        Ok(())
    }

    /// Resolve a single plugin and its dependencies outside a full pass.
    pub fn lazy(
        &self,
        app: &T,
        name: &str,
        loaders: Vec<Box<dyn Loader>>,
    ) -> Result<(), ScaffoldError> {
        Context::new(self, app, loaders, CancellationToken::new()).lazy(name)
    }

    /// Snapshot of a plugin's name, mount runtime and dependencies.
    pub fn lookup(&self, name: &str) -> Option<Info> {
        self.record(name).map(|record| record.stat())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.record(name).is_some_and(|record| record.is_loaded())
    }

    /// Number of registered plugins
    pub fn count(&self) -> usize {
        self.plugins.len()
    }

    /// Registered plugin names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .plugins
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Every recorded dependency edge across all plugins, sorted
    pub fn graph(&self) -> Vec<Dependency> {
        let mut deps: Vec<Dependency> = self
            .plugins
            .iter()
            .flat_map(|entry| entry.value().stat().dependencies)
            .collect();
        deps.sort();
        deps
    }

    /// Clone the record out so no map guard is held while a plugin mounts.
    pub(crate) fn record(&self, name: &str) -> Option<Arc<PluginRecord<T>>> {
        self.plugins.get(name).map(|entry| entry.value().clone())
    }
}

impl<T> std::fmt::Debug for Manager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("plugins", &self.names())
            .finish()
    }
}
