//! Loading context handed to every plugin mount
//!
//! One [`Context`] lives for one load pass. It owns the resolution stack
//! that every nested [`Context::lazy`] call shares, so cycle detection and
//! the latched failure are visible across the whole recursion tree.

use crate::error::ScaffoldError;
use crate::loader::Loader;
use crate::manager::Manager;
use crate::stack::Stack;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Transient context for mounting the plugins registered in a [`Manager`]
pub struct Context<'a, T> {
    app: &'a T,
    manager: &'a Manager<T>,
    loaders: Vec<Box<dyn Loader>>,
    stack: Stack<String>,
    cancel: CancellationToken,
    /// Values published by plugins for the rest of the pass
    values: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl<'a, T> Context<'a, T> {
    pub(crate) fn new(
        manager: &'a Manager<T>,
        app: &'a T,
        loaders: Vec<Box<dyn Loader>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            app,
            manager,
            loaders,
            stack: Stack::new(),
            cancel,
            values: RwLock::new(HashMap::new()),
        }
    }

    /// The application the plugins are being mounted against
    pub fn app(&self) -> &'a T {
        self.app
    }

    /// Cancellation signal of this load pass
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The error that ends this pass, if any: the latched failure first,
    /// then cancellation.
    pub fn err(&self) -> Option<ScaffoldError> {
        self.stack
            .err()
            .or_else(|| self.cancel.is_cancelled().then_some(ScaffoldError::Cancelled))
    }

    /// Publish a value for every plugin mounted later in this pass.
    ///
    /// Values are keyed by type; inserting a second value of the same type
    /// replaces the first.
    pub fn insert<V: Send + Sync + 'static>(&self, value: V) {
        self.values.write().insert(TypeId::of::<V>(), Arc::new(value));
    }

    /// Read a value published with [`Context::insert`].
    pub fn get<V: Send + Sync + 'static>(&self) -> Option<Arc<V>> {
        let value = self.values.read().get(&TypeId::of::<V>()).cloned()?;
        value.downcast::<V>().ok()
    }

    /// Lazily load a plugin by name. Call this from a mount to declare a
    /// dependency; the dependency is mounted first unless it already is.
    ///
    /// The request goes through the interception loaders of this pass
    /// before it reaches the resolver. A loader may resolve several names
    /// for one request; each is recorded as a dependency of the caller.
    pub fn lazy(&self, name: &str) -> Result<(), ScaffoldError> {
        let depth = self.stack.size();
        let requester = self.stack.peek();
        let result = self.dispatch(&self.loaders, name, requester.as_deref(), depth);
        self.stack.truncate(depth);
        result
    }

    fn dispatch(
        &self,
        loaders: &[Box<dyn Loader>],
        name: &str,
        requester: Option<&str>,
        depth: usize,
    ) -> Result<(), ScaffoldError> {
        match loaders.split_first() {
            None => self.resolve(name, requester, depth),
            Some((loader, rest)) => loader.intercept(name, &|next: &str| {
                self.dispatch(rest, next, requester, depth)
            }),
        }
    }

    /// Load `name` for `requester`, then bring the stack back to `depth`.
    fn resolve(
        &self,
        name: &str,
        requester: Option<&str>,
        depth: usize,
    ) -> Result<(), ScaffoldError> {
        let result = self.load(name, requester).and_then(|()| match requester {
            Some(requester) => self.drain(depth, requester),
            None => Ok(()),
        });

        // Nothing resolved by this request stays on the stack
        self.stack.truncate(depth);
        result
    }

    fn load(&self, name: &str, requester: Option<&str>) -> Result<(), ScaffoldError> {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let Some(plugin) = self.manager.record(name) else {
            return Err(if self.stack.is_empty() {
                ScaffoldError::PluginNotRegistered(name.to_string())
            } else {
                ScaffoldError::MissingDependency(name.to_string())
            });
        };

        if plugin.is_loaded() {
            if let Some(requester) = requester {
                self.record_edge(requester, name);
            }
            return Ok(());
        }

        if requester == Some(name) {
            return Err(ScaffoldError::SelfReferentialDependency(name.to_string()));
        }
        if self.stack.contains(name) {
            return Err(ScaffoldError::CircularDependency(name.to_string()));
        }

        self.stack.push(name.to_string());
        let index = self.stack.size() - 1;

        debug!("🔧 Mounting plugin: {}", name);
        let start = Instant::now();
        if let Err(err) = plugin.mount(self) {
            let err = err.in_plugin(name);
            warn!("❌ Plugin {} failed to mount: {}", name, err);
            self.stack.catch(err.clone());
            return Err(err);
        }
        let elapsed = start.elapsed();
        plugin.update_runtime(elapsed);
        debug!(plugin = name, ?elapsed, "✅ Plugin mounted");

        self.drain(index + 1, name).map_err(|err| err.in_plugin(name))
    }

    /// Pop every entry above `len`, recording each as a dependency of `owner`.
    fn drain(&self, len: usize, owner: &str) -> Result<(), ScaffoldError> {
        loop {
            if let Some(err) = self.stack.err() {
                return Err(err);
            }
            if self.stack.size() <= len {
                return Ok(());
            }
            if let Some(top) = self.stack.pop() {
                self.record_edge(owner, &top);
            }
        }
    }

    fn record_edge(&self, from: &str, to: &str) {
        if let Some(record) = self.manager.record(from) {
            if record.depends_on(to) {
                trace!("🔗 Recorded dependency {}->{}", from, to);
            }
        }
    }
}

impl<T> std::fmt::Debug for Context<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("loaders", &self.loaders.len())
            .field("stack", &self.stack)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
