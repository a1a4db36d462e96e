//! Ordered event hooks with early-stop propagation
//!
//! A [`Hook`] is a concurrent-safe queue of handlers over one payload type.
//! Triggering runs the handlers one by one in queue order. A handler
//! returning [`HookError::StopPropagation`] ends the chain without an
//! error; any other error ends the chain and is returned to the caller.

use crate::error::HookError;
use crate::utils::generate_hook_id;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Hook handler function
pub type Handler<E> = Arc<dyn Fn(&mut E) -> Result<(), HookError> + Send + Sync>;

/// Box a closure as a [`Handler`], e.g. for [`Hook::trigger_with`].
pub fn handler<E, F>(f: F) -> Handler<E>
where
    F: Fn(&mut E) -> Result<(), HookError> + Send + Sync + 'static,
{
    Arc::new(f)
}

struct HandlerPair<E> {
    id: String,
    handler: Handler<E>,
}

/// Concurrent-safe structure for handling event hooks (callback propagation)
pub struct Hook<E> {
    handlers: RwLock<Vec<HandlerPair<E>>>,
}

impl<E> Default for Hook<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Hook<E> {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register a handler at the end of the queue and return its id.
    pub fn add<F>(&self, f: F) -> String
    where
        F: Fn(&mut E) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write();
        let id = unique_id(&handlers);
        handlers.push(HandlerPair {
            id: id.clone(),
            handler: Arc::new(f),
        });
        trace!("📝 Registered hook handler {}", id);
        id
    }

    /// Register a handler at the front of the queue and return its id.
    pub fn pre_add<F>(&self, f: F) -> String
    where
        F: Fn(&mut E) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write();
        let id = unique_id(&handlers);
        handlers.insert(
            0,
            HandlerPair {
                id: id.clone(),
                handler: Arc::new(f),
            },
        );
        trace!("📝 Registered hook handler {} at the front", id);
        id
    }

    /// Remove a single handler by its id. Returns whether it was registered.
    pub fn remove(&self, id: &str) -> bool {
        let mut handlers = self.handlers.write();
        match handlers.iter().rposition(|pair| pair.id == id) {
            Some(index) => {
                handlers.remove(index);
                trace!("🗑️ Removed hook handler {}", id);
                true
            }
            None => false,
        }
    }

    /// Remove every registered handler.
    pub fn reset(&self) {
        self.handlers.write().clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    /// Run every registered handler against `event`.
    pub fn trigger(&self, event: &mut E) -> Result<(), HookError> {
        self.trigger_with(event, std::iter::empty())
    }

    /// Run every registered handler, then `one_off` handlers in the order
    /// given. The one-off handlers are not kept for later triggers.
    ///
    /// The queue is snapshotted before the first handler runs, so handlers
    /// may add, remove or trigger on this same hook; such changes apply to
    /// the next trigger.
    pub fn trigger_with<I>(&self, event: &mut E, one_off: I) -> Result<(), HookError>
    where
        I: IntoIterator<Item = Handler<E>>,
    {
        let mut handlers: Vec<Handler<E>> = {
            let registered = self.handlers.read();
            registered
                .iter()
                .map(|pair| pair.handler.clone())
                .collect()
        };
        handlers.extend(one_off);

        for f in &handlers {
            match f(event) {
                Ok(()) => continue,
                Err(HookError::StopPropagation) => {
                    trace!("⏹️ Hook propagation stopped");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

impl<E> fmt::Debug for Hook<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self
            .handlers
            .read()
            .iter()
            .map(|pair| pair.id.clone())
            .collect();
        f.debug_struct("Hook").field("handlers", &ids).finish()
    }
}

fn unique_id<E>(handlers: &[HandlerPair<E>]) -> String {
    loop {
        let id = generate_hook_id();
        if !handlers.iter().any(|pair| pair.id == id) {
            return id;
        }
    }
}
