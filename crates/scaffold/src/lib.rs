//! # Scaffold
//!
//! A compile-time plugin framework. An application registers named plugins
//! with a [`Manager`] and mounts them against a shared application value;
//! plugins declare dependencies on each other by name and extend the
//! application by attaching handlers to its [`Hook`]s.
//!
//! ## Key Features
//!
//! - **Dependency-aware lazy loading**: dependencies mount before their
//!   dependents, at most once per registry
//! - **Cycle detection**: self-referential and circular chains are reported
//!   instead of recursing forever
//! - **Diagnostics**: per-plugin mount timings and the discovered dependency graph
//! - **Interception loaders**: skip or reroute plugin names per load pass
//! - **Event hooks**: ordered, re-entrant handler chains with early stop
//!   and tag filtering
//!
//! ## Usage
//!
//! ```rust
//! use scaffold::{Context, Hook, Manager, Plugin, ScaffoldError};
//!
//! struct App {
//!     on_start: Hook<Vec<String>>,
//! }
//!
//! struct Storage;
//!
//! impl Plugin<App> for Storage {
//!     fn name(&self) -> &str {
//!         "storage"
//!     }
//!
//!     fn mount(&self, ctx: &Context<'_, App>) -> Result<(), ScaffoldError> {
//!         ctx.app().on_start.add(|log: &mut Vec<String>| {
//!             log.push("storage ready".into());
//!             Ok(())
//!         });
//!         Ok(())
//!     }
//! }
//!
//! struct Api;
//!
//! impl Plugin<App> for Api {
//!     fn name(&self) -> &str {
//!         "api"
//!     }
//!
//!     fn mount(&self, ctx: &Context<'_, App>) -> Result<(), ScaffoldError> {
//!         ctx.lazy("storage")?;
//!         ctx.app().on_start.add(|log: &mut Vec<String>| {
//!             log.push("api ready".into());
//!             Ok(())
//!         });
//!         Ok(())
//!     }
//! }
//!
//! let app = App { on_start: Hook::new() };
//! let manager = Manager::new();
//! manager.register(Api);
//! manager.register(Storage);
//! manager.load(&app, Vec::new())?;
//!
//! let mut log = Vec::new();
//! app.on_start.trigger(&mut log)?;
//! assert_eq!(log, ["storage ready", "api ready"]);
//! assert_eq!(manager.graph()[0].to_string(), "api->storage");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod context;
pub mod error;
pub mod hook;
pub mod loader;
pub mod manager;
pub mod plugin;
pub mod stack;
pub mod tagged;
mod utils;

// Re-exports for convenience
pub use context::Context;
pub use error::{ErrorKind, HookError, ScaffoldError};
pub use hook::{handler, Handler, Hook};
pub use loader::{from_fn, AliasLoader, Loader, SkipLoader};
pub use manager::Manager;
pub use plugin::{Dependency, Info, Plugin};
pub use stack::Stack;
pub use tagged::{TaggedHook, Tagger};

/// Result type used throughout the framework
pub type Result<T> = std::result::Result<T, ScaffoldError>;

#[cfg(test)]
mod tests;
