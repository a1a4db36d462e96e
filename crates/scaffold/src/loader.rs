//! Interception loaders that filter plugin-name resolution requests
//!
//! Loaders passed to a load pass form a chain: the first loader sees every
//! request and its `next` runs the rest of the chain, ending in the
//! resolver itself. A loader can delegate unchanged, substitute another
//! name, or return without calling `next` to suppress the request.

use crate::error::ScaffoldError;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Continuation a loader calls to proceed with resolution
pub type Next<'a> = &'a dyn Fn(&str) -> Result<(), ScaffoldError>;

/// On-load interception hook
pub trait Loader: Send + Sync {
    fn intercept(&self, name: &str, next: Next<'_>) -> Result<(), ScaffoldError>;
}

/// Loader backed by a closure, see [`from_fn`]
pub struct FnLoader<F>(F);

/// Build a loader from a closure.
///
/// ```
/// use scaffold::loader::{from_fn, Loader};
///
/// let lowercase = from_fn(|name, next| next(&name.to_lowercase()));
/// let boxed: Box<dyn Loader> = Box::new(lowercase);
/// # let _ = boxed;
/// ```
pub fn from_fn<F>(f: F) -> FnLoader<F>
where
    F: Fn(&str, Next<'_>) -> Result<(), ScaffoldError> + Send + Sync,
{
    FnLoader(f)
}

impl<F> Loader for FnLoader<F>
where
    F: Fn(&str, Next<'_>) -> Result<(), ScaffoldError> + Send + Sync,
{
    fn intercept(&self, name: &str, next: Next<'_>) -> Result<(), ScaffoldError> {
        (self.0)(name, next)
    }
}

/// Skips loading plugins by name
#[derive(Debug, Clone, Default)]
pub struct SkipLoader {
    names: HashSet<String>,
}

impl SkipLoader {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn skips(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl Loader for SkipLoader {
    fn intercept(&self, name: &str, next: Next<'_>) -> Result<(), ScaffoldError> {
        if self.skips(name) {
            trace!("⏭️ Skipping plugin: {}", name);
            return Ok(());
        }
        next(name)
    }
}

/// Reroutes requests for one plugin name to another
#[derive(Debug, Clone, Default)]
pub struct AliasLoader {
    aliases: HashMap<String, String>,
}

impl AliasLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `to` whenever `from` is requested.
    pub fn alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    pub fn target<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasLoader {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            aliases: iter
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }
}

impl Loader for AliasLoader {
    fn intercept(&self, name: &str, next: Next<'_>) -> Result<(), ScaffoldError> {
        let target = self.target(name);
        if target != name {
            trace!("🔀 Resolving {} as {}", name, target);
        }
        next(target)
    }
}
