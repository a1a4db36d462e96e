//! Error types for plugin loading and event hooks

use std::sync::Arc;

/// Main error type for plugin resolution and mounting
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScaffoldError {
    /// A top-level load request named a plugin that was never registered
    #[error("plugin not registered: {0}")]
    PluginNotRegistered(String),

    /// A plugin requested a dependency that was never registered
    #[error("missing plugin dependency: {0}")]
    MissingDependency(String),

    /// A plugin requested itself while mounting
    #[error("self-referential plugin dependency: {0}")]
    SelfReferentialDependency(String),

    /// A requested plugin is already being mounted further up the chain
    #[error("circular plugin dependency: {0}")]
    CircularDependency(String),

    /// The load pass was cancelled before this resolution step
    #[error("plugin loading cancelled")]
    Cancelled,

    /// An error that propagated through the mount of `plugin`
    #[error("{plugin}: {source}")]
    Mount {
        plugin: String,
        #[source]
        source: Box<ScaffoldError>,
    },

    /// A hook triggered during a mount failed
    #[error("event hook failed: {0}")]
    Hook(#[from] HookError),

    /// Plugin-defined failure
    #[error("{0}")]
    Plugin(Arc<dyn std::error::Error + Send + Sync>),

    /// Plugin-defined failure carrying only a message
    #[error("{0}")]
    Message(String),

    /// Several errors latched during the same load pass
    #[error("{}", join_errors(.0))]
    Multiple(Vec<ScaffoldError>),
}

/// Classification of a [`ScaffoldError`] independent of its annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PluginNotRegistered,
    MissingDependency,
    SelfReferentialDependency,
    CircularDependency,
    Cancelled,
    Hook,
    Plugin,
}

impl ScaffoldError {
    /// Wrap any plugin-defined error.
    pub fn plugin<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ScaffoldError::Plugin(Arc::new(err))
    }

    /// Plugin-defined failure from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        ScaffoldError::Message(message.into())
    }

    /// Annotate this error with the name of the plugin it propagated through.
    pub fn in_plugin(self, plugin: impl Into<String>) -> Self {
        ScaffoldError::Mount {
            plugin: plugin.into(),
            source: Box::new(self),
        }
    }

    /// Merge `other` into this error, keeping both.
    pub fn merge(self, other: ScaffoldError) -> Self {
        match self {
            ScaffoldError::Multiple(mut errors) => {
                errors.push(other);
                ScaffoldError::Multiple(errors)
            }
            first => ScaffoldError::Multiple(vec![first, other]),
        }
    }

    /// Kind of the innermost error, looking through `Mount` annotations.
    ///
    /// For a merged error this is the kind of the first merged error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScaffoldError::PluginNotRegistered(_) => ErrorKind::PluginNotRegistered,
            ScaffoldError::MissingDependency(_) => ErrorKind::MissingDependency,
            ScaffoldError::SelfReferentialDependency(_) => ErrorKind::SelfReferentialDependency,
            ScaffoldError::CircularDependency(_) => ErrorKind::CircularDependency,
            ScaffoldError::Cancelled => ErrorKind::Cancelled,
            ScaffoldError::Hook(_) => ErrorKind::Hook,
            ScaffoldError::Plugin(_) | ScaffoldError::Message(_) => ErrorKind::Plugin,
            ScaffoldError::Mount { source, .. } => source.kind(),
            ScaffoldError::Multiple(errors) => errors
                .first()
                .map(ScaffoldError::kind)
                .unwrap_or(ErrorKind::Plugin),
        }
    }

    /// Whether this error, or any error annotated or merged into it, is of `kind`.
    pub fn is(&self, kind: ErrorKind) -> bool {
        match self {
            ScaffoldError::Mount { source, .. } => source.is(kind),
            ScaffoldError::Multiple(errors) => errors.iter().any(|e| e.is(kind)),
            other => other.kind() == kind,
        }
    }

    /// The plugin names this error was annotated with, innermost last.
    pub fn plugin_chain(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self;
        while let ScaffoldError::Mount { plugin, source } = current {
            chain.push(plugin.as_str());
            current = source;
        }
        chain
    }
}

fn join_errors(errors: &[ScaffoldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors returned by hook handlers
#[derive(Debug, Clone, thiserror::Error)]
pub enum HookError {
    /// Sentinel that ends a trigger early without reporting a failure
    #[error("event hook propagation stopped")]
    StopPropagation,

    /// Handler-defined failure
    #[error("{0}")]
    Handler(Arc<dyn std::error::Error + Send + Sync>),

    /// Handler-defined failure carrying only a message
    #[error("{0}")]
    Message(String),
}

impl HookError {
    /// Wrap any handler-defined error.
    pub fn handler<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HookError::Handler(Arc::new(err))
    }

    /// Handler-defined failure from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        HookError::Message(message.into())
    }

    /// Whether this is the stop-propagation sentinel.
    pub fn is_stop(&self) -> bool {
        matches!(self, HookError::StopPropagation)
    }
}
