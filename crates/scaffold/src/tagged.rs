//! Hooks that only fire for payloads carrying the right tags

use crate::error::HookError;
use crate::hook::{Handler, Hook};
use std::sync::Arc;

/// Payload that exposes a set of tags
pub trait Tagger {
    fn tags(&self) -> &[String];
}

/// Whether a payload tagged with `tags` satisfies `required`.
///
/// One shared tag is enough. An empty requirement matches all.
pub fn can_trigger_on<S: AsRef<str>>(required: &[String], tags: &[S]) -> bool {
    required.is_empty()
        || tags
            .iter()
            .any(|tag| required.iter().any(|want| want == tag.as_ref()))
}

/// A [`Hook`] whose handlers run only for tagged payloads.
///
/// Several tagged hooks can share one underlying hook; each one filters the
/// handlers it registered by its own tag set.
pub struct TaggedHook<E> {
    hook: Arc<Hook<E>>,
    tags: Arc<[String]>,
}

impl<E> Clone for TaggedHook<E> {
    fn clone(&self) -> Self {
        Self {
            hook: self.hook.clone(),
            tags: self.tags.clone(),
        }
    }
}

impl<E: Tagger + 'static> TaggedHook<E> {
    pub fn new<I, S>(hook: Arc<Hook<E>>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hook,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Tags a payload must carry for handlers of this hook to run
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Shared hook the handlers are registered on
    pub fn hook(&self) -> &Arc<Hook<E>> {
        &self.hook
    }

    pub fn can_trigger_on<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        can_trigger_on(&self.tags, tags)
    }

    /// Register a tag-filtered handler at the end of the queue.
    pub fn add<F>(&self, f: F) -> String
    where
        F: Fn(&mut E) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.hook.add(self.filtered(f))
    }

    /// Register a tag-filtered handler at the front of the queue.
    pub fn pre_add<F>(&self, f: F) -> String
    where
        F: Fn(&mut E) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.hook.pre_add(self.filtered(f))
    }

    pub fn remove(&self, id: &str) -> bool {
        self.hook.remove(id)
    }

    pub fn reset(&self) {
        self.hook.reset()
    }

    pub fn len(&self) -> usize {
        self.hook.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hook.is_empty()
    }

    pub fn trigger(&self, event: &mut E) -> Result<(), HookError> {
        self.hook.trigger(event)
    }

    /// One-off handlers are not tag-filtered.
    pub fn trigger_with<I>(&self, event: &mut E, one_off: I) -> Result<(), HookError>
    where
        I: IntoIterator<Item = Handler<E>>,
    {
        self.hook.trigger_with(event, one_off)
    }

    fn filtered<F>(&self, f: F) -> impl Fn(&mut E) -> Result<(), HookError> + Send + Sync + 'static
    where
        F: Fn(&mut E) -> Result<(), HookError> + Send + Sync + 'static,
    {
        let required = self.tags.clone();
        move |event: &mut E| {
            if can_trigger_on(&required, event.tags()) {
                f(event)
            } else {
                Ok(())
            }
        }
    }
}

impl<E> std::fmt::Debug for TaggedHook<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggedHook")
            .field("tags", &self.tags)
            .field("handlers", &self.hook.len())
            .finish()
    }
}
