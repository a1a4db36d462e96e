//! Resolution stack shared by every frame of one load pass

use crate::error::ScaffoldError;
use parking_lot::RwLock;

#[derive(Debug)]
struct StackState<K> {
    values: Vec<K>,
    err: Option<ScaffoldError>,
}

/// Ordered sequence of in-flight plugin names with a latched error.
///
/// The latched error is never cleared by `pop` or `truncate`; only
/// [`Stack::reset`] discards it.
#[derive(Debug)]
pub struct Stack<K> {
    state: RwLock<StackState<K>>,
}

impl<K> Default for Stack<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Stack<K> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StackState {
                values: Vec::new(),
                err: None,
            }),
        }
    }

    pub fn push(&self, value: K) {
        self.state.write().values.push(value);
    }

    pub fn pop(&self) -> Option<K> {
        self.state.write().values.pop()
    }

    /// Drop every entry above `len`.
    pub fn truncate(&self, len: usize) {
        self.state.write().values.truncate(len);
    }

    pub fn size(&self) -> usize {
        self.state.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().values.is_empty()
    }

    /// Latch `err`, merging it into any error latched before.
    pub fn catch(&self, err: ScaffoldError) {
        let mut state = self.state.write();
        state.err = Some(match state.err.take() {
            Some(existing) => existing.merge(err),
            None => err,
        });
    }

    pub fn err(&self) -> Option<ScaffoldError> {
        self.state.read().err.clone()
    }

    pub fn reset(&self) {
        let mut state = self.state.write();
        state.values.clear();
        state.err = None;
    }
}

impl<K: Clone> Stack<K> {
    pub fn peek(&self) -> Option<K> {
        self.state.read().values.last().cloned()
    }
}

impl<K> Stack<K> {
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.state.read().values.iter().any(|v| v == value)
    }
}
