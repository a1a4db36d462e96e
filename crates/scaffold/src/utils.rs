//! Utility functions and helpers

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the ids handed out for hook handlers
pub(crate) const HOOK_ID_LEN: usize = 8;

/// Generate a random alphanumeric hook handler id
pub(crate) fn generate_hook_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(HOOK_ID_LEN)
        .map(char::from)
        .collect()
}
