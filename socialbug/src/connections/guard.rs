use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// One-shot record of authorization codes that already started an exchange
///
/// Clones share the same record, so every controller mounted in a tab sees
/// codes consumed by the others.
#[derive(Debug, Clone, Default)]
pub struct CallbackGuard {
    consumed: Arc<Mutex<HashSet<String>>>,
}

impl CallbackGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `code` consumed; `false` if it already was
    pub fn try_consume(&self, code: &str) -> bool {
        self.consumed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(code.to_string())
    }
}
