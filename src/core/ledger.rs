//! # Rejection ledger.
//!
//! Ordered set of promises currently considered unhandled, keyed by
//! [`PromiseId`].
//!
//! ## Rules
//! - A promise appears **at most once**; a duplicate `record` is a no-op.
//! - Entries keep the order in which their rejection was **first** observed.
//! - `remove` of an unknown promise is a no-op.
//! - Not synchronized; the owner wraps it in a mutex.
//!
//! ```text
//! record(a) record(b) record(c) remove(b)  →  [a, c]
//! record(a) again                          →  [a, c]   (ignored)
//! drain()                                  →  [a, c], ledger empty
//! ```

use indexmap::IndexMap;

use crate::events::{PromiseId, Reason};

/// One unhandled rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Identity of the rejected promise.
    pub promise: PromiseId,
    /// What it was rejected with.
    pub reason: Reason,
}

/// Ordered collection of unhandled rejections.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: IndexMap<PromiseId, Reason>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `promise` unless it is already present.
    ///
    /// Returns `false` for a duplicate (the first reason is kept).
    pub fn record(&mut self, promise: PromiseId, reason: Reason) -> bool {
        if self.entries.contains_key(&promise) {
            tracing::debug!(%promise, "duplicate rejection ignored");
            return false;
        }
        self.entries.insert(promise, reason);
        true
    }

    /// Removes `promise`, keeping the order of the remaining entries.
    pub fn remove(&mut self, promise: PromiseId) -> Option<Reason> {
        self.entries.shift_remove(&promise)
    }

    /// Takes every entry in insertion order, leaving the ledger empty.
    pub fn drain(&mut self) -> Vec<Rejection> {
        std::mem::take(&mut self.entries)
            .into_iter()
            .map(|(promise, reason)| Rejection { promise, reason })
            .collect()
    }

    /// Copies every entry in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Rejection> {
        self.entries
            .iter()
            .map(|(promise, reason)| Rejection {
                promise: *promise,
                reason: reason.clone(),
            })
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
