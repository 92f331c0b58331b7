//! # Event reconciler.
//!
//! Turns the two unordered rejection streams into ledger membership.
//!
//! ```text
//! Bus ──► Reconciler::on_event(ev)
//!           ├─ UnhandledRejection(p, reason) ─► ledger.record(p, reason)
//!           └─ RejectionHandled(p)           ─► ledger.remove(p)   (unknown p: no-op)
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use super::ledger::Ledger;
use crate::events::{Event, EventKind, Reason};
use crate::subscribers::Subscribe;

/// Keeps the ledger in sync with rejection events.
pub(crate) struct Reconciler {
    ledger: Arc<Mutex<Ledger>>,
}

impl Reconciler {
    pub(crate) fn new(ledger: Arc<Mutex<Ledger>>) -> Self {
        Self { ledger }
    }
}

impl Subscribe for Reconciler {
    fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::UnhandledRejection => {
                let reason = ev.reason.clone().unwrap_or(Reason::Absent);
                self.ledger.lock().record(ev.promise, reason);
                tracing::trace!(promise = %ev.promise, seq = ev.seq, "rejection recorded");
            }
            EventKind::RejectionHandled => {
                if self.ledger.lock().remove(ev.promise).is_none() {
                    tracing::debug!(promise = %ev.promise, "handled event for unknown promise");
                } else {
                    tracing::trace!(promise = %ev.promise, seq = ev.seq, "rejection handled");
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "reconciler"
    }
}
