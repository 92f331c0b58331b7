//! # Exit reporter.
//!
//! Runs once, synchronously, as a teardown hook.
//!
//! ## Flow
//! ```text
//! entries = ledger.drain()
//!   ├─ empty ─► done (no output, exit code untouched)
//!   └─ else  ─► one line per entry, in recorded order
//!              └─► exit code:
//!                    ├─ current > 0 ─► keep (a real failure already dominates)
//!                    └─ otherwise   ─► negotiated override, else 1
//! ```
//!
//! ## Messages
//! - error reason: its stack text, verbatim
//! - no value: `Promise rejected no value`
//! - any other value: `Promise rejected with value: <display>`

use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::Mutex;

use super::arbiter::ExitCodeArbiter;
use super::exit::ExitStatus;
use super::ledger::Ledger;
use super::stream::ErrorStream;
use crate::events::Reason;

/// Formats the diagnostic line for one rejection reason.
pub fn format_reason(reason: &Reason) -> Cow<'_, str> {
    match reason {
        Reason::Error(stack) => Cow::Borrowed(stack),
        Reason::Absent => Cow::Borrowed("Promise rejected no value"),
        Reason::Value(v) => Cow::Owned(format!("Promise rejected with value: {v}")),
    }
}

/// Drains the ledger at teardown, prints, and applies the exit-code policy.
pub(crate) struct ExitReporter {
    ledger: Arc<Mutex<Ledger>>,
    arbiter: Arc<ExitCodeArbiter>,
    status: ExitStatus,
    out: ErrorStream,
}

impl ExitReporter {
    pub(crate) fn new(
        ledger: Arc<Mutex<Ledger>>,
        arbiter: Arc<ExitCodeArbiter>,
        status: ExitStatus,
        out: ErrorStream,
    ) -> Self {
        Self {
            ledger,
            arbiter,
            status,
            out,
        }
    }

    /// Returns the number of rejections reported.
    pub(crate) fn run(&self) -> usize {
        let entries = self.ledger.lock().drain();
        if entries.is_empty() {
            return 0;
        }

        for entry in &entries {
            self.out.line(&format_reason(&entry.reason));
        }

        if self.status.is_failure() {
            tracing::debug!(
                code = self.status.get(),
                "unhandled rejections reported; keeping existing exit code"
            );
        } else {
            let code = self.arbiter.failure_code();
            self.status.set(code);
            tracing::debug!(code, count = entries.len(), "unhandled rejections reported");
        }
        entries.len()
    }
}
