//! Core: reconciliation, reporting and installation.
//!
//! The public entry point from this module is [`Installer`]; everything else
//! is either a collaborator it is wired with or internal state.
//!
//! Internal modules:
//! - [`ledger`]: ordered set of currently unhandled rejections;
//! - [`reconciler`]: applies rejection events to the ledger;
//! - [`reporter`]: drains and prints the ledger at teardown, applies the exit-code policy;
//! - [`arbiter`]: negotiates the single override exit code;
//! - [`installer`]: install-once guard and wiring;
//! - [`teardown`]: run-once hooks (manual and process-wide);
//! - [`shutdown`]: cross-platform termination signal handling;
//! - [`exit`]: the process exit-code cell;
//! - [`stream`]: synchronous error stream.
//!
//! ```text
//! RejectionSource ──► Reconciler ──► Ledger ◄── ExitReporter ◄── Teardown::fire
//!                                                   │
//!                                     ExitCodeArbiter + ExitStatus
//! ```

mod arbiter;
mod exit;
mod installer;
mod ledger;
mod reconciler;
mod reporter;
mod shutdown;
mod stream;
mod teardown;

pub use exit::ExitStatus;
pub use installer::{INSTALLED_TWICE_WARNING, Installer};
pub use ledger::Rejection;
pub use reporter::format_reason;
pub use shutdown::ShutdownSignal;
pub use stream::ErrorStream;
pub use teardown::{Hook, ManualTeardown, ProcessTeardown, Teardown};
