//! # loud-rejection
//!
//! **loud-rejection** makes unobserved async failures fail loudly.
//!
//! A "rejection" is a computation that settled with a failure. If nothing
//! ever observes that failure (the task handle was dropped, nobody awaited
//! it), it is an *unhandled rejection*. Once [`install`]ed, every rejection
//! still unhandled when the process tears down is printed to stderr, and the
//! exit code is forced nonzero unless the application already chose a
//! failing one. Shells and CI only see exit codes; a silent `Err` in a
//! dropped task is a bug that passes unnoticed.
//!
//! ## Architecture
//! ```text
//!   ┌──────────────┐   ┌──────────────┐   ┌───────────────────┐
//!   │ Tracked task │   │ Tracked task │   │ host runtime      │
//!   │ (spawn)      │   │ (spawn)      │   │ (own promise ids) │
//!   └──────┬───────┘   └──────┬───────┘   └─────────┬─────────┘
//!          │ UnhandledRejection / RejectionHandled  │
//!          ▼                  ▼                     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Bus (synchronous fan-out)                   │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                ▼
//!                   Reconciler ──► Ledger (ordered, keyed by PromiseId)
//!                                    ▲
//!   exit(code) / finish() / SIGTERM  │ drain at teardown
//!          └──► Teardown::fire ──► ExitReporter ──► stderr
//!                                    └──► exit code: existing > 0, else override, else 1
//! ```
//!
//! ## Exit-code policy
//! | At teardown                     | Final exit code               |
//! |---------------------------------|-------------------------------|
//! | no unhandled rejections         | unchanged (default `0`)       |
//! | unhandled, current code `> 0`   | unchanged                     |
//! | unhandled, override negotiated  | the override                  |
//! | unhandled, no override          | `1`                           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use loud_rejection::InstallOptions;
//!
//! #[derive(Debug)]
//! struct Boom;
//! impl std::fmt::Display for Boom {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str("boom") }
//! }
//! impl std::error::Error for Boom {}
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> std::process::ExitCode {
//!     loud_rejection::install(InstallOptions::default()).expect("valid options");
//!
//!     // Nobody awaits this handle: the failure is reported at exit.
//!     let _ = loud_rejection::spawn(async { Err::<(), _>(Boom) });
//!     tokio::task::yield_now().await;
//!
//!     loud_rejection::finish() // prints "boom", exits with 1
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::{DEFAULT_EXIT_CODE, InstallOptions};
pub use crate::core::{
    ErrorStream, ExitStatus, Hook, INSTALLED_TWICE_WARNING, Installer, ManualTeardown,
    ProcessTeardown, Rejection, ShutdownSignal, Teardown, format_reason,
};
pub use error::InstallError;
pub use events::{Bus, DEFAULT_MIRROR_CAPACITY, Event, EventKind, PromiseId, Reason, RejectionSource};
pub use subscribers::Subscribe;
pub use tasks::{Tracked, Tracker};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

use std::future::Future;

/// Installs the process-wide reporter.
///
/// Validates and negotiates `opts.exit_code`, then (first call only) attaches
/// the reconciler to [`Bus::global`] and registers the exit report on
/// [`ProcessTeardown::global`]. A repeat call only negotiates the exit code
/// and prints a warning; its `watch_signals` is ignored.
///
/// With `opts.watch_signals` and a running tokio runtime, the report also runs
/// on termination signals.
pub fn install(opts: InstallOptions) -> Result<(), InstallError> {
    let first = Installer::global().install(&opts)?;
    if first && opts.watch_signals {
        ProcessTeardown::global().watch_signals();
    }
    Ok(())
}

/// Assigns the process exit code without exiting.
pub fn set_exit_code(code: i32) {
    ExitStatus::process().set(code);
}

/// Current process exit code.
pub fn exit_code() -> i32 {
    ExitStatus::process().get()
}

/// Rejections currently unhandled in the process, in the order they were observed.
pub fn pending() -> Vec<Rejection> {
    Installer::global().pending()
}

/// Runs teardown and returns the final exit code for `main`.
///
/// ```no_run
/// fn main() -> std::process::ExitCode {
///     loud_rejection::install(Default::default()).expect("valid options");
///     // ...
///     loud_rejection::finish()
/// }
/// ```
pub fn finish() -> std::process::ExitCode {
    ProcessTeardown::global().fire();
    ExitStatus::process().to_exit_code()
}

/// Sets the exit code, runs teardown, and terminates the process.
///
/// The exit report may replace a zero `code`; a positive `code` always wins.
pub fn exit(code: i32) -> ! {
    set_exit_code(code);
    ProcessTeardown::global().fire();
    std::process::exit(exit_code())
}

/// Spawns a tracked task on the process-wide bus. See [`Tracker::spawn`].
pub fn spawn<F, T, E>(fut: F) -> Tracked<T, E>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    Tracker::global().spawn(fut)
}
