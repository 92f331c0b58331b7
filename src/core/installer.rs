//! # Installation guard.
//!
//! [`Installer`] is the one state object behind [`install`](crate::install):
//! the exit-code arbiter, the installed flag and the ledger, plus the
//! collaborators it wires together (event source, teardown, exit status,
//! error stream).
//!
//! ## install(options)
//! ```text
//! arbiter.negotiate(options.exit_code)?        // validation first, even on a repeat call
//! installed already? ─► warn "WARN: loud rejection called more than once", return Ok(false)
//! installed = true
//! source.attach(Reconciler(ledger))
//! teardown.register(|| ExitReporter.run())
//! return Ok(true)
//! ```
//!
//! ## Lifecycle
//! `Uninstalled → Installed`, terminal. [`Installer::global`] creates the process
//! instance on first use and never resets it; tests build their own with
//! [`Installer::new`].

use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use super::arbiter::ExitCodeArbiter;
use super::exit::ExitStatus;
use super::ledger::{Ledger, Rejection};
use super::reconciler::Reconciler;
use super::reporter::ExitReporter;
use super::stream::ErrorStream;
use super::teardown::{ProcessTeardown, Teardown};
use crate::config::InstallOptions;
use crate::error::InstallError;
use crate::events::{Bus, RejectionSource};

/// Text of the duplicate-installation warning.
pub const INSTALLED_TWICE_WARNING: &str = "WARN: loud rejection called more than once";

static GLOBAL: OnceLock<Installer> = OnceLock::new();

/// Install-once state and wiring.
pub struct Installer {
    arbiter: Arc<ExitCodeArbiter>,
    installed: AtomicBool,
    ledger: Arc<Mutex<Ledger>>,
    source: Arc<dyn RejectionSource>,
    teardown: Arc<dyn Teardown>,
    status: ExitStatus,
    out: ErrorStream,
}

impl Installer {
    /// Creates an uninstalled instance over the given collaborators.
    pub fn new(
        source: Arc<dyn RejectionSource>,
        teardown: Arc<dyn Teardown>,
        status: ExitStatus,
        out: ErrorStream,
    ) -> Self {
        Self {
            arbiter: Arc::new(ExitCodeArbiter::new()),
            installed: AtomicBool::new(false),
            ledger: Arc::new(Mutex::new(Ledger::new())),
            source,
            teardown,
            status,
            out,
        }
    }

    /// The process instance: global bus, process teardown, process exit status, stderr.
    pub fn global() -> &'static Installer {
        GLOBAL.get_or_init(|| {
            Installer::new(
                Arc::new(Bus::global().clone()),
                ProcessTeardown::global(),
                ExitStatus::process().clone(),
                ErrorStream::stderr(),
            )
        })
    }

    /// Negotiates the exit code and, on the first call, wires the reconciler
    /// and the exit reporter.
    ///
    /// Returns `true` if this call performed the installation, `false` for a
    /// repeat call that only warned.
    ///
    /// ### Errors
    /// - [`InstallError::NegativeExitCode`] for a negative `exit_code`
    /// - [`InstallError::ConflictingExitCode`] when an earlier call negotiated a different one
    ///
    /// Both are checked before the installed flag, so a repeat call with a bad
    /// code fails instead of warning.
    pub fn install(&self, opts: &InstallOptions) -> Result<bool, InstallError> {
        if let Err(err) = self.arbiter.negotiate(opts.exit_code) {
            tracing::debug!(label = err.as_label(), "{}", err.as_message());
            return Err(err);
        }

        if self.installed.swap(true, Ordering::SeqCst) {
            self.warn_installed_twice();
            return Ok(false);
        }

        self.source
            .attach(Arc::new(Reconciler::new(Arc::clone(&self.ledger))));

        let reporter = ExitReporter::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.arbiter),
            self.status.clone(),
            self.out.clone(),
        );
        self.teardown.register(Box::new(move || {
            reporter.run();
        }));

        tracing::debug!(exit_code = ?self.arbiter.negotiated(), "installed");
        Ok(true)
    }

    /// True once the first `install` completed.
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    /// Override exit code negotiated so far.
    pub fn negotiated_exit_code(&self) -> Option<i32> {
        self.arbiter.negotiated()
    }

    /// Rejections currently unhandled, in the order they were observed.
    pub fn pending(&self) -> Vec<Rejection> {
        self.ledger.lock().snapshot()
    }

    fn warn_installed_twice(&self) {
        tracing::warn!("{INSTALLED_TWICE_WARNING}");
        let trace = Backtrace::capture();
        if trace.status() == BacktraceStatus::Captured {
            self.out.line(&format!("Trace: {INSTALLED_TWICE_WARNING}\n{trace}"));
        } else {
            self.out.line(&format!("Trace: {INSTALLED_TWICE_WARNING}"));
        }
    }
}

impl std::fmt::Debug for Installer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("installed", &self.is_installed())
            .field("exit_code", &self.negotiated_exit_code())
            .field("pending", &self.ledger.lock().len())
            .finish()
    }
}
