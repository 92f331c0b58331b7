//! # Teardown hooks.
//!
//! The exit reporter needs one capability from its environment: "run this
//! callback exactly once before the process terminates". [`Teardown`] is
//! that seam.
//!
//! ## Implementations
//! - [`ManualTeardown`]: hooks run when [`ManualTeardown::fire`] is called. For tests
//!   and for embedders that own their shutdown sequence.
//! - [`ProcessTeardown`]: the process-wide instance. Fired by [`exit`](crate::exit),
//!   [`finish`](crate::finish), or an OS termination signal once
//!   [`ProcessTeardown::watch_signals`] was called.
//!
//! ## Signal path
//! ```text
//! watch_signals() ─► tokio::spawn(watcher)
//!   watcher: select {
//!     shutdown::wait_for_shutdown_signal() ─► fire() ─► process::exit(code or 128+signo)
//!                                              └─ already fired ─► return (exit/finish owns the exit)
//!     token.cancelled()                    ─► return   (normal teardown already ran)
//!   }
//! ```
//!
//! ## Rules
//! - Hooks run in registration order, on the thread that fires.
//! - The first `fire` wins; later calls are no-ops.
//! - Hooks registered after firing never run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::exit::ExitStatus;
use super::shutdown::{self, ShutdownSignal};

/// Callback run at teardown.
pub type Hook = Box<dyn FnOnce() + Send + 'static>;

/// "Register a callback to run exactly once before the process terminates."
pub trait Teardown: Send + Sync + 'static {
    /// Registers `hook`.
    fn register(&self, hook: Hook);
}

/// Teardown fired explicitly by its owner.
pub struct ManualTeardown {
    /// `None` once fired.
    hooks: Mutex<Option<Vec<Hook>>>,
}

impl ManualTeardown {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: Mutex::new(Some(Vec::new())),
        }
    }

    /// Runs every registered hook once.
    ///
    /// Returns `false` if teardown had already fired.
    pub fn fire(&self) -> bool {
        let Some(hooks) = self.hooks.lock().take() else {
            return false;
        };
        tracing::debug!(hooks = hooks.len(), "teardown fired");
        for hook in hooks {
            hook();
        }
        true
    }

    /// True once [`fire`](Self::fire) was called.
    pub fn has_fired(&self) -> bool {
        self.hooks.lock().is_none()
    }

    /// Number of hooks waiting to run.
    pub fn pending(&self) -> usize {
        self.hooks.lock().as_ref().map_or(0, Vec::len)
    }
}

impl Default for ManualTeardown {
    fn default() -> Self {
        Self::new()
    }
}

impl Teardown for ManualTeardown {
    fn register(&self, hook: Hook) {
        match self.hooks.lock().as_mut() {
            Some(hooks) => hooks.push(hook),
            None => {
                tracing::warn!("teardown hook registered after teardown fired; it will not run");
            }
        }
    }
}

static PROCESS: OnceLock<Arc<ProcessTeardown>> = OnceLock::new();

/// Process-wide teardown.
pub struct ProcessTeardown {
    hooks: ManualTeardown,
    watching: AtomicBool,
    token: CancellationToken,
}

impl ProcessTeardown {
    /// Returns the process instance, creating it on first use.
    pub fn global() -> Arc<ProcessTeardown> {
        Arc::clone(PROCESS.get_or_init(|| Arc::new(ProcessTeardown::new())))
    }

    fn new() -> Self {
        Self {
            hooks: ManualTeardown::new(),
            watching: AtomicBool::new(false),
            token: CancellationToken::new(),
        }
    }

    /// Runs the hooks (once) and stops the signal watcher.
    pub fn fire(&self) -> bool {
        self.token.cancel();
        self.hooks.fire()
    }

    /// True once teardown fired.
    pub fn has_fired(&self) -> bool {
        self.hooks.has_fired()
    }

    /// True once a signal watcher was spawned.
    pub fn is_watching(&self) -> bool {
        self.watching.load(Ordering::SeqCst)
    }

    /// Fires teardown when the process receives a termination signal.
    ///
    /// Idempotent. Needs a tokio runtime; without one this only logs and
    /// returns `false`.
    pub fn watch_signals(self: &Arc<Self>) -> bool {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no tokio runtime; signal teardown disabled");
            return false;
        };
        if self.watching.swap(true, Ordering::SeqCst) {
            return true;
        }

        let this = Arc::clone(self);
        handle.spawn(async move {
            tokio::select! {
                res = shutdown::wait_for_shutdown_signal() => match res {
                    Ok(signal) => {
                        tracing::debug!(?signal, "termination signal; running teardown");
                        if let Some(code) = this.teardown_for(signal) {
                            std::process::exit(code);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "signal registration failed; signal teardown disabled");
                    }
                },
                _ = this.token.cancelled() => {}
            }
        });
        true
    }

    /// Fires for `signal` and returns the code to exit with.
    ///
    /// `None` when teardown already fired: `exit`/`finish` is running the
    /// report and owns the exit.
    fn teardown_for(&self, signal: ShutdownSignal) -> Option<i32> {
        if !self.hooks.fire() {
            return None;
        }
        let code = ExitStatus::process().get();
        Some(if code == 0 { signal.exit_code() } else { code })
    }
}

impl Teardown for ProcessTeardown {
    fn register(&self, hook: Hook) {
        self.hooks.register(hook);
    }
}
