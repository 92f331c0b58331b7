//! # Installation options.
//!
//! Provides [`InstallOptions`] the settings accepted by [`install`](crate::install).
//!
//! ## Sentinel values
//! - `exit_code = None` → no override; the failure exit code defaults to [`DEFAULT_EXIT_CODE`]
//! - `watch_signals = false` → teardown only runs on explicit [`exit`](crate::exit) / [`finish`](crate::finish)

/// Exit code applied at teardown when unhandled rejections remain and no override was negotiated.
pub const DEFAULT_EXIT_CODE: i32 = 1;

/// Options for [`install`](crate::install).
///
/// ## Field semantics
/// - `exit_code`: override for the failure exit code. Must be non-negative, and every
///   caller in the process must agree on the same value (or omit it).
/// - `watch_signals`: also run the teardown report when the process receives a
///   termination signal. Needs a running tokio runtime at install time.
#[derive(Clone, Debug)]
pub struct InstallOptions {
    /// Override for the default failure exit code (`1`).
    pub exit_code: Option<i32>,

    /// Run the teardown report on SIGINT/SIGTERM/SIGQUIT (Ctrl-C on Windows).
    pub watch_signals: bool,
}

impl InstallOptions {
    /// Same as [`InstallOptions::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the override exit code.
    ///
    /// Validation happens in `install`, not here.
    #[must_use]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Enables or disables the signal watcher.
    #[must_use]
    pub fn with_signals(mut self, watch: bool) -> Self {
        self.watch_signals = watch;
        self
    }
}

impl Default for InstallOptions {
    /// Default options:
    ///
    /// - `exit_code = None` (failures exit with `1`)
    /// - `watch_signals = true`
    fn default() -> Self {
        Self {
            exit_code: None,
            watch_signals: true,
        }
    }
}
