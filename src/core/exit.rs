//! # Process exit status.
//!
//! [`ExitStatus`] is the exit code the process *will* terminate with. The
//! application assigns it (directly, or through [`exit`](crate::exit)), and
//! the exit reporter arbitrates against it at teardown.
//!
//! ## Rules
//! - Defaults to `0`.
//! - Only a **positive** code counts as "already failing"; the reporter never
//!   overwrites one.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, OnceLock};

static PROCESS: OnceLock<ExitStatus> = OnceLock::new();

/// Shared exit-code cell.
#[derive(Clone, Debug, Default)]
pub struct ExitStatus {
    code: Arc<AtomicI32>,
}

impl ExitStatus {
    /// Creates a fresh cell holding `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell the process exits with.
    pub fn process() -> &'static ExitStatus {
        PROCESS.get_or_init(ExitStatus::new)
    }

    /// Current exit code.
    #[inline]
    pub fn get(&self) -> i32 {
        self.code.load(Ordering::SeqCst)
    }

    /// Assigns the exit code.
    #[inline]
    pub fn set(&self, code: i32) {
        self.code.store(code, Ordering::SeqCst);
    }

    /// True once a positive code was assigned.
    #[inline]
    pub fn is_failure(&self) -> bool {
        self.get() > 0
    }

    /// The current code as a [`std::process::ExitCode`].
    ///
    /// Codes outside `0..=255` map to `255`.
    #[must_use]
    pub fn to_exit_code(&self) -> std::process::ExitCode {
        std::process::ExitCode::from(u8::try_from(self.get()).unwrap_or(u8::MAX))
    }
}
