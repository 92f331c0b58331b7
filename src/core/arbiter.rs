//! # Exit-code arbiter.
//!
//! Holds the single override exit code every `install` caller must agree on.
//!
//! ## State
//! ```text
//! unset ──negotiate(Some(n))──► set(n) ──negotiate(Some(n))──► set(n)
//!   │                             └──negotiate(Some(m≠n))──► ConflictingExitCode
//!   └──negotiate(None)──► unset          negotiate(None)──► set(n)
//! any ──negotiate(Some(<0))──► NegativeExitCode (state unchanged)
//! ```

use parking_lot::Mutex;

use crate::config::DEFAULT_EXIT_CODE;
use crate::error::InstallError;

/// Negotiated override exit code.
#[derive(Debug, Default)]
pub(crate) struct ExitCodeArbiter {
    negotiated: Mutex<Option<i32>>,
}

impl ExitCodeArbiter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Validates `requested` and stores it if nothing was negotiated yet.
    pub(crate) fn negotiate(&self, requested: Option<i32>) -> Result<(), InstallError> {
        let Some(requested) = requested else {
            return Ok(());
        };
        if requested < 0 {
            return Err(InstallError::NegativeExitCode { value: requested });
        }

        let mut negotiated = self.negotiated.lock();
        match *negotiated {
            Some(current) if current != requested => {
                Err(InstallError::ConflictingExitCode { current, requested })
            }
            _ => {
                *negotiated = Some(requested);
                Ok(())
            }
        }
    }

    pub(crate) fn negotiated(&self) -> Option<i32> {
        *self.negotiated.lock()
    }

    /// Code applied when unhandled rejections remain and no failure code was set.
    pub(crate) fn failure_code(&self) -> i32 {
        self.negotiated().unwrap_or(DEFAULT_EXIT_CODE)
    }
}
