//! Error types returned by [`install`](crate::install).
//!
//! The only failures this crate reports to its caller are configuration
//! errors around the negotiated exit code. Both are detected eagerly, when
//! `install` is called, never deferred to teardown.
//!
//! [`InstallError`] provides helper methods (`as_label`, `as_message`) for
//! logging/metrics.

use thiserror::Error;

/// # Configuration errors raised by `install`.
///
/// These are programmer errors: the caller passed an exit code the process
/// cannot honor. Nothing is installed when one is returned.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// The requested override exit code was negative.
    #[error("loud-rejection: opts.exitCode can't be a negative number: {value}")]
    NegativeExitCode {
        /// The offending value.
        value: i32,
    },

    /// Two callers asked for different override exit codes.
    #[error("loud-rejection: two callers have tried to modify the exit code: {current}, {requested}")]
    ConflictingExitCode {
        /// The code negotiated by an earlier call.
        current: i32,
        /// The code this call asked for.
        requested: i32,
    },
}

impl InstallError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use loud_rejection::InstallError;
    ///
    /// let err = InstallError::NegativeExitCode { value: -1 };
    /// assert_eq!(err.as_label(), "install_negative_exit_code");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InstallError::NegativeExitCode { .. } => "install_negative_exit_code",
            InstallError::ConflictingExitCode { .. } => "install_conflicting_exit_code",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            InstallError::NegativeExitCode { value } => {
                format!("negative exit code: {value}")
            }
            InstallError::ConflictingExitCode { current, requested } => {
                format!("exit code already negotiated as {current}; requested {requested}")
            }
        }
    }
}
