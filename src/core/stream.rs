//! # Error stream.
//!
//! Line-oriented writer the exit reporter and the duplicate-install warning
//! write to. Each line is written and flushed synchronously: teardown runs
//! right before the process terminates, so nothing may be left in a buffer.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Synchronous, shareable diagnostic sink.
#[derive(Clone)]
pub struct ErrorStream {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl ErrorStream {
    /// Wraps any writer.
    pub fn new(w: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(w))),
        }
    }

    /// Unbuffered standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Writes `text` followed by a newline and flushes.
    ///
    /// Write errors are ignored.
    pub fn line(&self, text: &str) {
        let mut w = self.inner.lock();
        let _ = writeln!(w, "{text}");
        let _ = w.flush();
    }
}

impl std::fmt::Debug for ErrorStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ErrorStream")
    }
}
