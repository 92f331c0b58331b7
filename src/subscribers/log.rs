//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [unhandled] promise=Promise(3) reason=Some(Value("false"))
//! [handled] promise=Promise(3)
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders one event as a log line.
    pub fn render(e: &Event) -> String {
        match e.kind {
            EventKind::UnhandledRejection => {
                format!("[unhandled] promise={} reason={:?}", e.promise, e.reason)
            }
            EventKind::RejectionHandled => format!("[handled] promise={}", e.promise),
        }
    }
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        println!("{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PromiseId, Reason};

    #[test]
    fn renders_both_kinds() {
        let p = PromiseId::next();
        let line = LogWriter::render(&Event::unhandled(p, Reason::absent()));
        assert!(line.starts_with("[unhandled] promise=Promise("));
        assert!(line.ends_with("reason=Some(Absent)"));

        let line = LogWriter::render(&Event::handled(p));
        assert_eq!(line, format!("[handled] promise={p}"));
    }
}
