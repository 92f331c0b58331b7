//! # Rejection events consumed by the reconciler.
//!
//! The [`EventKind`] enum has exactly two members, mirroring the two
//! notifications a promise runtime emits:
//! - **UnhandledRejection**: a promise was rejected and nothing observes it (yet)
//! - **RejectionHandled**: a previously unhandled promise gained an observer
//!
//! The [`Event`] struct carries the promise identity, the rejection
//! [`Reason`], a timestamp and a global sequence number.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! The two kinds are unordered relative to each other across promises; for a single
//! promise a well-behaved producer never publishes `RejectionHandled` before its
//! `UnhandledRejection`.
//!
//! ## Example
//! ```rust
//! use loud_rejection::{Event, EventKind, PromiseId, Reason};
//!
//! let p = PromiseId::next();
//! let ev = Event::unhandled(p, Reason::value(false));
//!
//! assert_eq!(ev.kind, EventKind::UnhandledRejection);
//! assert_eq!(ev.promise, p);
//! assert_eq!(ev.reason, Some(Reason::value("false")));
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Global counter for promise identities.
static PROMISE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a promise.
///
/// Only compared for equality; never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PromiseId(u64);

impl PromiseId {
    /// Allocates a fresh, process-unique identity.
    #[must_use]
    pub fn next() -> Self {
        Self(PROMISE_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric value (for logs).
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PromiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Promise({})", self.0)
    }
}

/// What a promise was rejected with.
///
/// The reason is captured as text at rejection time, so events stay cheap
/// to clone and the original error can still be handed to whoever awaits
/// the promise later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Rejected without a value.
    Absent,
    /// Rejected with an error; holds its stack (or cause chain) text.
    Error(Arc<str>),
    /// Rejected with a plain value; holds its display form.
    Value(Arc<str>),
}

impl Reason {
    /// Rejection without a value.
    #[inline]
    pub fn absent() -> Self {
        Reason::Absent
    }

    /// Rejection with a plain value, kept in its display form.
    ///
    /// Falsy-looking values (`false`, `0`, `""`) are still values.
    pub fn value(v: impl fmt::Display) -> Self {
        Reason::Value(v.to_string().into())
    }

    /// Rejection with an error whose stack text is already known.
    pub fn stack(text: impl Into<Arc<str>>) -> Self {
        Reason::Error(text.into())
    }

    /// Rejection with an error value.
    ///
    /// Renders the error followed by one `Caused by:` line per source.
    pub fn from_error<E: StdError + ?Sized>(err: &E) -> Self {
        let mut text = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            text.push_str("\n    Caused by: ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        Reason::Error(text.into())
    }

    /// Rejection caused by a panic; extracts the panic message when it is a string.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_owned()
        };
        Reason::Error(format!("panicked: {msg}").into())
    }

    /// True for [`Reason::Absent`].
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Reason::Absent)
    }
}

/// Classification of rejection events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A promise was rejected and is not (yet) handled.
    ///
    /// Sets:
    /// - `promise`: identity of the rejected promise
    /// - `reason`: rejection reason (`Reason::Absent` when rejected without a value)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    UnhandledRejection,

    /// A previously unhandled promise gained an observer.
    ///
    /// Sets:
    /// - `promise`: identity of the promise
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RejectionHandled,
}

/// Rejection event with metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Promise the event is about.
    pub promise: PromiseId,
    /// Rejection reason; only set for [`EventKind::UnhandledRejection`].
    pub reason: Option<Reason>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind, promise: PromiseId) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            promise,
            reason: None,
        }
    }

    /// Creates an [`EventKind::UnhandledRejection`] event.
    #[inline]
    pub fn unhandled(promise: PromiseId, reason: Reason) -> Self {
        Event::new(EventKind::UnhandledRejection, promise).with_reason(reason)
    }

    /// Creates an [`EventKind::RejectionHandled`] event.
    #[inline]
    pub fn handled(promise: PromiseId) -> Self {
        Event::new(EventKind::RejectionHandled, promise)
    }

    /// Attaches a rejection reason.
    #[inline]
    pub fn with_reason(mut self, reason: Reason) -> Self {
        self.reason = Some(reason);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("disk full")
        }
    }

    impl StdError for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("write failed")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn error_reason_includes_cause_chain() {
        let reason = Reason::from_error(&Outer(Inner));
        assert_eq!(
            reason,
            Reason::stack("write failed\n    Caused by: disk full")
        );
    }

    #[test]
    fn falsy_values_are_values() {
        assert_eq!(Reason::value(false), Reason::Value("false".into()));
        assert_eq!(Reason::value(0), Reason::Value("0".into()));
        assert!(!Reason::value("").is_absent());
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(Reason::from_panic(&*payload), Reason::stack("panicked: boom"));

        let payload: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(Reason::from_panic(&*payload), Reason::stack("panicked: kaboom"));
    }

    #[test]
    fn sequence_and_identity_increase() {
        let a = Event::handled(PromiseId::next());
        let b = Event::handled(PromiseId::next());
        assert!(b.seq > a.seq);
        assert!(b.promise > a.promise);
        assert!(a.reason.is_none());
    }
}
