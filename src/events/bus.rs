//! # Event bus for rejection events.
//!
//! [`Bus`] is the event source the reconciler listens to. Producers (tracked
//! tasks, or a host runtime with its own promise model) publish
//! [`Event`]s; attached [`Subscribe`] implementations receive them
//! synchronously, and async observers can follow a broadcast mirror.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                 Subscribers:
//!   Tracked task 1 ──┐
//!   Tracked task 2 ──┼──► Bus::publish ──► attached (sync, in order) ──► Reconciler, LogWriter, ...
//!   Host runtime   ──┘          │
//!                               └──────► broadcast mirror ──► Bus::subscribe() receivers (async)
//! ```
//!
//! ## Rules
//! - **Synchronous delivery**: `publish()` returns after every attached subscriber ran.
//! - **No lock held while delivering**: subscribers may publish re-entrantly.
//! - **Panic isolation**: a panicking subscriber is logged and skipped.
//! - **Mirror is fire-and-forget**: bounded capacity, lagging receivers skip the oldest events.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::event::Event;
use crate::subscribers::Subscribe;

/// Default capacity of the broadcast mirror.
pub const DEFAULT_MIRROR_CAPACITY: usize = 1024;

/// Process-wide bus used by [`install`](crate::install) and [`spawn`](crate::spawn).
static GLOBAL: OnceLock<Bus> = OnceLock::new();

/// Source of the two rejection notifications.
///
/// The reconciler only needs to be attached to *something* that delivers
/// `UnhandledRejection` / `RejectionHandled` events; [`Bus`] is the
/// implementation shipped with the crate.
pub trait RejectionSource: Send + Sync + 'static {
    /// Attaches a subscriber that receives all events published from now on.
    fn attach(&self, subscriber: Arc<dyn Subscribe>);
}

struct Inner {
    subscribers: RwLock<Vec<Arc<dyn Subscribe>>>,
    tx: broadcast::Sender<Event>,
}

/// Event bus for rejection events.
///
/// ### Properties
/// - **Cloneable**: cheap to clone (internally holds an `Arc`).
/// - **Ordered**: attached subscribers observe events in publish order.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<Inner>,
}

impl Bus {
    /// Creates a new bus with the given mirror capacity.
    ///
    /// The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                subscribers: RwLock::new(Vec::new()),
                tx,
            }),
        }
    }

    /// Returns the process-wide bus, creating it on first use.
    pub fn global() -> &'static Bus {
        GLOBAL.get_or_init(Bus::default)
    }

    /// Publishes an event to attached subscribers, then to the mirror.
    pub fn publish(&self, ev: Event) {
        let subs = self.inner.subscribers.read().clone();
        for sub in &subs {
            if let Err(panic_err) = catch_unwind(AssertUnwindSafe(|| sub.on_event(&ev))) {
                tracing::error!(
                    subscriber = sub.name(),
                    seq = ev.seq,
                    "subscriber panicked: {:?}",
                    panic_err
                );
            }
        }
        let _ = self.inner.tx.send(ev);
    }

    /// Creates a new receiver on the broadcast mirror.
    ///
    /// - A receiver only gets events **sent after** it subscribes.
    /// - Slow receivers get `RecvError::Lagged(n)` and skip over missed items.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.tx.subscribe()
    }

    /// Number of attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

impl RejectionSource for Bus {
    fn attach(&self, subscriber: Arc<dyn Subscribe>) {
        tracing::debug!(subscriber = subscriber.name(), "subscriber attached");
        self.inner.subscribers.write().push(subscriber);
    }
}

impl Default for Bus {
    fn default() -> Self {
        Bus::new(DEFAULT_MIRROR_CAPACITY)
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, PromiseId, Reason};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(EventKind, PromiseId)>>);

    impl Subscribe for Recorder {
        fn on_event(&self, ev: &Event) {
            self.0.lock().push((ev.kind, ev.promise));
        }
    }

    struct Panicker;

    impl Subscribe for Panicker {
        fn on_event(&self, _ev: &Event) {
            panic!("subscriber bug");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    #[test]
    fn delivers_in_publish_order() {
        let bus = Bus::default();
        let rec = Arc::new(Recorder::default());
        bus.attach(rec.clone());

        let (a, b) = (PromiseId::next(), PromiseId::next());
        bus.publish(Event::unhandled(a, Reason::absent()));
        bus.publish(Event::unhandled(b, Reason::absent()));
        bus.publish(Event::handled(a));

        assert_eq!(
            *rec.0.lock(),
            vec![
                (EventKind::UnhandledRejection, a),
                (EventKind::UnhandledRejection, b),
                (EventKind::RejectionHandled, a),
            ]
        );
    }

    #[test]
    fn panicking_subscriber_does_not_block_others() {
        let bus = Bus::default();
        let rec = Arc::new(Recorder::default());
        bus.attach(Arc::new(Panicker));
        bus.attach(rec.clone());

        bus.publish(Event::handled(PromiseId::next()));
        assert_eq!(rec.0.lock().len(), 1);
    }

    #[test]
    fn events_before_attach_are_not_replayed() {
        let bus = Bus::default();
        bus.publish(Event::handled(PromiseId::next()));

        let rec = Arc::new(Recorder::default());
        bus.attach(rec.clone());
        assert!(rec.0.lock().is_empty());
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn mirror_receives_published_events() {
        let bus = Bus::new(4);
        let mut rx = bus.subscribe();
        let p = PromiseId::next();
        bus.publish(Event::unhandled(p, Reason::value(0)));

        let ev = rx.try_recv().expect("mirrored event");
        assert_eq!(ev.promise, p);
        assert_eq!(ev.reason, Some(Reason::value("0")));
    }
}
