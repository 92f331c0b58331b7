//! # Tracked tasks.
//!
//! [`Tracker::spawn`] runs a fallible future on tokio and turns "it failed and
//! nobody was looking" into rejection events on a [`Bus`].
//!
//! ## Observation model
//! A [`Tracked`] handle counts as *observed* from its first poll (i.e. once
//! somebody awaits it) until it yields its output or is dropped.
//!
//! ```text
//! task settles Err(e) / panics
//!   ├─ handle observed ─► reason kept for the awaiter
//!   └─ not observed    ─► publish UnhandledRejection(id, reason)
//!
//! first poll of Tracked
//!   └─ rejection already published ─► publish RejectionHandled(id)   (once)
//!
//! Tracked dropped without poll       ─► rejection stays unhandled
//! Tracked dropped before its output  ─► observed cleared; a failure already
//!   (lost a timeout / select!)           settled is published now, a later one when it settles
//! ```
//!
//! ## Rules
//! - Observation and publishing share one lock, so `RejectionHandled` is never
//!   published before its `UnhandledRejection`.
//! - A panic is reported like an error, then resumed: the awaiter still gets a
//!   panicked [`JoinError`].
//! - Successful tasks never publish anything.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::task::{JoinError, JoinHandle};

use crate::events::{Bus, Event, PromiseId, Reason};

#[derive(Debug, Default)]
struct Watch {
    observed: bool,
    rejected: bool,
    /// Set when the task failed; republished if the output is never delivered.
    failure: Option<Reason>,
}

/// Spawns tasks whose unobserved failures are published to a bus.
#[derive(Clone, Debug)]
pub struct Tracker {
    bus: Bus,
}

impl Tracker {
    /// Creates a tracker publishing to `bus`.
    pub fn new(bus: Bus) -> Self {
        Self { bus }
    }

    /// Tracker over the process-wide bus.
    pub fn global() -> Self {
        Self::new(Bus::global().clone())
    }

    /// Spawns `fut` on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime (same as [`tokio::spawn`]).
    pub fn spawn<F, T, E>(&self, fut: F) -> Tracked<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: std::error::Error + Send + 'static,
    {
        let promise = PromiseId::next();
        let watch = Arc::new(Mutex::new(Watch::default()));

        let bus = self.bus.clone();
        let task_watch = Arc::clone(&watch);
        let handle = tokio::spawn(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(v)) => Ok(v),
                Ok(Err(e)) => {
                    reject(&bus, &task_watch, promise, || Reason::from_error(&e));
                    Err(e)
                }
                Err(payload) => {
                    reject(&bus, &task_watch, promise, || Reason::from_panic(&*payload));
                    std::panic::resume_unwind(payload)
                }
            }
        });

        Tracked {
            promise,
            handle,
            watch,
            bus: self.bus.clone(),
            delivered: false,
        }
    }
}

fn reject(bus: &Bus, watch: &Mutex<Watch>, promise: PromiseId, reason: impl FnOnce() -> Reason) {
    let mut w = watch.lock();
    let reason = reason();
    w.failure = Some(reason.clone());
    if w.observed {
        return;
    }
    w.rejected = true;
    bus.publish(Event::unhandled(promise, reason));
}

/// Handle to a tracked task.
///
/// Resolves like a [`JoinHandle`]: `Ok(task output)` or a [`JoinError`] if
/// the task panicked or was aborted.
#[derive(Debug)]
pub struct Tracked<T, E> {
    promise: PromiseId,
    handle: JoinHandle<Result<T, E>>,
    watch: Arc<Mutex<Watch>>,
    bus: Bus,
    delivered: bool,
}

impl<T, E> Tracked<T, E> {
    /// Identity used in rejection events.
    pub fn promise(&self) -> PromiseId {
        self.promise
    }

    /// True once the task finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Aborts the task. An aborted task is not a rejection.
    pub fn abort(&self) {
        self.handle.abort();
    }

    fn observe(&self) {
        let mut w = self.watch.lock();
        if w.observed {
            return;
        }
        w.observed = true;
        if w.rejected {
            self.bus.publish(Event::handled(self.promise));
        }
    }
}

impl<T, E> Future for Tracked<T, E> {
    type Output = Result<Result<T, E>, JoinError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        this.observe();
        let out = ready!(Pin::new(&mut this.handle).poll(cx));
        this.delivered = true;
        Poll::Ready(out)
    }
}

impl<T, E> Drop for Tracked<T, E> {
    fn drop(&mut self) {
        if self.delivered {
            return;
        }
        let mut w = self.watch.lock();
        if !std::mem::replace(&mut w.observed, false) {
            return;
        }
        if let Some(reason) = w.failure.clone() {
            w.rejected = true;
            self.bus.publish(Event::unhandled(self.promise, reason));
        }
    }
}
