//! # Event subscriber trait.
//!
//! Provides [`Subscribe`] an extension point for plugging handlers into the [`Bus`](crate::Bus).
//!
//! ## Rules
//! - Delivery is **synchronous**: `on_event` runs on the publisher's thread,
//!   inside `Bus::publish`.
//! - Events arrive in publish order.
//! - **Panic isolation**: a panic is caught by the bus and logged; other
//!   subscribers still receive the event.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use loud_rejection::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct Counter(AtomicUsize);
//!
//! impl Subscribe for Counter {
//!     fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::UnhandledRejection) {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "counter" }
//! }
//! ```

use crate::events::Event;

/// Synchronous event subscriber.
///
/// ### Implementation requirements
/// - Do not block or await; the publisher is waiting.
/// - Do not hold locks that a publisher may also take.
/// - Handle errors internally; do not panic.
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
