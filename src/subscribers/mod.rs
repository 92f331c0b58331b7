//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait for handling rejection events
//! delivered through the [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//! Tracked task ── publish(Event) ──► Bus ──► Subscribe::on_event(&Event)
//!                                              │
//!                                         ┌────┴─────┬──────────┐
//!                                         ▼          ▼          ▼
//!                                    Reconciler  LogWriter   Custom
//! ```
//!
//! ## Subscriber types
//! - **Stateful subscribers** maintain state from events (the reconciler's ledger)
//! - **Passive subscribers** observe and react (logging, metrics)

#[cfg(feature = "logging")]
mod log;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
