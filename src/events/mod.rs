//! Rejection events: types and bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish rejection notifications to the reconciler.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`PromiseId`], [`Reason`] event classification and payload
//! - [`Bus`] synchronous fan-out with a `tokio::sync::broadcast` mirror
//! - [`RejectionSource`] the seam the installer attaches the reconciler to
//!
//! ## Quick reference
//! - **Publishers**: [`Tracked`](crate::Tracked) tasks, host runtimes calling `Bus::publish`.
//! - **Consumers**: the reconciler (attached by `install`), optional `LogWriter`,
//!   async mirror receivers.

mod bus;
mod event;

pub use bus::{Bus, DEFAULT_MIRROR_CAPACITY, RejectionSource};
pub use event::{Event, EventKind, PromiseId, Reason};
