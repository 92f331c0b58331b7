//! Tracked tokio tasks: the crate's native producer of rejection events.
//!
//! - [`Tracker`] spawns fallible futures and publishes rejections to a [`Bus`](crate::Bus).
//! - [`Tracked`] is the awaitable handle; awaiting it marks the rejection handled.

mod tracked;

pub use tracked::{Tracked, Tracker};
