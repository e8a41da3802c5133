//! Lifecycle events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by services and their workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Service::{init, run, stop}` and the worker loop.
//! - **Consumers**: anything holding a [`Bus::subscribe`] receiver (tests, demos,
//!   an embedding application's metrics).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
