//! Core systems for Trellis.
//!
//! This crate provides the foundational pieces shared by the Trellis data
//! layer:
//!
//! - **Signal/Slot System**: Type-safe multicast notifications
//! - **Logging conventions**: `tracing` target constants for filtering
//!
//! Trellis assumes a single serialized stream of mutations (the UI-thread
//! model), so signals invoke their slots directly on the emitting thread.
//! There is no queued or cross-thread dispatch.
//!
//! # Signal/Slot Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//!
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use signal::{ConnectionGuard, ConnectionId, Signal};
