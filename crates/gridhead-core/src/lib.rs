//! Core primitives for gridhead.
//!
//! This crate provides the reactive building blocks the header controllers
//! are written against:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change notification
//! - **Property System**: Values with change detection and atomic
//!   conditional updates
//! - **Logging**: `tracing` target names shared by every gridhead crate
//!
//! # Example
//!
//! ```
//! use gridhead_core::{Property, Signal};
//!
//! let busy = Property::new(false);
//! let busy_changed = Signal::<bool>::new();
//!
//! busy_changed.connect(|busy| println!("busy: {busy}"));
//!
//! if busy.set(true) {
//!     busy_changed.emit(true);
//! }
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
