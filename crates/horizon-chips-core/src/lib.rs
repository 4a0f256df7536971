//! Core systems for Horizon Chips.
//!
//! This crate provides the foundational components shared by the chips widget
//! and its collaborators:
//!
//! - **Signal/Slot System**: Type-safe, re-entrancy-safe notifications
//! - **Property System**: Reactive properties with change detection
//! - **Geometry**: Points, sizes and rectangles used by layout
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_chips_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

pub mod geometry;
pub mod logging;
pub mod property;
pub mod signal;

pub use geometry::{Point, Rect, Size};
pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use property::Property;
pub use signal::{ConnectionId, Signal};
