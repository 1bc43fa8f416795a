#![forbid(unsafe_code)]

//! Core: pixel geometry, pointer events, and logging plumbing.
//!
//! # Role in the layout engine
//! `mwl-core` is the host-facing layer. It owns the value types the engine
//! exchanges with the surrounding application: rectangles and axes for
//! arranging panels, and canonical pointer events for divider dragging.
//!
//! # Primary responsibilities
//! - **Geometry**: [`geometry::Rect`], [`geometry::Point`], [`geometry::Axis`].
//! - **Pointer events**: [`event::PointerEvent`] normalized from host input.
//! - **Coalescing**: [`event_coalescer::PointerCoalescer`] keeps at most one
//!   pending move per frame.
//! - **Logging**: `tracing` macro re-exports with no-op fallbacks.

pub mod event;
pub mod event_coalescer;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
