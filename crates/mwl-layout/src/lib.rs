#![forbid(unsafe_code)]

//! Adaptive split-layout engine for the Miewer panel layout.
//!
//! # Role in the workspace
//! `mwl-layout` turns declarative region lists into sized tracks, keeps user
//! resizes stable across structural updates, and runs the divider drag
//! negotiation. It is host-agnostic: rendering output is grid directives and
//! pixel placements, input is canonical pointer events from `mwl-core`.
//!
//! # Pipeline
//! ```text
//! regions -> size (classify) -> track (build) -> reconcile (commit)
//!                                                  |-> template (every render)
//!                                                  '-> resize (on drag) -> reconcile
//! ```
//!
//! # Example
//! ```
//! use mwl_layout::{DividerNeighbors, Region, ResizeSession, SizeToken, TrackDefaults, TrackSet};
//! use mwl_layout::solve::realize;
//!
//! let tracks = TrackSet::build(
//!     &[
//!         Region::keyed("canvas").with_size(100u32),
//!         Region::keyed("terminal").with_fill(),
//!         Region::keyed("layers").with_fill(),
//!     ],
//!     TrackDefaults::GENERAL,
//! );
//! let pixels = realize(&tracks, 500);
//! assert_eq!(pixels, vec![100, 200, 200]);
//!
//! let mut session = ResizeSession::start(&tracks, &pixels, DividerNeighbors::new(1, 2), 500)?;
//! session.drag(50);
//! let committed = session.finish();
//! assert_eq!(committed[1].size, SizeToken::Flex(5.0));
//! assert_eq!(committed[2].size, SizeToken::Flex(3.0));
//! # Ok::<(), mwl_layout::ResizeStartError>(())
//! ```

pub mod compose;
pub mod config;
pub mod divider;
pub mod reconcile;
pub mod resize;
pub mod size;
pub mod solve;
pub mod split;
pub mod template;
pub mod track;

pub use compose::{Arrangement, Composer, LayoutNode, PlacedDivider, PlacedKind, PlacedRegion};
pub use config::{LayoutConfig, LayoutConfigError};
pub use divider::{
    DividerCallbacks, DividerDragEffect, DividerDragMachine, DividerDragNoopReason,
    DividerDragState, DividerDragTransition,
};
pub use reconcile::{Reconciliation, TrackReconciler};
pub use resize::{DividerNeighbors, DragOutcome, ResizeSession, ResizeStartError, TrackUpdate};
pub use size::{LayoutSize, SizeInfo, SizeKind, SizeToken};
pub use split::{DividerSlot, SplitContainer, UpdateOutcome};
pub use template::{
    DragFrame, FlowStyle, GridPlacement, GridStyle, TrackPlacement, flow_style, grid_placement,
    grid_template, grid_track_size, track_offsets,
};
pub use track::{
    CommittedSize, Region, Track, TrackDefaults, TrackKey, TrackRole, TrackSet, apply_overrides,
};
