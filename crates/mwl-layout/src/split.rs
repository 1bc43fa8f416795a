#![forbid(unsafe_code)]

//! Split containers: children separated by draggable dividers.
//!
//! A [`SplitContainer`] owns everything one resizable container needs:
//!
//! - the committed track set (through a [`TrackReconciler`]),
//! - the divider tracks inserted between consecutive children,
//! - the realized pixel sizes last measured for the container,
//! - the active [`ResizeSession`], if a divider is being dragged.
//!
//! Child `i` always sits at track `2 * i`; the divider before it at
//! `2 * i - 1`. Dividers between two `Auto` children are kept as zero-width,
//! non-interactive tracks keyed `gap-<child>` so that indices stay regular.
//! Interactive dividers are keyed `divider-<child>`, so toggling a child
//! between `Auto` and resizable changes the key set. Unkeyed children fall
//! back to `child-<i>` with `i` the child index.
//!
//! While a drag is active, region updates are queued and applied right after
//! the drag commits. The session always finishes against the snapshot it
//! started with.

use std::sync::Arc;

use mwl_core::geometry::{Axis, Point, Rect};
use rustc_hash::FxHashMap;

use crate::config::LayoutConfig;
use crate::divider::DividerCallbacks;
use crate::reconcile::{Reconciliation, TrackReconciler};
use crate::resize::{DividerNeighbors, DragOutcome, ResizeSession};
use crate::solve::realize_with;
use crate::template::{DragFrame, GridStyle, TrackPlacement, track_offsets};
use crate::track::{CommittedSize, Region, Track, TrackDefaults, TrackKey, TrackSet};

/// A divider track and the children it separates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerSlot {
    pub track_index: usize,
    pub neighbors: DividerNeighbors,
    /// `false` for a divider between two `Auto` children.
    pub interactive: bool,
}

/// What [`SplitContainer::update`] did with a region list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied(Reconciliation),
    /// A drag is active; the regions apply after it commits.
    Deferred,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    divider: usize,
    session: ResizeSession,
    frame: DragFrame,
}

/// A single-axis container with draggable dividers.
#[derive(Debug, Clone)]
pub struct SplitContainer {
    axis: Axis,
    divider_size: u32,
    defaults: TrackDefaults,
    reconciler: TrackReconciler,
    dividers: Vec<DividerSlot>,
    drag: Option<ActiveDrag>,
    pending_regions: Option<Vec<Region>>,
    measured: Vec<u32>,
    measured_length: u32,
}

impl SplitContainer {
    #[must_use]
    pub fn new(axis: Axis, config: &LayoutConfig, regions: &[Region]) -> Self {
        let defaults = config.split_defaults();
        let (expanded, dividers) = insert_dividers(regions, config.divider_size, defaults);
        Self {
            axis,
            divider_size: config.divider_size,
            defaults,
            reconciler: TrackReconciler::new(build_tracks(&expanded, defaults)),
            dividers,
            drag: None,
            pending_regions: None,
            measured: Vec::new(),
            measured_length: 0,
        }
    }

    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Committed tracks, dividers included.
    #[must_use]
    pub fn tracks(&self) -> &Arc<TrackSet> {
        self.reconciler.committed()
    }

    /// Bumped whenever a new track set is committed.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.reconciler.generation()
    }

    #[must_use]
    pub fn dividers(&self) -> &[DividerSlot] {
        &self.dividers
    }

    /// Number of children, dividers excluded.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.tracks().len().div_ceil(2)
    }

    /// Track index of child `child`.
    #[must_use]
    pub const fn child_track(child: usize) -> usize {
        child * 2
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The active resize session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&ResizeSession> {
        self.drag.as_ref().map(|drag| &drag.session)
    }

    /// Placements changed by the latest drag frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&DragFrame> {
        self.drag.as_ref().map(|drag| &drag.frame)
    }

    /// Whether region updates are queued behind the active drag.
    #[must_use]
    pub fn has_pending_update(&self) -> bool {
        self.pending_regions.is_some()
    }

    /// Re-declare the children.
    pub fn update(&mut self, regions: &[Region]) -> UpdateOutcome {
        if self.drag.is_some() {
            tracing::debug!(
                target: "mwl.split",
                regions = regions.len(),
                "drag active, deferring rebuild"
            );
            self.pending_regions = Some(regions.to_vec());
            return UpdateOutcome::Deferred;
        }
        UpdateOutcome::Applied(self.apply(regions))
    }

    /// Realize the committed tracks in `length` pixels.
    ///
    /// `measure_auto` supplies content lengths for `Auto` children.
    pub fn measure<F>(&mut self, length: u32, measure_auto: F) -> &[u32]
    where
        F: FnMut(&Track) -> u32,
    {
        self.measured = realize_with(self.reconciler.committed(), length, measure_auto);
        self.measured_length = length;
        &self.measured
    }

    /// Record pixel sizes measured by the host.
    pub fn set_measured(&mut self, pixels: Vec<u32>, length: u32) {
        self.measured = pixels;
        self.measured_length = length;
    }

    /// Pixel sizes from the last measurement.
    #[must_use]
    pub fn measured(&self) -> &[u32] {
        &self.measured
    }

    /// Grid template of the committed tracks.
    #[must_use]
    pub fn grid_style(&self) -> GridStyle {
        GridStyle::new(self.reconciler.committed(), self.axis)
    }

    /// Current placements: the live drag if one is active, the last
    /// measurement otherwise.
    #[must_use]
    pub fn live_placements(&self) -> Vec<TrackPlacement> {
        match &self.drag {
            Some(drag) => track_offsets(drag.session.working_pixels()),
            None => track_offsets(&self.measured),
        }
    }

    /// Committed child sizes in the persistable form.
    #[must_use]
    pub fn committed_sizes(&self) -> Vec<CommittedSize> {
        let tracks = TrackSet::new(
            self.tracks()
                .iter()
                .filter(|t| !t.is_divider())
                .cloned()
                .collect(),
        );
        tracks.committed_sizes()
    }

    /// The interactive divider under `point`, with the container at `bounds`.
    #[must_use]
    pub fn divider_at(&self, point: Point, bounds: Rect) -> Option<usize> {
        let placements = self.live_placements();
        self.dividers.iter().position(|slot| {
            slot.interactive
                && placements
                    .get(slot.track_index)
                    .is_some_and(|p| bounds.slice(self.axis, p.offset, p.size).contains(point))
        })
    }

    fn apply(&mut self, regions: &[Region]) -> Reconciliation {
        let (expanded, dividers) = insert_dividers(regions, self.divider_size, self.defaults);
        let fresh = build_tracks(&expanded, self.defaults);
        let previous = self.measured_by_key();
        let outcome = self.reconciler.reconcile(fresh);
        self.dividers = dividers;
        if outcome != Reconciliation::Unchanged && !self.measured.is_empty() {
            // Keep measured `Auto` lengths for keys that survived.
            let length = self.measured_length;
            self.measure(length, |track| {
                previous.get(&track.key.to_string()).copied().unwrap_or(0)
            });
        }
        outcome
    }

    fn measured_by_key(&self) -> FxHashMap<String, u32> {
        self.reconciler
            .committed()
            .iter()
            .zip(&self.measured)
            .map(|(track, &px)| (track.key.to_string(), px))
            .collect()
    }
}

impl DividerCallbacks for SplitContainer {
    fn on_drag_start(&mut self, divider: usize) -> bool {
        if let Some(active) = &self.drag {
            tracing::debug!(
                target: "mwl.split",
                divider,
                active = active.divider,
                "another divider is being dragged"
            );
            return false;
        }
        let Some(slot) = self.dividers.get(divider).copied() else {
            tracing::debug!(target: "mwl.split", divider, "unknown divider");
            return false;
        };
        if !slot.interactive {
            return false;
        }
        match ResizeSession::start(
            self.reconciler.committed(),
            &self.measured,
            slot.neighbors,
            self.measured_length,
        ) {
            Ok(session) => {
                self.drag = Some(ActiveDrag {
                    divider,
                    session,
                    frame: DragFrame::default(),
                });
                true
            }
            Err(err) => {
                tracing::debug!(target: "mwl.split", divider, error = %err, "drag ignored");
                false
            }
        }
    }

    fn on_drag(&mut self, divider: usize, delta: i32) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if drag.divider != divider {
            return;
        }
        let outcome: DragOutcome = drag.session.drag(delta);
        drag.frame = DragFrame::from_outcome(&outcome, drag.session.working_pixels());
    }

    fn on_drag_finish(&mut self, divider: usize) {
        let Some(drag) = self.drag.take_if(|drag| drag.divider == divider) else {
            return;
        };
        let pixels = drag.session.working_pixels().to_vec();
        let committed = drag.session.finish();
        let outcome = self.reconciler.commit(committed);
        self.measured = pixels;
        tracing::debug!(target: "mwl.split", divider, ?outcome, "drag committed");

        if let Some(regions) = self.pending_regions.take() {
            let outcome = self.apply(&regions);
            tracing::debug!(target: "mwl.split", ?outcome, "applied deferred rebuild");
        }
    }
}

/// Build the expanded track set, keying unkeyed children by child index.
fn build_tracks(expanded: &[Region], defaults: TrackDefaults) -> TrackSet {
    let mut tracks = TrackSet::build(expanded, defaults);
    tracks.renumber_positional(|track| track / 2);
    tracks
}

/// Interleave divider regions between consecutive children.
fn insert_dividers(
    regions: &[Region],
    divider_size: u32,
    defaults: TrackDefaults,
) -> (Vec<Region>, Vec<DividerSlot>) {
    let mut expanded = Vec::with_capacity(regions.len() * 2);
    let mut dividers = Vec::with_capacity(regions.len().saturating_sub(1));
    for (child, region) in regions.iter().enumerate() {
        if child > 0 {
            let previous = &regions[child - 1];
            let interactive = !(previous.resolve(defaults).0.is_auto() && region.resolve(defaults).0.is_auto());
            let next_track = SplitContainer::child_track(child);
            let next_key = region
                .key
                .clone()
                .map_or(TrackKey::Positional(child), TrackKey::Explicit);
            let divider = if interactive {
                Region::divider(format!("divider-{next_key}"), divider_size)
            } else {
                Region::divider(format!("gap-{next_key}"), 0)
            };
            expanded.push(divider);
            dividers.push(DividerSlot {
                track_index: next_track - 1,
                neighbors: DividerNeighbors::new(next_track - 2, next_track),
                interactive,
            });
        }
        expanded.push(region.clone());
    }
    (expanded, dividers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::SizeToken;

    fn container(regions: &[Region]) -> SplitContainer {
        SplitContainer::new(Axis::Horizontal, &LayoutConfig::default(), regions)
    }

    #[test]
    fn dividers_interleave_children() {
        let split = container(&[Region::keyed("a"), Region::keyed("b"), Region::new()]);
        let keys: Vec<String> = split.tracks().iter().map(|t| t.key.to_string()).collect();
        assert_eq!(keys, ["a", "divider-b", "b", "divider-child-2", "child-2"]);
        assert_eq!(split.child_count(), 3);
        assert_eq!(
            split.dividers()[1],
            DividerSlot {
                track_index: 3,
                neighbors: DividerNeighbors::new(2, 4),
                interactive: true,
            }
        );
        let divider = &split.tracks()[1];
        assert_eq!(divider.size, SizeToken::Fixed(4.0));
        assert_eq!(divider.min_size, 4);
    }

    #[test]
    fn children_default_to_fill_with_split_minimum() {
        let split = container(&[Region::keyed("a"), Region::keyed("b")]);
        assert_eq!(split.tracks()[0].size, SizeToken::FILL);
        assert_eq!(split.tracks()[0].min_size, 5);
    }

    #[test]
    fn divider_between_auto_children_is_suppressed() {
        let split = container(&[
            Region::keyed("a").with_size("auto"),
            Region::keyed("b").with_size("auto"),
            Region::keyed("c"),
        ]);
        assert!(!split.dividers()[0].interactive);
        assert_eq!(split.tracks()[1].size, SizeToken::Fixed(0.0));
        assert_eq!(split.tracks()[1].key.to_string(), "gap-b");
        assert!(split.dividers()[1].interactive);
        assert_eq!(split.tracks()[3].key.to_string(), "divider-c");
    }

    fn sizes(split: &SplitContainer) -> Vec<SizeToken> {
        split.tracks().iter().map(|t| t.size).collect()
    }

    #[test]
    fn children_turning_auto_drop_the_divider() {
        let mut split = container(&[Region::keyed("a"), Region::keyed("b")]);
        split.measure(404, |_| 0);
        let outcome = split.update(&[
            Region::keyed("a").with_size("auto"),
            Region::keyed("b").with_size("auto"),
        ]);
        assert_eq!(outcome, UpdateOutcome::Applied(Reconciliation::Replaced));
        assert_eq!(
            sizes(&split),
            vec![SizeToken::Auto, SizeToken::Fixed(0.0), SizeToken::Auto]
        );
        assert!(!split.dividers()[0].interactive);
        assert!(!split.on_drag_start(0));
    }

    #[test]
    fn auto_child_turning_fill_gets_a_divider() {
        let mut split = container(&[
            Region::keyed("a").with_size("auto"),
            Region::keyed("b").with_size("auto"),
        ]);
        split.update(&[Region::keyed("a").with_size("auto"), Region::keyed("b").with_fill()]);
        assert_eq!(
            sizes(&split),
            vec![SizeToken::Auto, SizeToken::Fixed(4.0), SizeToken::FILL]
        );
        assert!(split.dividers()[0].interactive);
        assert_eq!(split.measure(404, |_| 0), &[0, 4, 400]);
    }

    #[test]
    fn unkeyed_children_are_named_by_child_index() {
        let split = container(&[Region::keyed("a"), Region::new(), Region::new()]);
        let names: Vec<String> = split.committed_sizes().into_iter().map(|s| s.key).collect();
        assert_eq!(names, ["a", "child-1", "child-2"]);
        let template = split.grid_style().to_string();
        assert!(template.contains("[divider-child-2] 4px [child-2]"), "{template}");
    }

    #[test]
    fn drag_through_callbacks_commits() {
        let mut split = container(&[Region::keyed("a"), Region::keyed("b")]);
        assert_eq!(split.measure(404, |_| 0), &[200, 4, 200]);
        assert!(split.on_drag_start(0));
        split.on_drag(0, 50);
        assert_eq!(split.live_placements()[2].offset, 254);
        let frame = split.last_frame().expect("frame");
        assert_eq!(frame.placements.len(), 3);
        split.on_drag_finish(0);

        assert!(!split.is_dragging());
        let sizes: Vec<SizeToken> = split.tracks().iter().map(|t| t.size).collect();
        assert_eq!(
            sizes,
            vec![SizeToken::Flex(5.0), SizeToken::Fixed(4.0), SizeToken::Flex(3.0)]
        );
        assert_eq!(split.measured(), &[250, 4, 150]);
    }

    #[test]
    fn only_one_session_at_a_time() {
        let mut split = container(&[Region::keyed("a"), Region::keyed("b"), Region::keyed("c")]);
        split.measure(608, |_| 0);
        assert!(split.on_drag_start(0));
        assert!(!split.on_drag_start(1));
        split.on_drag(1, 30);
        assert_eq!(split.session().map(|s| s.touched()), Some(None));
    }

    #[test]
    fn start_without_measurement_is_ignored() {
        let mut split = container(&[Region::keyed("a"), Region::keyed("b")]);
        assert!(!split.on_drag_start(0));
        assert!(!split.on_drag_start(7));
        assert!(!split.is_dragging());
    }

    #[test]
    fn rebuild_during_drag_is_deferred() {
        let mut split = container(&[Region::keyed("a"), Region::keyed("b")]);
        split.measure(404, |_| 0);
        assert!(split.on_drag_start(0));
        split.on_drag(0, 50);

        let outcome = split.update(&[Region::keyed("a"), Region::keyed("b"), Region::keyed("c")]);
        assert_eq!(outcome, UpdateOutcome::Deferred);
        assert_eq!(split.tracks().len(), 3);
        assert!(split.has_pending_update());

        split.on_drag_finish(0);
        assert!(!split.has_pending_update());
        assert_eq!(split.child_count(), 3);
        // New key set: the committed drag result is replaced.
        assert_eq!(split.tracks()[0].size, SizeToken::FILL);
    }

    #[test]
    fn same_regions_after_drag_keep_committed_sizes() {
        let regions = [Region::keyed("a"), Region::keyed("b")];
        let mut split = container(&regions);
        split.measure(404, |_| 0);
        split.on_drag_start(0);
        split.on_drag(0, -100);
        split.on_drag_finish(0);
        let generation = split.generation();

        assert_eq!(split.update(&regions), UpdateOutcome::Applied(Reconciliation::Unchanged));
        assert_eq!(split.generation(), generation);
        assert_eq!(split.tracks()[0].size, SizeToken::Flex(1.0));
        assert_eq!(split.tracks()[2].size, SizeToken::Flex(3.0));
    }

    #[test]
    fn hit_test_finds_divider() {
        let mut split = container(&[Region::keyed("a"), Region::keyed("b")]);
        split.measure(404, |_| 0);
        let bounds = Rect::new(10, 0, 404, 100);
        assert_eq!(split.divider_at(Point::new(212, 50), bounds), Some(0));
        assert_eq!(split.divider_at(Point::new(209, 50), bounds), None);
        assert_eq!(split.divider_at(Point::new(214, 50), bounds), None);
    }

    #[test]
    fn committed_sizes_skip_dividers() {
        let split = container(&[Region::keyed("a").with_size(120u32), Region::keyed("b")]);
        let sizes = split.committed_sizes();
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[0].key, "a");
        assert_eq!(sizes[0].size, SizeToken::Fixed(120.0));
    }
}
