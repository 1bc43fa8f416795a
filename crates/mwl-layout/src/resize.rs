#![forbid(unsafe_code)]

//! Resize sessions: one divider drag, from press to release.
//!
//! A [`ResizeSession`] snapshots the realized pixel sizes and minimums of a
//! container's tracks when the divider is pressed. Every drag frame is then
//! computed from that snapshot and the total delta since the press, so frames
//! may be skipped or coalesced without drift:
//!
//! 1. Find the track to grow or shrink on each side of the divider, skipping
//!    dividers and `Auto` tracks, plus tracks already at their minimum on the
//!    side that is shrinking.
//! 2. Move `delta` pixels between the two, clamped so both keep their
//!    minimum while the pair total stays exact.
//!
//! [`ResizeSession::finish`] re-encodes the final pixels into tokens of each
//! track's kind at press time, reducing flex weights by their greatest common
//! divisor so repeated drags keep small integer proportions.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::size::SizeToken;
use crate::track::TrackSet;

/// The two tracks a divider separates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DividerNeighbors {
    pub previous: usize,
    pub next: usize,
}

impl DividerNeighbors {
    #[must_use]
    pub const fn new(previous: usize, next: usize) -> Self {
        Self { previous, next }
    }
}

/// Why a session could not start. The gesture is ignored in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeStartError {
    /// The pixel snapshot does not cover the track set.
    SnapshotMismatch { tracks: usize, pixels: usize },
    /// A neighbor index is outside the track set.
    NeighborOutOfRange { index: usize, len: usize },
    /// The previous neighbor is not before the next one.
    NeighborsOutOfOrder { previous: usize, next: usize },
}

impl fmt::Display for ResizeStartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SnapshotMismatch { tracks, pixels } => write!(
                f,
                "pixel snapshot has {pixels} entries for {tracks} tracks"
            ),
            Self::NeighborOutOfRange { index, len } => write!(
                f,
                "divider neighbor {index} is out of range for {len} tracks"
            ),
            Self::NeighborsOutOfOrder { previous, next } => write!(
                f,
                "divider neighbors out of order: previous {previous}, next {next}"
            ),
        }
    }
}

impl std::error::Error for ResizeStartError {}

/// New pixel length of one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackUpdate {
    pub index: usize,
    pub pixels: u32,
}

/// Result of one drag frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Two tracks were resized; every track between them moved.
    Resized { left: TrackUpdate, right: TrackUpdate },
    /// No track can absorb the delta; working sizes equal the snapshot.
    Unchanged,
}

/// State of one divider drag.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    container_total: u32,
    axis_pixel_sizes: Vec<u32>,
    axis_min_sizes: Vec<u32>,
    non_participating: FxHashSet<usize>,
    previous_index: usize,
    next_index: usize,
    working_pixels: Vec<u32>,
    working_sizes: TrackSet,
    initial_sizes: TrackSet,
    touched: Option<(usize, usize)>,
}

impl ResizeSession {
    /// Start a session for the divider between `neighbors`.
    ///
    /// `pixel_sizes` are the realized lengths of `committed`, in order;
    /// `container_total` is the container's axis length, the base for
    /// re-encoding `Percent` tracks.
    pub fn start(
        committed: &TrackSet,
        pixel_sizes: &[u32],
        neighbors: DividerNeighbors,
        container_total: u32,
    ) -> Result<Self, ResizeStartError> {
        let len = committed.len();
        if pixel_sizes.len() != len {
            return Err(ResizeStartError::SnapshotMismatch {
                tracks: len,
                pixels: pixel_sizes.len(),
            });
        }
        for index in [neighbors.previous, neighbors.next] {
            if index >= len {
                return Err(ResizeStartError::NeighborOutOfRange { index, len });
            }
        }
        if neighbors.previous >= neighbors.next {
            return Err(ResizeStartError::NeighborsOutOfOrder {
                previous: neighbors.previous,
                next: neighbors.next,
            });
        }

        let non_participating = committed
            .iter()
            .enumerate()
            .filter(|(_, track)| track.is_divider() || track.size.is_auto())
            .map(|(index, _)| index)
            .collect();

        tracing::debug!(
            target: "mwl.resize",
            previous = neighbors.previous,
            next = neighbors.next,
            container_total,
            "resize session started"
        );

        Ok(Self {
            container_total,
            axis_pixel_sizes: pixel_sizes.to_vec(),
            axis_min_sizes: committed.iter().map(|t| t.min_size).collect(),
            non_participating,
            previous_index: neighbors.previous,
            next_index: neighbors.next,
            working_pixels: pixel_sizes.to_vec(),
            working_sizes: committed.clone(),
            initial_sizes: committed.clone(),
            touched: None,
        })
    }

    /// Apply the total pointer displacement since the press.
    ///
    /// Only the two touched entries of the working buffers are written.
    pub fn drag(&mut self, delta: i32) -> DragOutcome {
        self.restore_touched();

        let Some(left) = self.find_left(delta) else {
            tracing::trace!(target: "mwl.resize", delta, "no track to resize before divider");
            return DragOutcome::Unchanged;
        };
        let Some(right) = self.find_right(delta) else {
            tracing::trace!(target: "mwl.resize", delta, "no track to resize after divider");
            return DragOutcome::Unchanged;
        };

        let left_px = i64::from(self.axis_pixel_sizes[left]);
        let right_px = i64::from(self.axis_pixel_sizes[right]);
        let left_min = i64::from(self.axis_min_sizes[left]);
        let right_min = i64::from(self.axis_min_sizes[right]);
        let total = left_px + right_px;

        // Lower bound last: when the minimums cannot both fit, the left side
        // keeps its minimum.
        let new_left = (left_px + i64::from(delta))
            .min(total - right_min)
            .max(left_min)
            .clamp(0, total);
        let new_right = total - new_left;
        let new_left = total - new_right;

        let left_update = self.write(left, new_left);
        let right_update = self.write(right, new_right);
        self.touched = Some((left, right));

        tracing::trace!(
            target: "mwl.resize",
            delta,
            left,
            right,
            left_px = left_update.pixels,
            right_px = right_update.pixels,
            "drag frame"
        );
        DragOutcome::Resized {
            left: left_update,
            right: right_update,
        }
    }

    /// End the session, re-encoding the working pixels as tokens.
    #[must_use]
    pub fn finish(self) -> TrackSet {
        let flex_divisor = self.flex_divisor();
        let mut result = self.initial_sizes.clone();
        for (index, track) in self.initial_sizes.iter().enumerate() {
            let pixels = self.working_pixels[index];
            let size = match track.size {
                SizeToken::Auto => continue,
                SizeToken::Fixed(_) => SizeToken::Fixed(f64::from(pixels)),
                SizeToken::Percent(_) => {
                    if self.container_total == 0 {
                        continue;
                    }
                    let pct = u64::from(pixels) * 100 / u64::from(self.container_total);
                    SizeToken::Percent(pct as f64)
                }
                // A collapsed flex track reopens at unit weight.
                SizeToken::Flex(_) if pixels == 0 => SizeToken::FILL,
                SizeToken::Flex(_) => SizeToken::Flex(f64::from(pixels / flex_divisor)),
            };
            result.set_size(index, size);
        }
        tracing::debug!(
            target: "mwl.resize",
            previous = self.previous_index,
            next = self.next_index,
            flex_divisor,
            "resize session finished"
        );
        result
    }

    /// Realized pixel sizes at press time.
    #[must_use]
    pub fn snapshot(&self) -> &[u32] {
        &self.axis_pixel_sizes
    }

    /// Minimums at press time.
    #[must_use]
    pub fn min_sizes(&self) -> &[u32] {
        &self.axis_min_sizes
    }

    /// Current pixel sizes, including the live drag.
    #[must_use]
    pub fn working_pixels(&self) -> &[u32] {
        &self.working_pixels
    }

    /// Track set with touched tracks as `Fixed` pixel tokens.
    #[must_use]
    pub fn working_sizes(&self) -> &TrackSet {
        &self.working_sizes
    }

    /// Track set as it was at press time.
    #[must_use]
    pub fn initial_sizes(&self) -> &TrackSet {
        &self.initial_sizes
    }

    #[must_use]
    pub const fn neighbors(&self) -> DividerNeighbors {
        DividerNeighbors::new(self.previous_index, self.next_index)
    }

    #[must_use]
    pub const fn container_total(&self) -> u32 {
        self.container_total
    }

    /// Whether `index` can never be chosen as a resize target.
    #[must_use]
    pub fn is_non_participating(&self, index: usize) -> bool {
        self.non_participating.contains(&index)
    }

    /// The pair resized by the latest frame, if any.
    #[must_use]
    pub const fn touched(&self) -> Option<(usize, usize)> {
        self.touched
    }

    fn find_left(&self, delta: i32) -> Option<usize> {
        (0..=self.previous_index)
            .rev()
            .find(|&index| self.can_resize(index, delta < 0))
    }

    fn find_right(&self, delta: i32) -> Option<usize> {
        (self.next_index..self.axis_pixel_sizes.len()).find(|&index| self.can_resize(index, delta > 0))
    }

    fn can_resize(&self, index: usize, shrinking: bool) -> bool {
        if self.non_participating.contains(&index) {
            return false;
        }
        !(shrinking && self.axis_pixel_sizes[index] <= self.axis_min_sizes[index])
    }

    fn restore_touched(&mut self) {
        if let Some((left, right)) = self.touched.take() {
            for index in [left, right] {
                self.working_pixels[index] = self.axis_pixel_sizes[index];
                self.working_sizes
                    .set_size(index, self.initial_sizes[index].size);
            }
        }
    }

    fn write(&mut self, index: usize, pixels: i64) -> TrackUpdate {
        let pixels = u32::try_from(pixels.max(0)).unwrap_or(u32::MAX);
        self.working_pixels[index] = pixels;
        self.working_sizes
            .set_size(index, SizeToken::Fixed(f64::from(pixels)));
        TrackUpdate { index, pixels }
    }

    /// GCD of the positive pixel sizes of flex tracks; 1 with fewer than two.
    fn flex_divisor(&self) -> u32 {
        let qualifying: Vec<u32> = self
            .initial_sizes
            .iter()
            .zip(&self.working_pixels)
            .filter(|(track, pixels)| track.size.is_flex() && **pixels > 0)
            .map(|(_, pixels)| *pixels)
            .collect();
        if qualifying.len() < 2 {
            return 1;
        }
        qualifying.into_iter().fold(0, gcd).max(1)
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}
