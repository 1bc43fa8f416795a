#![forbid(unsafe_code)]

//! Rendering a track set into host styling.
//!
//! Two outputs:
//!
//! - **Static layout**: a grid track-sizing directive per container
//!   (`[header] auto [body] 1fr`), plus the grid line each child occupies.
//!   Regenerated on every render; stateless.
//! - **Live drag**: per-track pixel offsets from a session's working buffer.
//!   A drag frame only reports the tracks whose placement moved, so the host
//!   can patch them without rebuilding the directive string.
//!
//! [`flow_style`] is the alternative for hosts that compose children with a
//! flow (flexbox-like) model instead of a grid.

use std::fmt;

use mwl_core::geometry::Axis;
use serde::Serialize;

use crate::resize::DragOutcome;
use crate::size::{SizeToken, format_number};
use crate::track::{Track, TrackSet};

/// Sizing directive for one track: `120px`, `33%`, `2fr`, `auto`, or
/// `minmax(<min>px, <max>)` when a minimum applies.
///
/// A minimum larger than the maximum is emitted as is.
#[must_use]
pub fn grid_track_size(track: &Track) -> String {
    let max = match track.size.normalized() {
        SizeToken::Auto => "auto".to_owned(),
        SizeToken::Fixed(px) => format!("{}px", format_number(px)),
        SizeToken::Percent(pct) => format!("{}%", format_number(pct)),
        SizeToken::Flex(weight) => format!("{}fr", format_number(weight)),
    };
    if track.min_size == 0 {
        return max;
    }
    let min = format!("{}px", track.min_size);
    if min == max {
        max
    } else {
        format!("minmax({min}, {max})")
    }
}

/// Space-separated `[name] size` tokens for every track.
#[must_use]
pub fn grid_template(tracks: &TrackSet) -> String {
    tracks
        .iter()
        .map(|track| format!("[{}] {}", track.key, grid_track_size(track)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Grid template property and value for a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridStyle {
    pub property: &'static str,
    pub value: String,
}

impl GridStyle {
    #[must_use]
    pub fn new(tracks: &TrackSet, axis: Axis) -> Self {
        let property = match axis {
            Axis::Horizontal => "grid-template-columns",
            Axis::Vertical => "grid-template-rows",
        };
        Self {
            property,
            value: grid_template(tracks),
        }
    }
}

impl fmt::Display for GridStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)
    }
}

/// The grid line a child is placed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridPlacement {
    pub property: &'static str,
    pub line: String,
}

#[must_use]
pub fn grid_placement(track: &Track, axis: Axis) -> GridPlacement {
    let property = match axis {
        Axis::Horizontal => "grid-column",
        Axis::Vertical => "grid-row",
    };
    GridPlacement {
        property,
        line: track.key.to_string(),
    }
}

/// Flow-layout style of one track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FlowStyle {
    /// Grows by `grow`; `basis` is the minimum in pixels, `None` for `auto`.
    Flex {
        grow: f64,
        shrink: u32,
        basis: Option<u32>,
    },
    /// Explicit length along the axis (`"120px"`, `"33%"`).
    Length { length: String, min_size: u32 },
    /// Sized by content.
    Content { min_size: u32 },
}

impl FlowStyle {
    /// CSS declarations for a child of a container along `axis`.
    #[must_use]
    pub fn to_css(&self, axis: Axis) -> String {
        let (length_prop, min_prop) = match axis {
            Axis::Horizontal => ("width", "min-width"),
            Axis::Vertical => ("height", "min-height"),
        };
        match self {
            Self::Flex {
                grow,
                shrink,
                basis,
            } => {
                let basis = basis.map_or_else(|| "auto".to_owned(), |px| format!("{px}px"));
                format!("flex: {} {shrink} {basis}", format_number(*grow))
            }
            Self::Length { length, min_size } => {
                format!("flex: none; {length_prop}: {length}; {min_prop}: {min_size}px")
            }
            Self::Content { min_size } => format!("flex: none; {min_prop}: {min_size}px"),
        }
    }
}

#[must_use]
pub fn flow_style(track: &Track) -> FlowStyle {
    match track.size.normalized() {
        SizeToken::Flex(weight) => FlowStyle::Flex {
            grow: weight,
            shrink: 1,
            basis: (track.min_size > 0).then_some(track.min_size),
        },
        SizeToken::Fixed(px) => FlowStyle::Length {
            length: format!("{}px", format_number(px)),
            min_size: track.min_size,
        },
        SizeToken::Percent(pct) => FlowStyle::Length {
            length: format!("{}%", format_number(pct)),
            min_size: track.min_size,
        },
        SizeToken::Auto => FlowStyle::Content {
            min_size: track.min_size,
        },
    }
}

/// Pixel offset and length of one track along the container axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackPlacement {
    pub index: usize,
    pub offset: u32,
    pub size: u32,
}

/// Placements for consecutive tracks with the given pixel lengths.
#[must_use]
pub fn track_offsets(pixels: &[u32]) -> Vec<TrackPlacement> {
    let mut offset = 0u32;
    pixels
        .iter()
        .enumerate()
        .map(|(index, &size)| {
            let placement = TrackPlacement {
                index,
                offset,
                size,
            };
            offset = offset.saturating_add(size);
            placement
        })
        .collect()
}

/// Tracks whose placement changed in one drag frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DragFrame {
    pub placements: Vec<TrackPlacement>,
}

impl DragFrame {
    /// Placements to patch after `outcome`, read from `working_pixels`.
    ///
    /// A resize moves the two touched tracks and every track between them.
    /// An unchanged outcome restores the snapshot, so every track is
    /// reported.
    #[must_use]
    pub fn from_outcome(outcome: &DragOutcome, working_pixels: &[u32]) -> Self {
        let all = track_offsets(working_pixels);
        let placements = match *outcome {
            DragOutcome::Resized { left, right } => all
                .into_iter()
                .filter(|p| (left.index..=right.index).contains(&p.index))
                .collect(),
            DragOutcome::Unchanged => all,
        };
        Self { placements }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resize::TrackUpdate;
    use crate::track::{Region, TrackDefaults};

    fn one(region: Region) -> Track {
        TrackSet::build(&[region], TrackDefaults::GENERAL)[0].clone()
    }

    #[test]
    fn track_sizes_by_kind() {
        assert_eq!(grid_track_size(&one(Region::new().with_size(120u32))), "120px");
        assert_eq!(grid_track_size(&one(Region::new().with_size("33%"))), "33%");
        assert_eq!(grid_track_size(&one(Region::new().with_size("2*"))), "2fr");
        assert_eq!(grid_track_size(&one(Region::new().with_size("auto"))), "auto");
    }

    #[test]
    fn minimum_wraps_in_minmax() {
        let track = one(Region::new().with_size(120u32).with_min_size(150));
        assert_eq!(grid_track_size(&track), "minmax(150px, 120px)");
        let track = one(Region::new().with_fill().with_min_size(5));
        assert_eq!(grid_track_size(&track), "minmax(5px, 1fr)");
    }

    #[test]
    fn equal_minimum_is_not_wrapped() {
        let track = one(Region::new().with_size(4u32).with_min_size(4));
        assert_eq!(grid_track_size(&track), "4px");
    }

    #[test]
    fn template_names_tracks_by_key() {
        let tracks = TrackSet::build(
            &[Region::keyed("header"), Region::new().with_fill()],
            TrackDefaults::GENERAL,
        );
        assert_eq!(grid_template(&tracks), "[header] auto [child-1] 1fr");
        let style = GridStyle::new(&tracks, Axis::Vertical);
        assert_eq!(style.property, "grid-template-rows");
        assert_eq!(
            style.to_string(),
            "grid-template-rows: [header] auto [child-1] 1fr"
        );
    }

    #[test]
    fn placement_follows_axis() {
        let track = one(Region::keyed("terminal"));
        assert_eq!(
            grid_placement(&track, Axis::Horizontal),
            GridPlacement {
                property: "grid-column",
                line: "terminal".into()
            }
        );
        assert_eq!(grid_placement(&track, Axis::Vertical).property, "grid-row");
    }

    #[test]
    fn flow_styles() {
        let flex = flow_style(&one(Region::new().with_size("3*").with_min_size(20)));
        assert_eq!(flex.to_css(Axis::Horizontal), "flex: 3 1 20px");
        let fill = flow_style(&one(Region::new().with_fill()));
        assert_eq!(fill.to_css(Axis::Horizontal), "flex: 1 1 auto");
        let fixed = flow_style(&one(Region::new().with_size(300u32).with_min_size(300)));
        assert_eq!(
            fixed.to_css(Axis::Horizontal),
            "flex: none; width: 300px; min-width: 300px"
        );
        let pct = flow_style(&one(Region::new().with_size("20%")));
        assert_eq!(pct.to_css(Axis::Vertical), "flex: none; height: 20%; min-height: 0px");
        let auto = flow_style(&one(Region::new()));
        assert_eq!(auto, FlowStyle::Content { min_size: 0 });
    }

    #[test]
    fn offsets_accumulate() {
        let placements = track_offsets(&[100, 4, 250, 4, 150]);
        let offsets: Vec<u32> = placements.iter().map(|p| p.offset).collect();
        assert_eq!(offsets, vec![0, 100, 104, 354, 358]);
    }

    #[test]
    fn drag_frame_covers_touched_range() {
        let outcome = DragOutcome::Resized {
            left: TrackUpdate { index: 2, pixels: 250 },
            right: TrackUpdate { index: 4, pixels: 150 },
        };
        let frame = DragFrame::from_outcome(&outcome, &[100, 4, 250, 4, 150]);
        let indices: Vec<usize> = frame.placements.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![2, 3, 4]);
        assert_eq!(frame.placements[1].offset, 354);

        let reset = DragFrame::from_outcome(&DragOutcome::Unchanged, &[10, 20]);
        assert_eq!(reset.placements.len(), 2);
    }
}
