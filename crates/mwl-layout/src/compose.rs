#![forbid(unsafe_code)]

//! Recursive composition of single-axis containers.
//!
//! Every container negotiates sizes along one axis only. Two-dimensional
//! layouts are trees: a vertical container whose child is a horizontal
//! split, and so on. [`Composer`] walks a [`LayoutNode`] tree, keeps the
//! per-container state (committed tracks, dividers, active drag) across
//! passes keyed by container key, and produces the rectangle of every node.
//!
//! Content-sized (`Auto`) nodes are measured from the `content_width` /
//! `content_height` declared on leaves, summed along a container's own axis
//! and maxed across it.

use mwl_core::geometry::{Axis, Point, Rect};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::reconcile::TrackReconciler;
use crate::size::SizeToken;
use crate::solve::realize_with;
use crate::split::SplitContainer;
use crate::template::{GridStyle, TrackPlacement, track_offsets};
use crate::track::{Region, Track, TrackKey, TrackRole, TrackSet};

/// One node of a layout description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutNode {
    /// A panel mounted by the application.
    Leaf {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<SizeToken>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_size: Option<u32>,
        #[serde(default)]
        fill: bool,
        /// Natural content width, used when the leaf is `Auto` sized.
        #[serde(default)]
        content_width: u32,
        /// Natural content height, used when the leaf is `Auto` sized.
        #[serde(default)]
        content_height: u32,
    },
    /// Filler pushing the following siblings to the far edge.
    Spacer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
    /// A nested container.
    Container {
        key: String,
        #[serde(default)]
        axis: Axis,
        /// Insert draggable dividers between children.
        #[serde(default)]
        split: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<SizeToken>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_size: Option<u32>,
        #[serde(default)]
        fill: bool,
        #[serde(default)]
        children: Vec<LayoutNode>,
    },
}

impl LayoutNode {
    #[must_use]
    pub fn leaf(key: impl Into<String>) -> Self {
        Self::Leaf {
            key: key.into(),
            size: None,
            min_size: None,
            fill: false,
            content_width: 0,
            content_height: 0,
        }
    }

    #[must_use]
    pub fn spacer(key: impl Into<String>) -> Self {
        Self::Spacer {
            key: Some(key.into()),
        }
    }

    #[must_use]
    pub fn container(key: impl Into<String>, axis: Axis, children: Vec<LayoutNode>) -> Self {
        Self::Container {
            key: key.into(),
            axis,
            split: false,
            size: None,
            min_size: None,
            fill: false,
            children,
        }
    }

    #[must_use]
    pub fn split(key: impl Into<String>, axis: Axis, children: Vec<LayoutNode>) -> Self {
        Self::Container {
            key: key.into(),
            axis,
            split: true,
            size: None,
            min_size: None,
            fill: false,
            children,
        }
    }

    #[must_use]
    pub fn with_size(mut self, value: impl Into<SizeToken>) -> Self {
        if let Self::Leaf { size, .. } | Self::Container { size, .. } = &mut self {
            *size = Some(value.into());
        }
        self
    }

    #[must_use]
    pub fn with_min_size(mut self, value: u32) -> Self {
        if let Self::Leaf { min_size, .. } | Self::Container { min_size, .. } = &mut self {
            *min_size = Some(value);
        }
        self
    }

    #[must_use]
    pub fn with_fill(mut self) -> Self {
        if let Self::Leaf { fill, .. } | Self::Container { fill, .. } = &mut self {
            *fill = true;
        }
        self
    }

    #[must_use]
    pub fn with_content(mut self, width: u32, height: u32) -> Self {
        if let Self::Leaf {
            content_width,
            content_height,
            ..
        } = &mut self
        {
            *content_width = width;
            *content_height = height;
        }
        self
    }

    /// Key of this node, if it has one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Leaf { key, .. } | Self::Container { key, .. } => Some(key.as_str()),
            Self::Spacer { key } => key.as_deref(),
        }
    }

    /// The region this node declares in its parent.
    #[must_use]
    pub fn region(&self) -> Region {
        match self {
            Self::Spacer { key } => Region {
                key: key.clone(),
                ..Region::spacer()
            },
            Self::Leaf {
                key,
                size,
                min_size,
                fill,
                ..
            }
            | Self::Container {
                key,
                size,
                min_size,
                fill,
                ..
            } => Region {
                key: Some(key.clone()),
                size: *size,
                min_size: *min_size,
                fill: *fill,
                role: TrackRole::Content,
            },
        }
    }

    /// Natural content length along `axis`.
    #[must_use]
    pub fn natural_length(&self, axis: Axis, divider_size: u32) -> u32 {
        match self {
            Self::Leaf {
                content_width,
                content_height,
                ..
            } => match axis {
                Axis::Horizontal => *content_width,
                Axis::Vertical => *content_height,
            },
            Self::Spacer { .. } => 0,
            Self::Container {
                axis: own,
                split,
                children,
                ..
            } => {
                let lengths = children.iter().map(|c| c.natural_length(axis, divider_size));
                if *own == axis {
                    let dividers = if *split {
                        divider_size.saturating_mul(children.len().saturating_sub(1) as u32)
                    } else {
                        0
                    };
                    lengths.fold(dividers, u32::saturating_add)
                } else {
                    lengths.max().unwrap_or(0)
                }
            }
        }
    }

    /// Visit every node in pre-order.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a LayoutNode)) {
        f(self);
        if let Self::Container { children, .. } = self {
            for child in children {
                child.visit(f);
            }
        }
    }
}

/// What a placed rectangle holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacedKind {
    Leaf,
    Spacer,
    Container,
}

/// The rectangle assigned to one keyed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedRegion {
    pub key: String,
    pub kind: PlacedKind,
    pub rect: Rect,
}

/// The rectangle of one divider of a split container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedDivider {
    pub container: String,
    pub slot: usize,
    pub key: String,
    pub rect: Rect,
    pub interactive: bool,
}

/// Result of one arrangement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Arrangement {
    pub regions: Vec<PlacedRegion>,
    pub dividers: Vec<PlacedDivider>,
}

impl Arrangement {
    /// Rectangle of the node keyed `key`.
    #[must_use]
    pub fn rect(&self, key: &str) -> Option<Rect> {
        self.regions.iter().find(|r| r.key == key).map(|r| r.rect)
    }

    /// Divider `slot` of container `container`.
    #[must_use]
    pub fn divider(&self, container: &str, slot: usize) -> Option<&PlacedDivider> {
        self.dividers
            .iter()
            .find(|d| d.container == container && d.slot == slot)
    }

    /// The interactive divider under `point`.
    #[must_use]
    pub fn divider_at(&self, point: Point) -> Option<&PlacedDivider> {
        self.dividers
            .iter()
            .find(|d| d.interactive && d.rect.contains(point))
    }
}

#[derive(Debug, Clone)]
enum ContainerState {
    Plain(TrackReconciler),
    Split(SplitContainer),
}

/// Arranges layout trees, keeping container state between passes.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    config: LayoutConfig,
    containers: FxHashMap<String, ContainerState>,
}

impl Composer {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            containers: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// State of the split container keyed `key`.
    #[must_use]
    pub fn split(&self, key: &str) -> Option<&SplitContainer> {
        match self.containers.get(key)? {
            ContainerState::Split(split) => Some(split),
            ContainerState::Plain(_) => None,
        }
    }

    pub fn split_mut(&mut self, key: &str) -> Option<&mut SplitContainer> {
        match self.containers.get_mut(key)? {
            ContainerState::Split(split) => Some(split),
            ContainerState::Plain(_) => None,
        }
    }

    /// Committed tracks of the container keyed `key`.
    #[must_use]
    pub fn tracks(&self, key: &str) -> Option<&TrackSet> {
        match self.containers.get(key)? {
            ContainerState::Split(split) => Some(split.tracks().as_ref()),
            ContainerState::Plain(reconciler) => Some(reconciler.committed().as_ref()),
        }
    }

    /// Grid template of the container keyed `key`.
    #[must_use]
    pub fn grid_style(&self, key: &str, axis: Axis) -> Option<GridStyle> {
        self.tracks(key).map(|tracks| GridStyle::new(tracks, axis))
    }

    /// Keys of all containers with state, sorted.
    #[must_use]
    pub fn container_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.containers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Arrange `root` in `viewport`.
    ///
    /// Containers that no longer appear in the tree lose their state.
    pub fn arrange(&mut self, root: &LayoutNode, viewport: Rect) -> Arrangement {
        let mut arrangement = Arrangement::default();
        let mut seen = FxHashSet::default();
        self.arrange_node(root, viewport, &mut arrangement, &mut seen);
        let before = self.containers.len();
        self.containers.retain(|key, _| seen.contains(key));
        if self.containers.len() != before {
            tracing::debug!(
                target: "mwl.compose",
                dropped = before - self.containers.len(),
                "dropped state of removed containers"
            );
        }
        tracing::trace!(
            target: "mwl.compose",
            regions = arrangement.regions.len(),
            dividers = arrangement.dividers.len(),
            "arranged"
        );
        arrangement
    }

    fn arrange_node(
        &mut self,
        node: &LayoutNode,
        rect: Rect,
        out: &mut Arrangement,
        seen: &mut FxHashSet<String>,
    ) {
        match node {
            LayoutNode::Leaf { key, .. } => out.regions.push(PlacedRegion {
                key: key.clone(),
                kind: PlacedKind::Leaf,
                rect,
            }),
            LayoutNode::Spacer { key } => {
                if let Some(key) = key {
                    out.regions.push(PlacedRegion {
                        key: key.clone(),
                        kind: PlacedKind::Spacer,
                        rect,
                    });
                }
            }
            LayoutNode::Container {
                key,
                axis,
                split,
                children,
                ..
            } => {
                out.regions.push(PlacedRegion {
                    key: key.clone(),
                    kind: PlacedKind::Container,
                    rect,
                });
                seen.insert(key.clone());
                let placements = self.place_children(key, *axis, *split, children, rect);
                if let Some(ContainerState::Split(state)) = self.containers.get(key) {
                    for (slot, divider) in state.dividers().iter().enumerate() {
                        let Some(p) = placements.get(divider.track_index) else {
                            continue;
                        };
                        out.dividers.push(PlacedDivider {
                            container: key.clone(),
                            slot,
                            key: state.tracks()[divider.track_index].key.to_string(),
                            rect: rect.slice(*axis, p.offset, p.size),
                            interactive: divider.interactive,
                        });
                    }
                }
                let child_tracks = self.child_tracks(key, children);
                for (child, track) in children.iter().zip(child_tracks) {
                    let child_rect = track
                        .and_then(|track| placements.get(track))
                        .map_or(Rect::new(rect.x, rect.y, 0, 0), |p| {
                            rect.slice(*axis, p.offset, p.size)
                        });
                    self.arrange_node(child, child_rect, out, seen);
                }
            }
        }
    }

    /// Track index of each child of container `key`.
    ///
    /// A dragging split keeps the tracks of the children declared at press
    /// time, so children are matched to them by key. A child with no track
    /// there gets `None`.
    fn child_tracks(&self, key: &str, children: &[LayoutNode]) -> Vec<Option<usize>> {
        match self.containers.get(key) {
            Some(ContainerState::Split(state)) if state.is_dragging() => children
                .iter()
                .enumerate()
                .map(|(index, child)| {
                    let wanted = child
                        .key()
                        .map_or(TrackKey::Positional(index), |key| TrackKey::Explicit(key.to_owned()));
                    state
                        .tracks()
                        .iter()
                        .position(|track| !track.is_divider() && track.key == wanted)
                })
                .collect(),
            Some(ContainerState::Split(_)) => (0..children.len())
                .map(|index| Some(SplitContainer::child_track(index)))
                .collect(),
            _ => (0..children.len()).map(Some).collect(),
        }
    }

    /// Update the container's tracks and realize them in `rect`.
    fn place_children(
        &mut self,
        key: &str,
        axis: Axis,
        split: bool,
        children: &[LayoutNode],
        rect: Rect,
    ) -> Vec<TrackPlacement> {
        let regions: Vec<Region> = children.iter().map(LayoutNode::region).collect();
        let length = rect.length(axis);
        let divider_size = self.config.divider_size;
        let stride = if split { 2 } else { 1 };
        let measure = |track: &Track| {
            if track.index % stride != 0 {
                return 0;
            }
            children
                .get(track.index / stride)
                .map_or(0, |child| child.natural_length(axis, divider_size))
        };

        let state = self
            .containers
            .entry(key.to_owned())
            .and_modify(|state| {
                let matches = match state {
                    ContainerState::Split(s) => split && s.axis() == axis,
                    ContainerState::Plain(_) => !split,
                };
                if !matches {
                    tracing::debug!(target: "mwl.compose", key, "container kind changed, resetting state");
                    *state = new_state(&self.config, axis, split, &regions);
                }
            })
            .or_insert_with(|| new_state(&self.config, axis, split, &regions));

        match state {
            ContainerState::Split(container) => {
                container.update(&regions);
                if !container.is_dragging() {
                    container.measure(length, measure);
                }
                container.live_placements()
            }
            ContainerState::Plain(reconciler) => {
                reconciler.reconcile(TrackSet::build(&regions, self.config.container_defaults()));
                track_offsets(&realize_with(reconciler.committed(), length, measure))
            }
        }
    }
}

fn new_state(config: &LayoutConfig, axis: Axis, split: bool, regions: &[Region]) -> ContainerState {
    if split {
        ContainerState::Split(SplitContainer::new(axis, config, regions))
    } else {
        ContainerState::Plain(TrackReconciler::new(TrackSet::build(
            regions,
            config.container_defaults(),
        )))
    }
}
