#![forbid(unsafe_code)]

//! Tracks, track sets, and the builder that derives them from regions.
//!
//! A [`Region`] is what the surrounding application declares for one child
//! slot of a container. [`TrackSet::build`] normalizes an ordered region list
//! into [`Track`] records with a classified size and a minimum, applying the
//! container's [`TrackDefaults`] to regions that declare neither a size nor
//! the fill shorthand.

use std::fmt;
use std::ops::Index;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::size::SizeToken;

/// Identity of a track across rebuilds.
///
/// Only explicit keys are stable. A positional key is derived from the
/// child's index and stops identifying the same child as soon as anything is
/// inserted or removed before it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrackKey {
    /// Identity supplied by the declaring application.
    Explicit(String),
    /// Fallback identity from the child's position.
    Positional(usize),
}

impl TrackKey {
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }

    /// The explicit identity, if any.
    #[must_use]
    pub fn explicit(&self) -> Option<&str> {
        match self {
            Self::Explicit(id) => Some(id),
            Self::Positional(_) => None,
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(id) => f.write_str(id),
            Self::Positional(index) => write!(f, "child-{index}"),
        }
    }
}

/// What a track slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackRole {
    /// An application panel or nested container.
    #[default]
    Content,
    /// Synthetic filler that pushes following tracks to the far edge.
    Spacer,
    /// A draggable boundary inserted by a split container.
    Divider,
}

/// One child slot along a container's axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub key: TrackKey,
    pub index: usize,
    pub size: SizeToken,
    pub min_size: u32,
    pub role: TrackRole,
}

impl Track {
    #[must_use]
    pub const fn is_divider(&self) -> bool {
        matches!(self.role, TrackRole::Divider)
    }
}

/// Size defaults a container applies to regions that declare no size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackDefaults {
    pub size: SizeToken,
    pub min_size: u32,
}

impl TrackDefaults {
    /// Plain containers: content-sized children, no minimum.
    pub const GENERAL: TrackDefaults = TrackDefaults {
        size: SizeToken::Auto,
        min_size: 0,
    };

    /// Split containers: children share the space and keep a few pixels so
    /// their neighbors' dividers stay grabbable.
    pub const SPLIT: TrackDefaults = TrackDefaults {
        size: SizeToken::FILL,
        min_size: 5,
    };
}

impl Default for TrackDefaults {
    fn default() -> Self {
        Self::GENERAL
    }
}

/// A child slot as declared by the application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub key: Option<String>,
    pub size: Option<SizeToken>,
    pub min_size: Option<u32>,
    /// Shorthand for `Flex(1)`; loses to an explicit `size`.
    pub fill: bool,
    pub role: TrackRole,
}

impl Region {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// A spacer region; always `Flex(1)` with no minimum.
    #[must_use]
    pub fn spacer() -> Self {
        Self {
            role: TrackRole::Spacer,
            ..Self::default()
        }
    }

    /// A divider region of the given thickness.
    #[must_use]
    pub fn divider(key: impl Into<String>, thickness: u32) -> Self {
        Self {
            key: Some(key.into()),
            size: Some(SizeToken::from(thickness)),
            min_size: Some(thickness),
            fill: false,
            role: TrackRole::Divider,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<SizeToken>) -> Self {
        self.size = Some(size.into());
        self
    }

    #[must_use]
    pub fn with_min_size(mut self, min_size: u32) -> Self {
        self.min_size = Some(min_size);
        self
    }

    #[must_use]
    pub fn with_fill(mut self) -> Self {
        self.fill = true;
        self
    }

    /// Size and minimum this region resolves to under `defaults`.
    #[must_use]
    pub fn resolve(&self, defaults: TrackDefaults) -> (SizeToken, u32) {
        match self.role {
            TrackRole::Spacer => (SizeToken::FILL, 0),
            TrackRole::Divider => (
                self.size.map_or(SizeToken::Fixed(0.0), SizeToken::normalized),
                self.min_size.unwrap_or(0),
            ),
            TrackRole::Content => match (self.size, self.fill) {
                (Some(size), _) => (size.normalized(), self.min_size.unwrap_or(0)),
                (None, true) => (SizeToken::FILL, self.min_size.unwrap_or(0)),
                (None, false) => (
                    defaults.size.normalized(),
                    self.min_size.unwrap_or(defaults.min_size),
                ),
            },
        }
    }
}

/// Persistable size of one track: key, symbolic size, minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedSize {
    pub key: String,
    pub size: SizeToken,
    pub min_size: u32,
}

/// Replay committed sizes onto region declarations.
///
/// Matching is by explicit key only; regions without a key keep their
/// declared size. Returns how many regions were overridden.
pub fn apply_overrides(regions: &mut [Region], committed: &[CommittedSize]) -> usize {
    let mut applied = 0;
    for region in regions.iter_mut() {
        let Some(key) = region.key.as_deref() else {
            continue;
        };
        if let Some(saved) = committed.iter().find(|saved| saved.key == key) {
            region.size = Some(saved.size);
            region.min_size = Some(saved.min_size);
            applied += 1;
        }
    }
    applied
}

/// Ordered tracks of one container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackSet {
    tracks: Vec<Track>,
}

impl TrackSet {
    #[must_use]
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Build a track set from region declarations.
    ///
    /// Pure and order-preserving. Duplicate explicit keys are reported but
    /// kept; reconciliation then recovers from the first of them.
    #[must_use]
    pub fn build(regions: &[Region], defaults: TrackDefaults) -> Self {
        let tracks: Vec<Track> = regions
            .iter()
            .enumerate()
            .map(|(index, region)| {
                let (size, min_size) = region.resolve(defaults);
                Track {
                    key: region
                        .key
                        .clone()
                        .map_or(TrackKey::Positional(index), TrackKey::Explicit),
                    index,
                    size,
                    min_size,
                    role: region.role,
                }
            })
            .collect();
        let set = Self { tracks };
        for key in set.duplicate_keys() {
            tracing::warn!(target: "mwl.track", key = %key, "duplicate track key");
        }
        set
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Track] {
        &self.tracks
    }

    /// Replace one track's size in place.
    pub(crate) fn set_size(&mut self, index: usize, size: SizeToken) {
        if let Some(track) = self.tracks.get_mut(index) {
            track.size = size;
        }
    }

    /// Renumber positional keys through `child_of`, a map from track index
    /// to child index.
    pub(crate) fn renumber_positional(&mut self, child_of: impl Fn(usize) -> usize) {
        for track in &mut self.tracks {
            if let TrackKey::Positional(index) = track.key {
                track.key = TrackKey::Positional(child_of(index));
            }
        }
    }

    /// Explicit keys that occur more than once, in first-seen order.
    #[must_use]
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        let mut duplicates = Vec::new();
        for key in self.tracks.iter().filter_map(|t| t.key.explicit()) {
            if !seen.insert(key) && !duplicates.contains(&key) {
                duplicates.push(key);
            }
        }
        duplicates
    }

    /// Position of the first track with explicit key `key`.
    #[must_use]
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.tracks
            .iter()
            .position(|track| track.key.explicit() == Some(key))
    }

    /// Sizes in the persistable form.
    #[must_use]
    pub fn committed_sizes(&self) -> Vec<CommittedSize> {
        self.tracks
            .iter()
            .map(|track| CommittedSize {
                key: track.key.to_string(),
                size: track.size,
                min_size: track.min_size,
            })
            .collect()
    }
}

impl Index<usize> for TrackSet {
    type Output = Track;

    fn index(&self, index: usize) -> &Track {
        &self.tracks[index]
    }
}

impl<'a> IntoIterator for &'a TrackSet {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
