#![forbid(unsafe_code)]

//! Track reconciliation across rebuilds.
//!
//! Containers rebuild their track set whenever the application re-declares
//! its regions. A user's divider drag is only remembered in the committed
//! set, so each rebuild is reconciled against it:
//!
//! 1. Same explicit key set: committed sizes are carried over by key.
//! 2. Different key set: the fresh set replaces the committed one.
//! 3. Recovered set equal to the committed one: nothing is published, so
//!    downstream consumers keep seeing the same allocation.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::track::{Track, TrackSet};

/// Whether `a` and `b` carry the same set of explicit keys.
///
/// Tracks without an explicit key are ignored on both sides. Multiplicity is
/// not compared, so `[a, a, b]` matches `[a, b]`.
#[must_use]
pub fn key_sets_match(a: &TrackSet, b: &TrackSet) -> bool {
    let keys_a: FxHashSet<&str> = a.iter().filter_map(|t| t.key.explicit()).collect();
    let keys_b: FxHashSet<&str> = b.iter().filter_map(|t| t.key.explicit()).collect();
    keys_a == keys_b
}

/// Carry sizes from `committed` onto `fresh`, matching explicit keys.
///
/// Fresh order is kept. When a key occurs more than once in `committed`, the
/// first occurrence supplies the size.
#[must_use]
pub fn recover_by_keys(fresh: &TrackSet, committed: &TrackSet) -> TrackSet {
    let tracks = fresh
        .iter()
        .map(|track| {
            let saved = track
                .key
                .explicit()
                .and_then(|key| committed.position_of(key))
                .map(|position| &committed[position]);
            match saved {
                Some(saved) => Track {
                    size: saved.size,
                    min_size: saved.min_size,
                    ..track.clone()
                },
                None => track.clone(),
            }
        })
        .collect();
    TrackSet::new(tracks)
}

/// Element-wise equality of key, size, minimum and role.
#[must_use]
pub fn sets_equal(a: &TrackSet, b: &TrackSet) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| {
            x.key == y.key && x.size == y.size && x.min_size == y.min_size && x.role == y.role
        })
}

/// What a rebuild did to the committed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The recovered set equals the committed one; the committed set (and
    /// its identity) is kept.
    Unchanged,
    /// Same keys, different sizes or order; sizes were carried over.
    Recovered,
    /// Keys changed; the fresh set replaced the committed one.
    Replaced,
}

/// Owner of a container's committed track set.
#[derive(Debug, Clone, Default)]
pub struct TrackReconciler {
    committed: Arc<TrackSet>,
    generation: u64,
}

impl TrackReconciler {
    #[must_use]
    pub fn new(initial: TrackSet) -> Self {
        Self {
            committed: Arc::new(initial),
            generation: 0,
        }
    }

    /// The currently committed set.
    #[must_use]
    pub fn committed(&self) -> &Arc<TrackSet> {
        &self.committed
    }

    /// Bumped every time a new set is published.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Reconcile a freshly built set against the committed one.
    pub fn reconcile(&mut self, fresh: TrackSet) -> Reconciliation {
        if !key_sets_match(&fresh, &self.committed) {
            tracing::debug!(
                target: "mwl.reconcile",
                before = self.committed.len(),
                after = fresh.len(),
                "key set changed, replacing tracks"
            );
            self.publish(fresh);
            return Reconciliation::Replaced;
        }
        let recovered = recover_by_keys(&fresh, &self.committed);
        if sets_equal(&recovered, &self.committed) {
            tracing::trace!(target: "mwl.reconcile", "tracks unchanged");
            return Reconciliation::Unchanged;
        }
        tracing::debug!(target: "mwl.reconcile", tracks = recovered.len(), "recovered committed sizes");
        self.publish(recovered);
        Reconciliation::Recovered
    }

    /// Publish a set produced by a finished resize.
    pub fn commit(&mut self, tracks: TrackSet) -> Reconciliation {
        if sets_equal(&tracks, &self.committed) {
            return Reconciliation::Unchanged;
        }
        self.publish(tracks);
        Reconciliation::Recovered
    }

    fn publish(&mut self, tracks: TrackSet) {
        self.committed = Arc::new(tracks);
        self.generation = self.generation.wrapping_add(1);
    }
}
