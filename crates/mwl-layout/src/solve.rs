#![forbid(unsafe_code)]

//! Realized pixel sizes for a track set.
//!
//! The host toolkit normally does this when it applies a grid template; the
//! engine needs the same numbers to seed a resize session and to arrange a
//! composed layout without a host.
//!
//! Resolution order:
//! 1. `Fixed`, `Percent` and `Auto` tracks take their length (at least their
//!    minimum).
//! 2. `Flex` tracks split what is left by weight. A track whose share would
//!    fall below its minimum is frozen at the minimum and the rest is split
//!    again among the others.
//! 3. If the minimums alone exceed the container, every track degrades to a
//!    share of the container proportional to its minimum.
//!
//! Shares are rounded with the largest-remainder rule, so the flex tracks
//! always fill the remaining space to the exact pixel.

use crate::size::SizeToken;
use crate::track::{Track, TrackSet};

/// Realize `tracks` in a container of `total` pixels; `Auto` tracks measure 0.
#[must_use]
pub fn realize(tracks: &TrackSet, total: u32) -> Vec<u32> {
    realize_with(tracks, total, |_| 0)
}

/// Realize `tracks`, asking `measure_auto` for the content length of each
/// `Auto` track.
#[must_use]
pub fn realize_with<F>(tracks: &TrackSet, total: u32, mut measure_auto: F) -> Vec<u32>
where
    F: FnMut(&Track) -> u32,
{
    let total_px = u64::from(total);
    let min_sum: u64 = tracks.iter().map(|t| u64::from(t.min_size)).sum();
    if min_sum > total_px {
        let mins: Vec<f64> = tracks.iter().map(|t| f64::from(t.min_size)).collect();
        return distribute(total_px, &mins);
    }

    let mut sizes = vec![0u32; tracks.len()];
    let mut flex = Vec::new();
    let mut used: u64 = 0;
    for (index, track) in tracks.iter().enumerate() {
        let length = match track.size.normalized() {
            SizeToken::Fixed(px) => to_pixels(px),
            SizeToken::Percent(pct) => to_pixels(f64::from(total) * pct / 100.0),
            SizeToken::Auto => measure_auto(track),
            SizeToken::Flex(weight) => {
                flex.push((index, weight));
                continue;
            }
        };
        sizes[index] = length.max(track.min_size);
        used += u64::from(sizes[index]);
    }

    let mut remaining = total_px.saturating_sub(used);
    // Freeze flex tracks whose share would undercut their minimum.
    loop {
        let weight_sum: f64 = flex.iter().map(|(_, w)| w).sum();
        let mut frozen = false;
        flex.retain(|&(index, weight)| {
            let share = remaining as f64 * weight / weight_sum;
            let min = tracks[index].min_size;
            if share < f64::from(min) {
                sizes[index] = min;
                frozen = true;
                false
            } else {
                true
            }
        });
        if !frozen {
            break;
        }
        let frozen_px: u64 = tracks
            .iter()
            .enumerate()
            .filter(|(index, track)| {
                track.size.is_flex() && !flex.iter().any(|(i, _)| i == index)
            })
            .map(|(index, _)| u64::from(sizes[index]))
            .sum();
        remaining = total_px.saturating_sub(used + frozen_px);
    }

    let weights: Vec<f64> = flex.iter().map(|(_, w)| *w).collect();
    for ((index, _), share) in flex.iter().zip(distribute(remaining, &weights)) {
        sizes[*index] = share;
    }
    sizes
}

/// Split `amount` by `weights` using the largest-remainder rule.
///
/// Ties on the fractional part go to the lower index. All-zero weights
/// produce all-zero shares.
fn distribute(amount: u64, weights: &[f64]) -> Vec<u32> {
    let weight_sum: f64 = weights.iter().sum();
    if weights.is_empty() || weight_sum <= 0.0 {
        return vec![0; weights.len()];
    }
    let quotas: Vec<f64> = weights
        .iter()
        .map(|w| amount as f64 * w / weight_sum)
        .collect();
    let mut shares: Vec<u64> = quotas.iter().map(|q| q.floor() as u64).collect();
    let assigned: u64 = shares.iter().sum();
    let mut leftover = amount.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = quotas[a] - quotas[a].floor();
        let fb = quotas[b] - quotas[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });
    for index in order {
        if leftover == 0 {
            break;
        }
        if weights[index] > 0.0 {
            shares[index] += 1;
            leftover -= 1;
        }
    }
    shares
        .into_iter()
        .map(|s| u32::try_from(s).unwrap_or(u32::MAX))
        .collect()
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
