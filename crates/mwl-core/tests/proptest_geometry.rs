//! Property tests for rectangle slicing, axis deltas and move coalescing.
//!
//! 1. A slice never spills past its parent
//! 2. A slice keeps the parent's cross-axis extent
//! 3. Deltas are antisymmetric and ignore the cross axis
//! 4. The coalescer hands back only the latest move

use mwl_core::event::PointerEvent;
use mwl_core::event_coalescer::PointerCoalescer;
use mwl_core::geometry::{Axis, Point, Rect};
use proptest::prelude::*;

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0u32..10_000, 0u32..10_000, 0u32..5_000, 0u32..5_000)
        .prop_map(|(x, y, width, height)| Rect::new(x, y, width, height))
}

fn axis_strategy() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Horizontal), Just(Axis::Vertical)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn slice_stays_inside_parent(
        rect in rect_strategy(),
        axis in axis_strategy(),
        offset in 0u32..6_000,
        length in 0u32..6_000,
    ) {
        let slice = rect.slice(axis, offset, length);
        prop_assert!(slice.length(axis) <= length);
        prop_assert!(slice.x >= rect.x && slice.y >= rect.y);
        prop_assert!(slice.right() <= rect.right());
        prop_assert!(slice.bottom() <= rect.bottom());
    }

    #[test]
    fn slice_keeps_cross_extent(
        rect in rect_strategy(),
        axis in axis_strategy(),
        offset in 0u32..6_000,
        length in 0u32..6_000,
    ) {
        let slice = rect.slice(axis, offset, length);
        prop_assert_eq!(slice.cross_length(axis), rect.cross_length(axis));
    }

    #[test]
    fn delta_is_antisymmetric(
        ax in 0u32..1_000_000,
        ay in 0u32..1_000_000,
        bx in 0u32..1_000_000,
        by in 0u32..1_000_000,
        axis in axis_strategy(),
    ) {
        let a = Point::new(ax, ay);
        let b = Point::new(bx, by);
        prop_assert_eq!(a.delta_from(b, axis), -b.delta_from(a, axis));
        let moved_across = match axis {
            Axis::Horizontal => Point::new(ax, by),
            Axis::Vertical => Point::new(bx, ay),
        };
        prop_assert_eq!(a.delta_from(moved_across, axis), 0);
    }

    #[test]
    fn coalescer_keeps_latest_move(moves in prop::collection::vec((0u32..4_000, 0u32..4_000), 1..40)) {
        let mut coalescer = PointerCoalescer::new();
        for &(x, y) in &moves {
            prop_assert!(coalescer.push(PointerEvent::moved(x, y)).is_none());
        }
        let (x, y) = moves[moves.len() - 1];
        prop_assert_eq!(coalescer.flush().map(|e| e.position), Some(Point::new(x, y)));
        prop_assert!(coalescer.flush().is_none());
    }
}
