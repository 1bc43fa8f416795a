//! Scripted divider drags.
//!
//! A script `body:0:-120` presses divider 0 of split container `body` at its
//! center, moves the pointer 120 px toward the start of the axis in two
//! steps, and releases. Events go through [`DividerDragMachine`], the same
//! path a host feeds real pointer input through.

use std::fmt;
use std::str::FromStr;

use mwl_core::event::PointerEvent;
use mwl_core::geometry::{Axis, Point, Rect};
use mwl_layout::{Arrangement, Composer, DividerDragMachine, DividerDragTransition};
use serde::Serialize;

use crate::error::{DemoError, Result};

/// One scripted drag: `CONTAINER:SLOT:DELTA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragScript {
    pub container: String,
    pub slot: usize,
    pub delta: i32,
}

impl FromStr for DragScript {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let (Some(delta), Some(slot), Some(container)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected CONTAINER:SLOT:DELTA, got {s:?}"));
        };
        if container.is_empty() {
            return Err(format!("missing container key in {s:?}"));
        }
        let slot = slot
            .parse()
            .map_err(|_| format!("divider slot must be a non-negative integer, got {slot:?}"))?;
        let delta = delta
            .strip_prefix('+')
            .unwrap_or(delta)
            .parse()
            .map_err(|_| format!("delta must be an integer pixel count, got {delta:?}"))?;
        Ok(Self {
            container: container.to_owned(),
            slot,
            delta,
        })
    }
}

impl fmt::Display for DragScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{:+}", self.container, self.slot, self.delta)
    }
}

/// What happened while replaying one script.
#[derive(Debug, Clone, Serialize)]
pub struct DragRecord {
    pub script: String,
    pub divider: String,
    pub transitions: Vec<DividerDragTransition>,
}

impl DragRecord {
    /// The release transition.
    #[must_use]
    pub fn last(&self) -> Option<&DividerDragTransition> {
        self.transitions.last()
    }
}

/// Replay `script` against the state left by `arrangement`.
pub fn replay(
    composer: &mut Composer,
    arrangement: &Arrangement,
    script: &DragScript,
) -> Result<DragRecord> {
    let coalesce = composer.config().coalesce_pointer_moves;
    let placed = arrangement
        .divider(&script.container, script.slot)
        .ok_or_else(|| DemoError::invalid(format!("no divider {script}")))?;
    if !placed.interactive {
        return Err(DemoError::invalid(format!(
            "divider {} between content-sized panels cannot be dragged",
            placed.key
        )));
    }
    let bounds = arrangement
        .rect(&script.container)
        .ok_or_else(|| DemoError::invalid(format!("no container {:?}", script.container)))?;
    let split = composer
        .split_mut(&script.container)
        .ok_or_else(|| DemoError::invalid(format!("{:?} is not a split container", script.container)))?;

    let axis = split.axis();
    let mut machine = if coalesce {
        DividerDragMachine::coalescing(axis)
    } else {
        DividerDragMachine::new(axis)
    };
    let press = center(placed.rect);
    let halfway = offset(press, axis, script.delta / 2);
    let target = offset(press, axis, script.delta);

    let mut transitions = Vec::with_capacity(6);
    let hit = split.divider_at(press, bounds);
    transitions.push(machine.handle(PointerEvent::down(press.x, press.y), hit, split));
    for step in [halfway, target] {
        transitions.push(machine.handle(PointerEvent::moved(step.x, step.y), None, split));
        transitions.extend(machine.flush_frame(split));
    }
    transitions.push(machine.handle(PointerEvent::up(target.x, target.y), None, split));

    tracing::debug!(
        target: "mwl.demo",
        script = %script,
        transitions = transitions.len(),
        "drag replayed"
    );
    Ok(DragRecord {
        script: script.to_string(),
        divider: placed.key.clone(),
        transitions,
    })
}

fn center(rect: Rect) -> Point {
    Point::new(rect.x + rect.width / 2, rect.y + rect.height / 2)
}

/// `point` moved by `delta` along `axis`, clamped to the viewport origin.
fn offset(point: Point, axis: Axis, delta: i32) -> Point {
    let shift = |value: u32| {
        (i64::from(value) + i64::from(delta)).clamp(0, i64::from(u32::MAX)) as u32
    };
    match axis {
        Axis::Horizontal => Point::new(shift(point.x), point.y),
        Axis::Vertical => Point::new(point.x, shift(point.y)),
    }
}
