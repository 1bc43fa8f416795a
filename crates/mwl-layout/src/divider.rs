#![forbid(unsafe_code)]

//! Pointer protocol for divider drags.
//!
//! ```text
//! Idle --press on divider, start accepted--> Dragging
//! Dragging --move--> Dragging (total delta since press)
//! Dragging --release anywhere / pointer leaves window--> Idle
//! ```
//!
//! The machine only turns pointer events into [`DividerCallbacks`] calls.
//! The callee owns the resize session. Hit testing is the host's job: each
//! event arrives with the divider under the pointer, if any.
//!
//! A release is handled wherever it happens, so a drag can never be left
//! open by a release outside the divider. The release position is delivered
//! as a final move before the finish callback. Leaving the window finishes
//! the drag the same way; there is no path back to the pre-drag sizes.

use mwl_core::event::{PointerButton, PointerEvent, PointerEventKind};
use mwl_core::event_coalescer::PointerCoalescer;
use mwl_core::geometry::{Axis, Point};
use serde::Serialize;

/// Callbacks a divider drives during a drag.
pub trait DividerCallbacks {
    /// Press on `divider`. Returning `false` ignores the gesture.
    fn on_drag_start(&mut self, divider: usize) -> bool;

    /// Total displacement since the press along the container axis.
    fn on_drag(&mut self, divider: usize, delta: i32);

    /// Release or pointer leaving the window.
    fn on_drag_finish(&mut self, divider: usize);
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DividerDragState {
    Idle,
    Dragging {
        divider: usize,
        origin: Point,
        last_delta: i32,
    },
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DividerDragNoopReason {
    IdleWithoutActiveDrag,
    MissedDivider,
    NonPrimaryButton,
    ActiveDragAlreadyInProgress,
    MoveCoalesced,
    DeltaUnchanged,
}

/// Effect of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DividerDragEffect {
    DragStarted { divider: usize, origin: Point },
    StartRejected { divider: usize },
    DragUpdated { divider: usize, delta: i32 },
    Committed { divider: usize, delta: i32 },
    Noop { reason: DividerDragNoopReason },
}

/// One state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DividerDragTransition {
    pub transition_id: u64,
    pub from: DividerDragState,
    pub to: DividerDragState,
    pub effect: DividerDragEffect,
}

/// Divider drag machine for one container.
#[derive(Debug, Clone)]
pub struct DividerDragMachine {
    axis: Axis,
    state: DividerDragState,
    coalescer: Option<PointerCoalescer>,
    transition_counter: u64,
}

impl DividerDragMachine {
    /// Machine delivering every move immediately.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            state: DividerDragState::Idle,
            coalescer: None,
            transition_counter: 0,
        }
    }

    /// Machine holding moves until [`flush_frame`](Self::flush_frame).
    #[must_use]
    pub fn coalescing(axis: Axis) -> Self {
        Self {
            coalescer: Some(PointerCoalescer::new()),
            ..Self::new(axis)
        }
    }

    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub const fn state(&self) -> DividerDragState {
        self.state
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DividerDragState::Dragging { .. })
    }

    /// Feed one pointer event. `hit` is the divider under the pointer.
    pub fn handle<C>(
        &mut self,
        event: PointerEvent,
        hit: Option<usize>,
        callbacks: &mut C,
    ) -> DividerDragTransition
    where
        C: DividerCallbacks + ?Sized,
    {
        let from = self.state;
        let effect = match (self.state, event.kind) {
            (DividerDragState::Idle, PointerEventKind::Down(button)) => {
                self.press(button, event.position, hit, callbacks)
            }
            (DividerDragState::Idle, _) => DividerDragEffect::Noop {
                reason: DividerDragNoopReason::IdleWithoutActiveDrag,
            },
            (DividerDragState::Dragging { .. }, PointerEventKind::Down(_)) => {
                DividerDragEffect::Noop {
                    reason: DividerDragNoopReason::ActiveDragAlreadyInProgress,
                }
            }
            (DividerDragState::Dragging { .. }, PointerEventKind::Moved) => {
                match self.coalescer.as_mut() {
                    Some(coalescer) => {
                        let _ = coalescer.push(event);
                        DividerDragEffect::Noop {
                            reason: DividerDragNoopReason::MoveCoalesced,
                        }
                    }
                    None => self.deliver_move(event.position, callbacks),
                }
            }
            (
                DividerDragState::Dragging { divider, .. },
                PointerEventKind::Up(_) | PointerEventKind::LeftWindow,
            ) => {
                if let Some(coalescer) = self.coalescer.as_mut() {
                    coalescer.clear();
                }
                let _ = self.deliver_move(event.position, callbacks);
                let delta = self.last_delta().unwrap_or(0);
                self.state = DividerDragState::Idle;
                callbacks.on_drag_finish(divider);
                DividerDragEffect::Committed { divider, delta }
            }
        };
        self.transition(from, effect)
    }

    /// Deliver the move held back since the last frame, if any.
    pub fn flush_frame<C>(&mut self, callbacks: &mut C) -> Option<DividerDragTransition>
    where
        C: DividerCallbacks + ?Sized,
    {
        let pending = self.coalescer.as_mut()?.flush()?;
        if !self.is_dragging() {
            return None;
        }
        let from = self.state;
        let effect = self.deliver_move(pending.position, callbacks);
        Some(self.transition(from, effect))
    }

    fn press<C>(
        &mut self,
        button: PointerButton,
        origin: Point,
        hit: Option<usize>,
        callbacks: &mut C,
    ) -> DividerDragEffect
    where
        C: DividerCallbacks + ?Sized,
    {
        if button != PointerButton::Primary {
            return DividerDragEffect::Noop {
                reason: DividerDragNoopReason::NonPrimaryButton,
            };
        }
        let Some(divider) = hit else {
            return DividerDragEffect::Noop {
                reason: DividerDragNoopReason::MissedDivider,
            };
        };
        if !callbacks.on_drag_start(divider) {
            tracing::debug!(target: "mwl.split", divider, "divider drag rejected");
            return DividerDragEffect::StartRejected { divider };
        }
        self.state = DividerDragState::Dragging {
            divider,
            origin,
            last_delta: 0,
        };
        DividerDragEffect::DragStarted { divider, origin }
    }

    fn deliver_move<C>(&mut self, position: Point, callbacks: &mut C) -> DividerDragEffect
    where
        C: DividerCallbacks + ?Sized,
    {
        let DividerDragState::Dragging {
            divider,
            origin,
            last_delta,
        } = self.state
        else {
            return DividerDragEffect::Noop {
                reason: DividerDragNoopReason::IdleWithoutActiveDrag,
            };
        };
        let delta = position.delta_from(origin, self.axis);
        if delta == last_delta {
            return DividerDragEffect::Noop {
                reason: DividerDragNoopReason::DeltaUnchanged,
            };
        }
        self.state = DividerDragState::Dragging {
            divider,
            origin,
            last_delta: delta,
        };
        callbacks.on_drag(divider, delta);
        DividerDragEffect::DragUpdated { divider, delta }
    }

    fn last_delta(&self) -> Option<i32> {
        match self.state {
            DividerDragState::Dragging { last_delta, .. } => Some(last_delta),
            DividerDragState::Idle => None,
        }
    }

    fn transition(&mut self, from: DividerDragState, effect: DividerDragEffect) -> DividerDragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DividerDragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        }
    }
}
