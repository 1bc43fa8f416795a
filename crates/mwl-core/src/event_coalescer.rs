#![forbid(unsafe_code)]

//! Coalescing for high-frequency pointer moves.
//!
//! Hosts may deliver pointer moves faster than the display refreshes. A
//! divider drag only needs the latest position once per frame, because each
//! drag update is computed from the press origin rather than accumulated.
//!
//! [`PointerCoalescer`] keeps the most recent move pending and passes every
//! other event through immediately. Before a non-move event is processed the
//! caller must [`flush`](PointerCoalescer::flush) so the final position is
//! delivered first.
//!
//! # Usage
//!
//! ```
//! use mwl_core::event::PointerEvent;
//! use mwl_core::event_coalescer::PointerCoalescer;
//!
//! let mut coalescer = PointerCoalescer::new();
//!
//! assert!(coalescer.push(PointerEvent::moved(10, 10)).is_none());
//! assert!(coalescer.push(PointerEvent::moved(20, 20)).is_none());
//!
//! let pending = coalescer.flush();
//! assert_eq!(pending.map(|e| e.position.x), Some(20));
//! ```

use crate::event::{PointerEvent, PointerEventKind};

/// Coalesces pointer moves: latest position wins.
///
/// Not thread-safe; intended for the single UI event loop.
#[derive(Debug, Clone, Default)]
pub struct PointerCoalescer {
    pending_move: Option<PointerEvent>,
    coalesced: u32,
}

impl PointerCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    ///
    /// Returns `Some(event)` when the event must be processed now, or `None`
    /// when it was absorbed as a pending move.
    pub fn push(&mut self, event: PointerEvent) -> Option<PointerEvent> {
        match event.kind {
            PointerEventKind::Moved => {
                if self.pending_move.replace(event).is_some() {
                    self.coalesced = self.coalesced.saturating_add(1);
                }
                None
            }
            _ => Some(event),
        }
    }

    /// Take the pending move, if any.
    #[must_use]
    pub fn flush(&mut self) -> Option<PointerEvent> {
        let pending = self.pending_move.take();
        if self.coalesced > 0 {
            crate::trace!(
                target: "mwl.pointer",
                dropped = self.coalesced,
                "coalesced pointer moves"
            );
            self.coalesced = 0;
        }
        pending
    }

    /// Whether a move is waiting for the next frame.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_move.is_some()
    }

    /// Drop any pending move without delivering it.
    pub fn clear(&mut self) {
        self.pending_move = None;
        self.coalesced = 0;
    }
}
