#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! Hosts translate their native mouse/pointer callbacks into these values
//! before handing them to divider widgets. Only the information the layout
//! engine consumes is modeled: button transitions, moves, and the pointer
//! leaving the window.
//!
//! # Design Notes
//!
//! - Positions are viewport pixels, origin at top-left.
//! - Events are delivered document-wide: a release anywhere must reach the
//!   active divider, not only releases over the divider itself.

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// Pointer position in viewport pixels.
    pub position: Point,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: u32, y: u32) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Primary-button press at `(x, y)`.
    #[must_use]
    pub const fn down(x: u32, y: u32) -> Self {
        Self::new(PointerEventKind::Down(PointerButton::Primary), x, y)
    }

    /// Pointer move to `(x, y)`.
    #[must_use]
    pub const fn moved(x: u32, y: u32) -> Self {
        Self::new(PointerEventKind::Moved, x, y)
    }

    /// Primary-button release at `(x, y)`.
    #[must_use]
    pub const fn up(x: u32, y: u32) -> Self {
        Self::new(PointerEventKind::Up(PointerButton::Primary), x, y)
    }

    /// Create a pointer event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),

    /// Button released.
    Up(PointerButton),

    /// Pointer moved, with or without a button held.
    Moved,

    /// Pointer left the window. `position` is the last known position.
    LeftWindow,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Main button (left mouse button, pen tip, touch contact).
    Primary,

    /// Secondary button (right mouse button).
    Secondary,

    /// Middle button (scroll wheel click).
    Middle,
}
