//! Input abstraction layer.
//!
//! Normalizes the host's mouse, wheel, and keyboard events into a single
//! `InputEvent` enum consumed by the canvas controller. Coordinates are
//! client pixels; the controller maps them through the surface and viewport.

use uml_core::Point;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Held modifier that turns the wheel into zoom. Trackpad pinch arrives
    /// as Ctrl+wheel in browsers; Cmd is accepted for macOS mice.
    pub fn zoom_held(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Platform command key (Ctrl elsewhere, Cmd on macOS).
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Which mouse button an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Button pressed over the canvas.
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },

    /// Pointer moved. While a class drag is active the host forwards moves
    /// from the whole document, not just the canvas.
    PointerMove { x: f32, y: f32, modifiers: Modifiers },

    /// Button released.
    PointerUp { x: f32, y: f32, modifiers: Modifiers },

    /// Pointer left the canvas element.
    PointerLeave,

    /// A completed click (press and release on the same target).
    Click {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },

    /// Context menu request (right click / long press).
    ContextMenu { x: f32, y: f32 },

    /// Wheel or trackpad scroll.
    Wheel {
        x: f32,
        y: f32,
        delta_y: f32,
        modifiers: Modifiers,
    },

    /// Key press. `key` is the DOM `KeyboardEvent.key` value.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn click(x: f32, y: f32) -> Self {
        Self::Click {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    /// Extract the client position if this is a positioned event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Click { x, y, .. }
            | Self::ContextMenu { x, y }
            | Self::Wheel { x, y, .. } => Some(Point::new(*x, *y)),
            Self::PointerLeave | Self::Key { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_buttons() {
        assert_eq!(PointerButton::from_dom(0), PointerButton::Primary);
        assert_eq!(PointerButton::from_dom(2), PointerButton::Secondary);
        assert_eq!(PointerButton::from_dom(4), PointerButton::Other(4));
    }

    #[test]
    fn positions() {
        assert_eq!(
            InputEvent::click(3.0, 4.0).position(),
            Some(Point::new(3.0, 4.0))
        );
        assert_eq!(InputEvent::PointerLeave.position(), None);
    }

    #[test]
    fn zoom_modifier() {
        assert!(Modifiers::CTRL.zoom_held());
        assert!(!Modifiers::NONE.zoom_held());
        let shift = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert!(!shift.zoom_held());
    }
}
