//! Gesture state for canvas interactions.
//!
//! Exactly one gesture is active at a time. Press/move/release events
//! advance it, and moves translate into `CanvasMutation`s that the
//! controller applies.

use crate::controller::CanvasMutation;
use smallvec::SmallVec;
use uml_core::{ElementId, HandleSide, Point, Viewport};

/// The first half of a two-click connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingConnection {
    pub from: ElementId,
    pub from_handle: HandleSide,
}

/// The controller's gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Background drag. Positions are client pixels.
    Panning { start: Point, initial_pan: Point },
    /// Header drag. `start` is in client pixels, `initial_position` in
    /// canvas units.
    DraggingClass {
        id: ElementId,
        start: Point,
        initial_position: Point,
    },
    /// A handle was clicked; waiting for the second one.
    Connecting(PendingConnection),
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn pending(&self) -> Option<PendingConnection> {
        match *self {
            Interaction::Connecting(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn dragged_class(&self) -> Option<ElementId> {
        match *self {
            Interaction::DraggingClass { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Class drags keep following the pointer outside the canvas, so the
    /// host must forward document-level moves and releases.
    pub fn captures_pointer(&self) -> bool {
        matches!(self, Interaction::DraggingClass { .. })
    }

    /// CSS cursor for the canvas element.
    pub fn cursor(&self) -> &'static str {
        match self {
            Interaction::Idle => "default",
            Interaction::Panning { .. } | Interaction::DraggingClass { .. } => "grabbing",
            Interaction::Connecting(_) => "crosshair",
        }
    }

    /// Pointer moved to `client`. Returns the mutations the active drag
    /// implies; empty when no drag is active.
    pub fn track(&self, client: Point, viewport: &Viewport) -> SmallVec<[CanvasMutation; 2]> {
        let mut mutations = SmallVec::new();
        match *self {
            Interaction::Panning { start, initial_pan } => {
                mutations.push(CanvasMutation::SetPan {
                    pan: initial_pan + (client - start),
                });
            }
            Interaction::DraggingClass {
                id,
                start,
                initial_position,
            } => {
                let delta = viewport.screen_delta_to_canvas(client - start);
                mutations.push(CanvasMutation::MoveClass {
                    id,
                    position: initial_position + delta,
                });
            }
            Interaction::Idle | Interaction::Connecting(_) => {}
        }
        mutations
    }

    /// Pointer released: drags end, a pending connection survives.
    pub fn release(&mut self) -> bool {
        match self {
            Interaction::Panning { .. } | Interaction::DraggingClass { .. } => {
                *self = Interaction::Idle;
                true
            }
            Interaction::Idle | Interaction::Connecting(_) => false,
        }
    }

    /// Pointer left the canvas: only a pan ends. A class drag is tracked
    /// on the whole document.
    pub fn leave(&mut self) -> bool {
        if matches!(self, Interaction::Panning { .. }) {
            *self = Interaction::Idle;
            true
        } else {
            false
        }
    }
}
