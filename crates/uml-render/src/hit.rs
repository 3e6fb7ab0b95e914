//! Hit testing: canvas point → what the pointer is over.
//!
//! Walks class layouts back-to-front (last painted = topmost). Within one
//! class, handles win over the header, and the header wins over the body,
//! matching the stacking order the renderer paints in.

use crate::layout::ClassLayout;
use kurbo::{Point, Rect};
use uml_core::{ElementId, HandleSide};

/// The target under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A connection handle.
    Handle { class: ElementId, side: HandleSide },
    /// The name header (drag grip).
    Header(ElementId),
    /// Anywhere else inside the class box.
    Body(ElementId),
    /// Empty canvas.
    Background,
}

impl Hit {
    /// The class this hit belongs to, if any.
    pub fn class(&self) -> Option<ElementId> {
        match *self {
            Hit::Handle { class, .. } => Some(class),
            Hit::Header(id) | Hit::Body(id) => Some(id),
            Hit::Background => None,
        }
    }
}

/// Find the topmost target at canvas position `p`.
pub fn hit_test(layouts: &[ClassLayout], p: Point, handle_radius: f64) -> Hit {
    for layout in layouts.iter().rev() {
        if let Some(side) = hit_handle(layout, p, handle_radius) {
            return Hit::Handle {
                class: layout.id,
                side,
            };
        }
        if layout.header.contains(p) {
            return Hit::Header(layout.id);
        }
        if layout.frame.contains(p) {
            return Hit::Body(layout.id);
        }
    }
    Hit::Background
}

/// Which handle of `layout` (if any) is within `radius` of `p`.
pub fn hit_handle(layout: &ClassLayout, p: Point, radius: f64) -> Option<HandleSide> {
    // Cheap reject: handles never reach further than `radius` past the frame.
    if !layout.frame.inflate(radius, radius).contains(p) {
        return None;
    }
    layout
        .handles()
        .find(|(_, center)| center.distance(p) <= radius)
        .map(|(side, _)| side)
}

/// Classes whose frame intersects `rect` (canvas space), in paint order.
/// Used by renderers to skip boxes outside the visible area.
pub fn classes_in_rect(
    layouts: &[ClassLayout],
    rect: Rect,
) -> impl Iterator<Item = &ClassLayout> + '_ {
    layouts.iter().filter(move |l| l.frame.overlaps(rect))
}
