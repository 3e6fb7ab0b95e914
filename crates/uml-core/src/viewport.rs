//! Screen ↔ canvas coordinate mapping.
//!
//! Three coordinate spaces are involved:
//!
//! - **client**: raw pointer pixels as reported by the host page,
//! - **screen** (surface-local): client minus the canvas element's top-left,
//! - **canvas**: the pan/zoom independent space class positions live in.
//!
//! `screen = canvas * zoom + pan`, so `canvas = (screen - pan) / zoom`.

use crate::config::CanvasConfig;
use crate::model::Point;
use serde::{Deserialize, Serialize};

/// The on-screen rectangle the canvas element occupies, in client pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A surface with no area cannot map pointers meaningfully.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Client pixels → surface-local screen pixels.
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }

    /// Center of the surface in surface-local pixels.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Pan offset (screen pixels) and zoom scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan: Point,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Point::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Surface-local screen point → canvas point.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        (screen - self.pan) / self.zoom
    }

    /// Canvas point → surface-local screen point.
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        canvas * self.zoom + self.pan
    }

    /// Client point → canvas point through `surface`.
    ///
    /// A degenerate surface maps everything to the canvas origin.
    pub fn client_to_canvas(&self, surface: &Surface, client: Point) -> Point {
        if surface.is_degenerate() {
            log::trace!("degenerate surface {surface:?}, mapping to origin");
            return Point::ZERO;
        }
        self.screen_to_canvas(surface.to_local(client))
    }

    /// Convert a screen-space drag distance into canvas units so that
    /// dragging feels the same at every zoom level.
    pub fn screen_delta_to_canvas(&self, delta: Point) -> Point {
        delta / self.zoom
    }

    /// Translate the view. Unbounded: the canvas is infinite.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan += delta;
    }

    /// Multiply the zoom by `factor` (clamped to the configured bounds),
    /// keeping the canvas point under `anchor` (surface-local) fixed on
    /// screen. Returns `true` if the zoom actually changed.
    pub fn zoom_about(&mut self, anchor: Point, factor: f32, config: &CanvasConfig) -> bool {
        let old_zoom = self.zoom;
        let new_zoom = config.clamp_zoom(old_zoom * factor);
        if new_zoom == old_zoom {
            return false;
        }
        let ratio = new_zoom / old_zoom;
        self.pan = anchor - (anchor - self.pan) * ratio;
        self.zoom = new_zoom;
        true
    }

    /// Wheel zoom: scrolling away (`delta_y > 0`) zooms out, anything else
    /// zooms in.
    pub fn zoom_for_wheel(&mut self, delta_y: f32, anchor: Point, config: &CanvasConfig) -> bool {
        let factor = wheel_factor(delta_y, config);
        self.zoom_about(anchor, factor, config)
    }

    /// Zoom rounded to a whole percentage, for the zoom indicator.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round().max(0.0) as u32
    }

    /// Back to 100% with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Zoom multiplier for one wheel notch.
pub fn wheel_factor(delta_y: f32, config: &CanvasConfig) -> f32 {
    if delta_y > 0.0 {
        config.zoom_out_factor
    } else {
        config.zoom_in_factor
    }
}
