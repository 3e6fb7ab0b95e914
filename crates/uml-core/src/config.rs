//! Canvas configuration.
//!
//! Every knob has a default matching the stock editor, so hosts only need
//! to pass the values they want to change (`#[serde(default)]`).

use serde::{Deserialize, Serialize};

/// Tunable dimensions and limits for the class canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Nominal class box width. Connection endpoints always use this value,
    /// and rendered boxes are never narrower. Default: **192**.
    pub box_width: f32,

    /// Nominal class box height used for connection endpoints and as the
    /// minimum rendered height. Default: **100**.
    pub box_height: f32,

    /// Lower zoom bound. Default: **0.1**.
    pub min_zoom: f32,

    /// Upper zoom bound. Default: **3.0**.
    pub max_zoom: f32,

    /// Multiplier applied when zooming in (wheel toward the user). Default: **1.1**.
    pub zoom_in_factor: f32,

    /// Multiplier applied when zooming out (wheel away). Default: **0.9**.
    pub zoom_out_factor: f32,

    /// Hit radius of a connection handle, canvas units. Default: **8**.
    pub handle_radius: f32,

    /// Height of the class name header. Default: **44**.
    pub header_height: f32,

    /// Height of one member row. Default: **24**.
    pub row_height: f32,

    /// Vertical padding above and below each member section. Default: **8**.
    pub section_padding: f32,

    /// Horizontal text padding inside the box. Default: **16**.
    pub text_padding: f32,

    /// Approximate advance of one monospace glyph at the member font size,
    /// used to widen boxes with long rows. Default: **7.8**.
    pub glyph_width: f32,

    /// Background dot grid spacing, canvas units. Default: **20**.
    pub grid_spacing: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            box_width: 192.0,
            box_height: 100.0,
            min_zoom: 0.1,
            max_zoom: 3.0,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
            handle_radius: 8.0,
            header_height: 44.0,
            row_height: 24.0,
            section_padding: 8.0,
            text_padding: 16.0,
            glyph_width: 7.8,
            grid_spacing: 20.0,
        }
    }
}

impl CanvasConfig {
    /// Clamp a zoom value into `[min_zoom, max_zoom]`.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Repair inconsistent values coming from a host override. Non-positive
    /// or NaN values fall back to the defaults, then swapped zoom bounds are
    /// put back in order, so `min_zoom <= max_zoom` always holds afterwards.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (value, fallback) in [
            (&mut self.min_zoom, defaults.min_zoom),
            (&mut self.max_zoom, defaults.max_zoom),
            (&mut self.box_width, defaults.box_width),
            (&mut self.box_height, defaults.box_height),
            (&mut self.zoom_in_factor, defaults.zoom_in_factor),
            (&mut self.zoom_out_factor, defaults.zoom_out_factor),
            (&mut self.handle_radius, defaults.handle_radius),
            (&mut self.header_height, defaults.header_height),
            (&mut self.row_height, defaults.row_height),
            (&mut self.glyph_width, defaults.glyph_width),
            (&mut self.grid_spacing, defaults.grid_spacing),
        ] {
            if !(*value > 0.0) {
                *value = fallback;
            }
        }
        if self.min_zoom > self.max_zoom {
            std::mem::swap(&mut self.min_zoom, &mut self.max_zoom);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_override_keeps_defaults() {
        let config: CanvasConfig =
            serde_json::from_str(r#"{"boxWidth": 240, "maxZoom": 4}"#).unwrap();
        assert_eq!(config.box_width, 240.0);
        assert_eq!(config.max_zoom, 4.0);
        assert_eq!(config.box_height, 100.0);
        assert_eq!(config.min_zoom, 0.1);
    }

    #[test]
    fn sanitized_repairs_bad_values() {
        let config = CanvasConfig {
            min_zoom: 5.0,
            max_zoom: 0.5,
            box_width: -1.0,
            ..CanvasConfig::default()
        }
        .sanitized();
        assert_eq!(config.min_zoom, 0.5);
        assert_eq!(config.max_zoom, 5.0);
        assert_eq!(config.box_width, 192.0);
    }

    #[test]
    fn sanitized_zoom_bounds_never_cross() {
        for json in [
            r#"{"minZoom": 0, "maxZoom": 0}"#,
            r#"{"minZoom": -1, "maxZoom": -0.5}"#,
        ] {
            let config = serde_json::from_str::<CanvasConfig>(json)
                .unwrap()
                .sanitized();
            assert_eq!((config.min_zoom, config.max_zoom), (0.1, 3.0), "{json}");
            assert_eq!(config.clamp_zoom(10.0), 3.0);
        }

        // Only the bad bound is replaced; the good one survives.
        let config = CanvasConfig {
            min_zoom: 0.5,
            max_zoom: 0.0,
            ..CanvasConfig::default()
        }
        .sanitized();
        assert_eq!((config.min_zoom, config.max_zoom), (0.5, 3.0));

        let config = CanvasConfig {
            min_zoom: 0.0,
            max_zoom: 0.05,
            ..CanvasConfig::default()
        }
        .sanitized();
        assert_eq!((config.min_zoom, config.max_zoom), (0.05, 0.1));
    }

    #[test]
    fn clamp_zoom_uses_bounds() {
        let config = CanvasConfig::default();
        assert_eq!(config.clamp_zoom(0.01), 0.1);
        assert_eq!(config.clamp_zoom(10.0), 3.0);
        assert_eq!(config.clamp_zoom(1.5), 1.5);
    }
}
