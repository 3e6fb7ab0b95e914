//! Canvas2D software renderer.
//!
//! Draws the class diagram to an HTML `<canvas>` via
//! `CanvasRenderingContext2d`. Everything except the zoom indicator is
//! painted under the pan/zoom transform, in canvas units.

use kurbo::{Point, Rect};
use uml_core::{CanvasConfig, HandleSide, Viewport, Visibility};
use uml_editor::CanvasController;
use uml_render::{ClassLayout, Hit, classes_in_rect, route_all};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

const CONNECTOR_WIDTH: f64 = 2.0;
const HANDLE_DRAW_RADIUS: f64 = 5.0;
const BOX_RADIUS: f64 = 8.0;
/// Below this on-screen spacing the dot grid is skipped.
const MIN_GRID_PITCH: f64 = 8.0;

/// Theme-dependent colors for the canvas renderer.
pub struct CanvasTheme {
    pub bg: &'static str,
    pub grid: &'static str,
    pub box_fill: &'static str,
    pub box_border: &'static str,
    pub header_fill: &'static str,
    pub header_text: &'static str,
    pub text: &'static str,
    pub separator: &'static str,
    pub connector: &'static str,
    pub handle_fill: &'static str,
    pub handle_border: &'static str,
    pub accent: &'static str,
    pub public: &'static str,
    pub private: &'static str,
    pub protected: &'static str,
    pub indicator_bg: &'static str,
    pub indicator_text: &'static str,
}

impl CanvasTheme {
    /// Light theme: warm white canvas.
    pub fn light() -> Self {
        Self {
            bg: "#F5F5F7",
            grid: "rgba(0, 0, 0, 0.12)",
            box_fill: "#FFFFFF",
            box_border: "#D2D2D7",
            header_fill: "#EEF2FF",
            header_text: "#1D1D1F",
            text: "#3A3A3C",
            separator: "#E5E5EA",
            connector: "#6B7080",
            handle_fill: "#FFFFFF",
            handle_border: "#86868B",
            accent: "#0A84FF",
            public: "#34C759",
            private: "#FF3B30",
            protected: "#FF9500",
            indicator_bg: "rgba(255, 255, 255, 0.9)",
            indicator_text: "#3A3A3C",
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            bg: "#1C1C1E",
            grid: "rgba(255, 255, 255, 0.10)",
            box_fill: "#2C2C2E",
            box_border: "#48484A",
            header_fill: "#2F3350",
            header_text: "#F2F2F7",
            text: "#D1D1D6",
            separator: "#3A3A3C",
            connector: "#98989D",
            handle_fill: "#2C2C2E",
            handle_border: "#8E8E93",
            accent: "#0A84FF",
            public: "#30D158",
            private: "#FF453A",
            protected: "#FF9F0A",
            indicator_bg: "rgba(44, 44, 46, 0.9)",
            indicator_text: "#D1D1D6",
        }
    }

    fn visibility_color(&self, visibility: Visibility) -> &'static str {
        match visibility {
            Visibility::Public => self.public,
            Visibility::Private => self.private,
            Visibility::Protected => self.protected,
        }
    }
}

/// Render the whole canvas.
pub fn render_canvas(
    ctx: &CanvasRenderingContext2d,
    controller: &CanvasController,
    canvas_width: f64,
    canvas_height: f64,
    theme: &CanvasTheme,
    hovered: Hit,
) {
    let viewport = controller.viewport();
    let config = controller.config();

    // Clear canvas
    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, canvas_width, canvas_height);

    ctx.save();
    let _ = ctx.translate(viewport.pan.x as f64, viewport.pan.y as f64);
    let _ = ctx.scale(viewport.zoom as f64, viewport.zoom as f64);

    draw_grid(ctx, viewport, config, canvas_width, canvas_height, theme);

    // Connections go under the boxes so arrowheads meet the box edge.
    for path in route_all(controller.diagram(), config, CONNECTOR_WIDTH) {
        draw_connector(ctx, path.start, path.end, &path.arrow, theme);
    }

    let pending = controller.pending_connection();
    let view = visible_canvas_rect(viewport, canvas_width, canvas_height);
    for layout in classes_in_rect(controller.layouts(), view) {
        let source = pending
            .filter(|p| p.from == layout.id)
            .map(|p| p.from_handle);
        draw_class(ctx, layout, theme, source, hovered);
    }

    if let Some((start, end)) = controller.pending_preview() {
        draw_preview_line(ctx, start, end, theme);
    }

    ctx.restore();

    draw_zoom_indicator(ctx, controller.zoom_percent(), canvas_width, canvas_height, theme);

    log::trace!(
        "painted {} classes, {} connections",
        controller.layouts().len(),
        controller.diagram().connections.len()
    );
}

/// The canvas-space rectangle currently on screen.
fn visible_canvas_rect(viewport: &Viewport, width: f64, height: f64) -> Rect {
    let zoom = viewport.zoom as f64;
    let x0 = -(viewport.pan.x as f64) / zoom;
    let y0 = -(viewport.pan.y as f64) / zoom;
    Rect::new(x0, y0, x0 + width / zoom, y0 + height / zoom)
}

// ─── Drawing primitives ─────────────────────────────────────────────────

/// Dot grid over the visible canvas area, aligned to canvas multiples of
/// the grid spacing so it moves with pan and zoom.
fn draw_grid(
    ctx: &CanvasRenderingContext2d,
    viewport: &Viewport,
    config: &CanvasConfig,
    width: f64,
    height: f64,
    theme: &CanvasTheme,
) {
    let spacing = config.grid_spacing as f64;
    let zoom = viewport.zoom as f64;
    if spacing * zoom < MIN_GRID_PITCH {
        return;
    }
    let view = visible_canvas_rect(viewport, width, height);
    let dot = 1.0 / zoom;

    ctx.set_fill_style_str(theme.grid);
    let mut x = (view.x0 / spacing).floor() * spacing;
    while x < view.x1 {
        let mut y = (view.y0 / spacing).floor() * spacing;
        while y < view.y1 {
            ctx.fill_rect(x, y, dot, dot);
            y += spacing;
        }
        x += spacing;
    }
}

fn draw_connector(
    ctx: &CanvasRenderingContext2d,
    start: Point,
    end: Point,
    arrow: &[Point; 3],
    theme: &CanvasTheme,
) {
    ctx.save();
    ctx.set_stroke_style_str(theme.connector);
    ctx.set_line_width(CONNECTOR_WIDTH);
    ctx.begin_path();
    ctx.move_to(start.x, start.y);
    ctx.line_to(end.x, end.y);
    ctx.stroke();

    ctx.set_fill_style_str(theme.connector);
    ctx.begin_path();
    ctx.move_to(arrow[0].x, arrow[0].y);
    ctx.line_to(arrow[1].x, arrow[1].y);
    ctx.line_to(arrow[2].x, arrow[2].y);
    ctx.close_path();
    ctx.fill();
    ctx.restore();
}

fn draw_class(
    ctx: &CanvasRenderingContext2d,
    layout: &ClassLayout,
    theme: &CanvasTheme,
    pending_side: Option<HandleSide>,
    hovered: Hit,
) {
    let f = layout.frame;

    ctx.save();
    ctx.set_shadow_color("rgba(0, 0, 0, 0.10)");
    ctx.set_shadow_blur(8.0);
    ctx.set_shadow_offset_y(2.0);
    rounded_rect_path(ctx, f, BOX_RADIUS);
    ctx.set_fill_style_str(theme.box_fill);
    ctx.fill();
    ctx.set_shadow_color("transparent");

    // Header: clip to the box so its top corners stay rounded.
    ctx.save();
    rounded_rect_path(ctx, f, BOX_RADIUS);
    ctx.clip();
    ctx.set_fill_style_str(theme.header_fill);
    let h = layout.header;
    ctx.fill_rect(h.x0, h.y0, h.width(), h.height());
    ctx.restore();

    ctx.set_font("600 14px Inter, system-ui, sans-serif");
    ctx.set_fill_style_str(theme.header_text);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let name = h.center();
    let _ = ctx.fill_text(&layout.name, name.x, name.y);

    // Separators: under the header, then between sections.
    ctx.set_stroke_style_str(theme.separator);
    ctx.set_line_width(1.0);
    let mut breaks = layout.section_breaks.clone();
    if !layout.rows.is_empty() {
        breaks.push(h.y1);
    }
    for y in breaks {
        ctx.begin_path();
        ctx.move_to(f.x0, y);
        ctx.line_to(f.x1, y);
        ctx.stroke();
    }

    ctx.set_font("12px ui-monospace, SFMono-Regular, Menlo, monospace");
    ctx.set_text_align("left");
    for row in &layout.rows {
        let x = row.rect.x0 + 12.0;
        let y = row.rect.center().y;
        ctx.set_fill_style_str(theme.visibility_color(row.visibility));
        let symbol = row.visibility.symbol().to_string();
        let _ = ctx.fill_text(&symbol, x, y);
        ctx.set_fill_style_str(theme.text);
        let _ = ctx.fill_text(&row.text, x + 10.0, y);
    }

    // Border on top of the header fill.
    let hovered_here = hovered.class() == Some(layout.id);
    let border = if pending_side.is_some() || hovered_here {
        theme.accent
    } else {
        theme.box_border
    };
    ctx.set_stroke_style_str(border);
    ctx.set_line_width(1.0);
    rounded_rect_path(ctx, f, BOX_RADIUS);
    ctx.stroke();

    for (side, center) in layout.handles() {
        let active = pending_side == Some(side)
            || hovered
                == Hit::Handle {
                    class: layout.id,
                    side,
                };
        draw_handle(ctx, center, active, theme);
    }

    ctx.restore();
}

fn draw_handle(ctx: &CanvasRenderingContext2d, center: Point, active: bool, theme: &CanvasTheme) {
    ctx.begin_path();
    let _ = ctx.arc(
        center.x,
        center.y,
        HANDLE_DRAW_RADIUS,
        0.0,
        std::f64::consts::TAU,
    );
    ctx.set_fill_style_str(if active { theme.accent } else { theme.handle_fill });
    ctx.fill();
    ctx.set_stroke_style_str(if active { theme.accent } else { theme.handle_border });
    ctx.set_line_width(1.5);
    ctx.stroke();
}

/// Dashed line from the pending source handle to the pointer.
fn draw_preview_line(ctx: &CanvasRenderingContext2d, start: Point, end: Point, theme: &CanvasTheme) {
    ctx.save();
    ctx.set_stroke_style_str(theme.accent);
    ctx.set_line_width(1.5);
    let dash = js_sys::Array::of2(&JsValue::from_f64(6.0), &JsValue::from_f64(4.0));
    let _ = ctx.set_line_dash(&dash);
    ctx.begin_path();
    ctx.move_to(start.x, start.y);
    ctx.line_to(end.x, end.y);
    ctx.stroke();
    ctx.restore();
}

/// Bottom-right "100%" pill, in screen space.
fn draw_zoom_indicator(
    ctx: &CanvasRenderingContext2d,
    percent: u32,
    width: f64,
    height: f64,
    theme: &CanvasTheme,
) {
    let (w, h, margin) = (56.0, 24.0, 12.0);
    let pill = Rect::new(width - w - margin, height - h - margin, width - margin, height - margin);
    ctx.save();
    rounded_rect_path(ctx, pill, h / 2.0);
    ctx.set_fill_style_str(theme.indicator_bg);
    ctx.fill();
    ctx.set_font("12px Inter, system-ui, sans-serif");
    ctx.set_fill_style_str(theme.indicator_text);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let c = pill.center();
    let _ = ctx.fill_text(&format!("{percent}%"), c.x, c.y);
    ctx.restore();
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, rect: Rect, r: f64) {
    let (x, y, w, h) = (rect.x0, rect.y0, rect.width(), rect.height());
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}
