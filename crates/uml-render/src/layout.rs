//! Class box layout.
//!
//! Computes, in canvas space, where each part of a class box goes: the outer
//! frame, the name header, one row per member, and the four connection
//! handles. Both the hit tester and the Canvas2D renderer consume the same
//! `ClassLayout`, so what is clickable is exactly what is drawn.

use kurbo::{Point, Rect, Size};
use uml_core::label::{field_body, method_body};
use uml_core::{CanvasConfig, ClassBox, Diagram, ElementId, HandleSide, Visibility};

/// Which member list a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Field,
    Method,
}

/// One member row inside a class box.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub kind: RowKind,
    pub member: ElementId,
    pub visibility: Visibility,
    /// Row text without the visibility symbol.
    pub text: String,
    pub rect: Rect,
}

/// The resolved geometry of one class box.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassLayout {
    pub id: ElementId,
    pub name: String,
    pub frame: Rect,
    pub header: Rect,
    pub rows: Vec<RowLayout>,
    /// Y of the separator between fields and methods. Empty unless both
    /// sections exist; the line under the header is not recorded here.
    pub section_breaks: Vec<f64>,
}

impl ClassLayout {
    /// Center of a handle, on the midpoint of the matching frame edge.
    pub fn handle_center(&self, side: HandleSide) -> Point {
        let f = self.frame;
        let c = f.center();
        match side {
            HandleSide::Top => Point::new(c.x, f.y0),
            HandleSide::Right => Point::new(f.x1, c.y),
            HandleSide::Bottom => Point::new(c.x, f.y1),
            HandleSide::Left => Point::new(f.x0, c.y),
        }
    }

    pub fn handles(&self) -> impl Iterator<Item = (HandleSide, Point)> + '_ {
        HandleSide::ALL
            .into_iter()
            .map(|side| (side, self.handle_center(side)))
    }
}

/// Lay out every class in paint order.
pub fn layout_diagram(diagram: &Diagram, config: &CanvasConfig) -> Vec<ClassLayout> {
    diagram
        .classes()
        .iter()
        .map(|class| layout_class(class, config))
        .collect()
}

/// Lay out one class box centered on its position.
pub fn layout_class(class: &ClassBox, config: &CanvasConfig) -> ClassLayout {
    let row_h = config.row_height as f64;
    let pad = config.section_padding as f64;
    let header_h = config.header_height as f64;

    let field_texts: Vec<String> = class.fields.iter().map(field_body).collect();
    let method_texts: Vec<String> = class.methods.iter().map(method_body).collect();

    let width = box_width(&class.name, field_texts.iter().chain(&method_texts), config);

    let section_height = |rows: usize| {
        if rows == 0 {
            0.0
        } else {
            rows as f64 * row_h + pad * 2.0
        }
    };
    let content_h = header_h + section_height(field_texts.len()) + section_height(method_texts.len());
    let height = content_h.max(config.box_height as f64);

    let center = Point::new(class.position.x as f64, class.position.y as f64);
    let frame = Rect::from_center_size(center, Size::new(width, height));
    let header = Rect::new(frame.x0, frame.y0, frame.x1, frame.y0 + header_h);

    let mut rows = Vec::with_capacity(field_texts.len() + method_texts.len());
    let mut section_breaks = Vec::new();
    let mut y = header.y1;

    if !field_texts.is_empty() {
        y += pad;
        for (field, text) in class.fields.iter().zip(field_texts) {
            rows.push(RowLayout {
                kind: RowKind::Field,
                member: field.id,
                visibility: field.visibility,
                text,
                rect: Rect::new(frame.x0, y, frame.x1, y + row_h),
            });
            y += row_h;
        }
        y += pad;
    }

    if !method_texts.is_empty() {
        if !class.fields.is_empty() {
            section_breaks.push(y);
        }
        y += pad;
        for (method, text) in class.methods.iter().zip(method_texts) {
            rows.push(RowLayout {
                kind: RowKind::Method,
                member: method.id,
                visibility: method.visibility,
                text,
                rect: Rect::new(frame.x0, y, frame.x1, y + row_h),
            });
            y += row_h;
        }
    }

    ClassLayout {
        id: class.id,
        name: class.name.clone(),
        frame,
        header,
        rows,
        section_breaks,
    }
}

/// Box width: the configured width, widened for long names or rows.
fn box_width<'a>(
    name: &str,
    rows: impl Iterator<Item = &'a String>,
    config: &CanvasConfig,
) -> f64 {
    let glyph = config.glyph_width as f64;
    let text_pad = config.text_padding as f64 * 2.0;
    // +1 glyph for the visibility symbol drawn before each row.
    let widest_row = rows
        .map(|r| (r.chars().count() + 1) as f64 * glyph + text_pad)
        .fold(0.0, f64::max);
    // Header is bold and slightly larger.
    let name_width = name.chars().count() as f64 * glyph * 1.15 + text_pad;
    (config.box_width as f64).max(widest_row).max(name_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uml_core::{Field, Method, Point as CanvasPoint};

    fn class_at(x: f32, y: f32) -> ClassBox {
        ClassBox::new(ElementId::with_prefix("layout"), "Account", CanvasPoint::new(x, y))
    }

    #[test]
    fn empty_class_uses_nominal_size() {
        let config = CanvasConfig::default();
        let layout = layout_class(&class_at(100.0, 100.0), &config);
        assert_eq!(layout.frame.width(), 192.0);
        assert_eq!(layout.frame.height(), 100.0);
        assert_eq!(layout.frame.center(), Point::new(100.0, 100.0));
        assert!(layout.rows.is_empty());
        assert!(layout.section_breaks.is_empty());
    }

    #[test]
    fn rows_follow_member_order() {
        let config = CanvasConfig::default();
        let mut class = class_at(0.0, 0.0);
        class.fields.push(Field::named("id", "u64", Visibility::Private));
        class.fields.push(Field::named("owner", "String", Visibility::Public));
        class.methods.push(Method::named("close", "", "bool", Visibility::Public));

        let layout = layout_class(&class, &config);
        let kinds: Vec<RowKind> = layout.rows.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![RowKind::Field, RowKind::Field, RowKind::Method]);
        assert_eq!(layout.rows[1].text, "owner: String");
        assert_eq!(layout.rows[2].text, "close(): bool");
        assert!(layout.rows[0].rect.y0 >= layout.header.y1);
        assert!(layout.rows[1].rect.y0 > layout.rows[0].rect.y0);
        assert_eq!(layout.section_breaks.len(), 1);
        assert!(layout.rows[2].rect.y1 <= layout.frame.y1 + 1e-9);
    }

    #[test]
    fn long_rows_widen_the_box() {
        let config = CanvasConfig::default();
        let mut class = class_at(0.0, 0.0);
        class.methods.push(Method::named(
            "transferBetweenAccounts",
            "from: AccountId, to: AccountId, amount: Decimal",
            "Result",
            Visibility::Public,
        ));
        let layout = layout_class(&class, &config);
        assert!(layout.frame.width() > 192.0);
        assert_eq!(layout.frame.center().x, 0.0);
        assert!(layout.section_breaks.is_empty(), "methods only: no separator");
    }

    #[test]
    fn handles_sit_on_edge_midpoints() {
        let config = CanvasConfig::default();
        let layout = layout_class(&class_at(0.0, 0.0), &config);
        assert_eq!(layout.handle_center(HandleSide::Top), Point::new(0.0, -50.0));
        assert_eq!(layout.handle_center(HandleSide::Right), Point::new(96.0, 0.0));
        assert_eq!(layout.handle_center(HandleSide::Bottom), Point::new(0.0, 50.0));
        assert_eq!(layout.handle_center(HandleSide::Left), Point::new(-96.0, 0.0));
        assert_eq!(layout.handles().count(), 4);
    }
}
