//! Class diagram data model.
//!
//! A diagram is a flat list of class boxes plus a flat list of directed
//! connections. Connections hold plain `ElementId`s for their endpoints and
//! are resolved with a lookup-or-skip step whenever they are drawn or hit
//! tested, so a connection whose class is missing simply disappears.
//!
//! Class positions are the *center* of the box, in canvas space.

use crate::id::ElementId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

// ─── Geometry ────────────────────────────────────────────────────────────

/// A 2D point or offset. Used for both screen and canvas coordinates; the
/// `Viewport` is what converts between the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length when the point is used as an offset.
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(self, other: Point, eps: f32) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Point {
    type Output = Point;
    fn div(self, rhs: f32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

// ─── Visibility ──────────────────────────────────────────────────────────

/// UML member visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [
        Visibility::Public,
        Visibility::Private,
        Visibility::Protected,
    ];

    /// UML prefix symbol: `+`, `-`, `#`.
    pub const fn symbol(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Private => '-',
            Visibility::Protected => '#',
        }
    }

    /// Inverse of [`Visibility::symbol`].
    pub const fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Visibility::Public),
            '-' => Some(Visibility::Private),
            '#' => Some(Visibility::Protected),
            _ => None,
        }
    }

    /// Next value in the toggle order public → private → protected → public.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Visibility::Public => Visibility::Private,
            Visibility::Private => Visibility::Protected,
            Visibility::Protected => Visibility::Public,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Protected => "protected",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == name)
    }
}

// ─── Handles ─────────────────────────────────────────────────────────────

/// One of the four connection handles on a class box edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleSide {
    pub const ALL: [HandleSide; 4] = [
        HandleSide::Top,
        HandleSide::Right,
        HandleSide::Bottom,
        HandleSide::Left,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            HandleSide::Top => "top",
            HandleSide::Right => "right",
            HandleSide::Bottom => "bottom",
            HandleSide::Left => "left",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

// ─── Members ─────────────────────────────────────────────────────────────

/// A class attribute row: `+name: type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: ElementId,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub visibility: Visibility,
}

impl Field {
    /// A blank public field of type `string`, as added by the creation form.
    pub fn new() -> Self {
        Self {
            id: ElementId::with_prefix("field"),
            name: String::new(),
            ty: "string".to_string(),
            visibility: Visibility::Public,
        }
    }

    pub fn named(name: &str, ty: &str, visibility: Visibility) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            visibility,
            ..Self::new()
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

/// A class operation row: `+name(parameters): return_type`.
///
/// `parameters` is free text and is not parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub id: ElementId,
    pub name: String,
    pub return_type: String,
    pub parameters: String,
    pub visibility: Visibility,
}

impl Method {
    /// A blank public method returning `void`, as added by the creation form.
    pub fn new() -> Self {
        Self {
            id: ElementId::with_prefix("method"),
            name: String::new(),
            return_type: "void".to_string(),
            parameters: String::new(),
            visibility: Visibility::Public,
        }
    }

    pub fn named(name: &str, parameters: &str, return_type: &str, visibility: Visibility) -> Self {
        Self {
            name: name.to_string(),
            parameters: parameters.to_string(),
            return_type: return_type.to_string(),
            visibility,
            ..Self::new()
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::new()
    }
}

pub type Fields = SmallVec<[Field; 4]>;
pub type Methods = SmallVec<[Method; 4]>;

// ─── Class box ───────────────────────────────────────────────────────────

/// A class box on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBox {
    pub id: ElementId,
    pub name: String,
    /// Center of the box in canvas space.
    pub position: Point,
    pub fields: Fields,
    pub methods: Methods,
}

impl ClassBox {
    pub fn new(id: ElementId, name: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            fields: SmallVec::new(),
            methods: SmallVec::new(),
        }
    }
}

// ─── Connection ──────────────────────────────────────────────────────────

/// A directed connection between two class handles.
///
/// `from`/`to` are weak references: nothing keeps the classes alive and
/// nothing checks that they exist at insertion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ElementId,
    pub from: ElementId,
    pub to: ElementId,
    pub from_handle: HandleSide,
    pub to_handle: HandleSide,
}

// ─── Diagram ─────────────────────────────────────────────────────────────

/// The whole diagram: classes in paint order (last = topmost) and
/// connections in creation order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagram {
    classes: Vec<ClassBox>,
    pub connections: Vec<Connection>,

    /// Index from ElementId → position in `classes`.
    #[serde(skip)]
    id_index: HashMap<ElementId, usize>,
}

impl Diagram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a class. Returns its paint index.
    pub fn add_class(&mut self, class: ClassBox) -> usize {
        let idx = self.classes.len();
        log::debug!(
            "add class {} {:?} at ({}, {})",
            class.id,
            class.name,
            class.position.x,
            class.position.y
        );
        self.id_index.insert(class.id, idx);
        self.classes.push(class);
        idx
    }

    /// Append a connection. Endpoints are not validated.
    pub fn add_connection(&mut self, connection: Connection) {
        log::debug!(
            "add connection {} {}:{} -> {}:{}",
            connection.id,
            connection.from,
            connection.from_handle.as_str(),
            connection.to,
            connection.to_handle.as_str()
        );
        self.connections.push(connection);
    }

    /// Classes in paint order. Only `add_class` appends, which keeps the
    /// id index in step.
    pub fn classes(&self) -> &[ClassBox] {
        &self.classes
    }

    pub fn get_by_id(&self, id: ElementId) -> Option<&ClassBox> {
        self.id_index.get(&id).map(|&idx| &self.classes[idx])
    }

    pub fn get_by_id_mut(&mut self, id: ElementId) -> Option<&mut ClassBox> {
        self.id_index.get(&id).map(|&idx| &mut self.classes[idx])
    }

    /// Resolve both endpoints of a connection, or `None` if either class
    /// is missing.
    pub fn endpoints(&self, connection: &Connection) -> Option<(&ClassBox, &ClassBox)> {
        let from = self.get_by_id(connection.from)?;
        let to = self.get_by_id(connection.to)?;
        Some((from, to))
    }

    /// Connections attached to `id` on either end.
    pub fn connections_of(&self, id: ElementId) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(move |c| c.from == id || c.to == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn visibility_cycles_back_after_three_steps() {
        for v in Visibility::ALL {
            assert_eq!(v.cycle().cycle().cycle(), v);
        }
        assert_eq!(Visibility::Public.cycle(), Visibility::Private);
        assert_eq!(Visibility::Private.cycle(), Visibility::Protected);
        assert_eq!(Visibility::Protected.cycle(), Visibility::Public);
    }

    #[test]
    fn visibility_symbol_mapping_is_total_both_ways() {
        for v in Visibility::ALL {
            assert_eq!(Visibility::from_symbol(v.symbol()), Some(v));
            assert_eq!(Visibility::from_name(v.as_str()), Some(v));
        }
        assert_eq!(Visibility::from_symbol('~'), None);
    }

    #[test]
    fn handle_names() {
        for side in HandleSide::ALL {
            assert_eq!(HandleSide::from_name(side.as_str()), Some(side));
        }
        assert_eq!(HandleSide::from_name("center"), None);
    }

    #[test]
    fn new_members_have_form_defaults() {
        let f = Field::new();
        assert_eq!(f.name, "");
        assert_eq!(f.ty, "string");
        assert_eq!(f.visibility, Visibility::Public);

        let m = Method::new();
        assert_eq!(m.return_type, "void");
        assert_eq!(m.parameters, "");
        assert_ne!(f.id, m.id);
    }

    #[test]
    fn endpoints_skip_missing_classes() {
        let mut diagram = Diagram::new();
        let a = ElementId::intern("model_a");
        diagram.add_class(ClassBox::new(a, "A", Point::new(0.0, 0.0)));

        let dangling = Connection {
            id: ElementId::intern("model_conn"),
            from: a,
            to: ElementId::intern("model_missing"),
            from_handle: HandleSide::Right,
            to_handle: HandleSide::Left,
        };
        diagram.add_connection(dangling.clone());

        assert!(diagram.endpoints(&dangling).is_none());
        assert_eq!(diagram.connections_of(a).count(), 1);
    }

    #[test]
    fn id_index_tracks_paint_order() {
        let mut diagram = Diagram::new();
        let a = ElementId::intern("index_a");
        let b = ElementId::intern("index_b");
        assert_eq!(diagram.add_class(ClassBox::new(a, "A", Point::ZERO)), 0);
        assert_eq!(diagram.add_class(ClassBox::new(b, "B", Point::new(300.0, 0.0))), 1);

        if let Some(class) = diagram.get_by_id_mut(b) {
            class.name = "Renamed".into();
        }
        let names: Vec<&str> = diagram.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Renamed"]);
        assert_eq!(diagram.get_by_id(a).map(|c| c.name.as_str()), Some("A"));
        assert!(diagram.get_by_id(ElementId::intern("index_missing")).is_none());
    }

    #[test]
    fn class_serializes_members_in_order() {
        let mut class = ClassBox::new(ElementId::intern("ser_user"), "User", Point::ZERO);
        class.fields.push(Field::named("id", "u64", Visibility::Private));
        class.fields.push(Field::named("email", "String", Visibility::Public));
        let json = serde_json::to_value(&class).unwrap();
        let names: Vec<&str> = json["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["id", "email"]);
        assert_eq!(json["fields"][0]["type"], "u64");
        assert_eq!(json["fields"][0]["visibility"], "private");
    }
}
