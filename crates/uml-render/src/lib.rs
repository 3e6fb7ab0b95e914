//! Geometry shared by every renderer: class box layout, hit testing, and
//! connection routing. Pure functions of the diagram and `CanvasConfig`;
//! nothing here draws.

pub mod hit;
pub mod layout;
pub mod route;

pub use hit::{Hit, classes_in_rect, hit_test};
pub use layout::{ClassLayout, RowKind, RowLayout, layout_class, layout_diagram};
pub use route::{ConnectorPath, arrowhead, handle_anchor, route_all, route_connection};
