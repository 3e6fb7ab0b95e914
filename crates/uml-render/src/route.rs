//! Connection routing: class positions + handle sides → line segments.
//!
//! Endpoints are computed from the *nominal* box size in `CanvasConfig`,
//! not from the laid-out frame, so a connection's geometry depends only on
//! the two class positions and the two handle sides.

use kurbo::{Point, Vec2};
use uml_core::{CanvasConfig, ClassBox, Connection, Diagram, ElementId, HandleSide};

/// Angle between the shaft and each arrowhead barb, radians.
const BARB_ANGLE: f64 = 0.4;

/// A routed connection ready to be stroked.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    pub id: ElementId,
    pub start: Point,
    pub end: Point,
    /// Arrowhead triangle: tip (== `end`) followed by the two barb points.
    pub arrow: [Point; 3],
}

/// Offset of a handle from the class center, using the nominal box size.
pub fn handle_offset(side: HandleSide, config: &CanvasConfig) -> Vec2 {
    let hw = config.box_width as f64 / 2.0;
    let hh = config.box_height as f64 / 2.0;
    match side {
        HandleSide::Top => Vec2::new(0.0, -hh),
        HandleSide::Right => Vec2::new(hw, 0.0),
        HandleSide::Bottom => Vec2::new(0.0, hh),
        HandleSide::Left => Vec2::new(-hw, 0.0),
    }
}

/// Canvas-space anchor point of `side` on `class`.
pub fn handle_anchor(class: &ClassBox, side: HandleSide, config: &CanvasConfig) -> Point {
    let center = Point::new(class.position.x as f64, class.position.y as f64);
    center + handle_offset(side, config)
}

/// Route one connection. Returns `None` when either endpoint class is
/// missing from the diagram.
pub fn route_connection(
    diagram: &Diagram,
    connection: &Connection,
    config: &CanvasConfig,
    stroke_width: f64,
) -> Option<ConnectorPath> {
    let Some((from, to)) = diagram.endpoints(connection) else {
        log::trace!("skip dangling connection {}", connection.id);
        return None;
    };
    let start = handle_anchor(from, connection.from_handle, config);
    let end = handle_anchor(to, connection.to_handle, config);
    Some(ConnectorPath {
        id: connection.id,
        start,
        end,
        arrow: arrowhead(start, end, stroke_width),
    })
}

/// Route every connection that can be resolved, in creation order.
pub fn route_all(diagram: &Diagram, config: &CanvasConfig, stroke_width: f64) -> Vec<ConnectorPath> {
    diagram
        .connections
        .iter()
        .filter_map(|c| route_connection(diagram, c, config, stroke_width))
        .collect()
}

/// Arrowhead triangle at `end`, pointing away from `start`.
///
/// A zero-length segment points right.
pub fn arrowhead(start: Point, end: Point, stroke_width: f64) -> [Point; 3] {
    let dir: Vec2 = end - start;
    let angle = if dir.hypot2() > 0.0 { dir.atan2() } else { 0.0 };
    let size = 8.0 + stroke_width * 1.5;
    let barb = |a: f64| end - Vec2::from_angle(a) * size;
    [end, barb(angle - BARB_ANGLE), barb(angle + BARB_ANGLE)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use uml_core::Point as CanvasPoint;

    fn diagram_with(a: (f32, f32), b: (f32, f32)) -> (Diagram, ElementId, ElementId) {
        let mut diagram = Diagram::new();
        let ida = ElementId::with_prefix("route");
        let idb = ElementId::with_prefix("route");
        diagram.add_class(ClassBox::new(ida, "A", CanvasPoint::new(a.0, a.1)));
        diagram.add_class(ClassBox::new(idb, "B", CanvasPoint::new(b.0, b.1)));
        (diagram, ida, idb)
    }

    fn connect(from: ElementId, to: ElementId, fh: HandleSide, th: HandleSide) -> Connection {
        Connection {
            id: ElementId::with_prefix("route_conn"),
            from,
            to,
            from_handle: fh,
            to_handle: th,
        }
    }

    #[test]
    fn offsets_use_half_nominal_size() {
        let config = CanvasConfig::default();
        assert_eq!(handle_offset(HandleSide::Top, &config), Vec2::new(0.0, -50.0));
        assert_eq!(handle_offset(HandleSide::Bottom, &config), Vec2::new(0.0, 50.0));
        assert_eq!(handle_offset(HandleSide::Left, &config), Vec2::new(-96.0, 0.0));
        assert_eq!(handle_offset(HandleSide::Right, &config), Vec2::new(96.0, 0.0));
    }

    #[test]
    fn routes_between_handles() {
        let config = CanvasConfig::default();
        let (mut diagram, a, b) = diagram_with((0.0, 0.0), (400.0, 30.0));
        diagram.add_connection(connect(a, b, HandleSide::Right, HandleSide::Left));

        let paths = route_all(&diagram, &config, 2.0);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].start, Point::new(96.0, 0.0));
        assert_eq!(paths[0].end, Point::new(304.0, 30.0));
        assert_eq!(paths[0].arrow[0], paths[0].end);
    }

    #[test]
    fn dangling_connections_render_nothing() {
        let config = CanvasConfig::default();
        let (mut diagram, a, _) = diagram_with((0.0, 0.0), (10.0, 10.0));
        let ghost = ElementId::intern("route_ghost");
        diagram.add_connection(connect(a, ghost, HandleSide::Top, HandleSide::Top));
        diagram.add_connection(connect(ghost, a, HandleSide::Top, HandleSide::Top));
        assert!(route_all(&diagram, &config, 2.0).is_empty());
    }

    #[test]
    fn arrowhead_points_back_along_shaft() {
        let [tip, left, right] = arrowhead(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 2.0);
        assert_eq!(tip, Point::new(100.0, 0.0));
        assert!(left.x < 100.0 && right.x < 100.0);
        assert!((left.y + right.y).abs() < 1e-9, "barbs are symmetric");
        assert!((tip.distance(left) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_arrowhead_does_not_produce_nan() {
        let p = Point::new(5.0, 5.0);
        for q in arrowhead(p, p, 2.0) {
            assert!(q.x.is_finite() && q.y.is_finite());
        }
    }
}
