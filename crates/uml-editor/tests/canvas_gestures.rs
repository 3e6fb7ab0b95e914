//! Integration tests: pointer gestures routed through the canvas controller
//! (uml-editor ↔ uml-render hit testing ↔ uml-core viewport).

use pretty_assertions::assert_eq;
use uml_core::{Connection, HandleSide, Point, Surface};
use uml_editor::{CanvasController, ClassForm, FieldEdit, InputEvent, Interaction, Modifiers};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 800×600 canvas at the page origin, zoom 1, no pan: client == canvas.
fn controller() -> CanvasController {
    init();
    let mut c = CanvasController::default();
    c.set_surface(Surface::new(0.0, 0.0, 800.0, 600.0));
    c
}

/// Right click → "Add Class" → type a name → submit.
fn create_class(c: &mut CanvasController, name: &str, x: f32, y: f32) -> uml_core::ElementId {
    let outcome = c.handle_event(&InputEvent::ContextMenu { x, y });
    assert!(outcome.prevent_default);
    c.open_class_form();
    c.form_mut().unwrap().set_name(name);
    c.submit_class_form().unwrap()
}

// ─── Creation ───────────────────────────────────────────────────────────

#[test]
fn create_foo_at_insertion_point() {
    let mut c = controller();
    let id = create_class(&mut c, "Foo", 100.0, 100.0);

    assert_eq!(c.diagram().classes().len(), 1);
    let class = c.diagram().get_by_id(id).unwrap();
    assert_eq!(class.name, "Foo");
    assert_eq!(class.position, Point::new(100.0, 100.0));
    assert!(class.fields.is_empty());
    assert!(class.methods.is_empty());
    assert!(c.form().is_none());
}

#[test]
fn form_members_reach_the_class_in_order() {
    let mut c = controller();
    c.handle_event(&InputEvent::ContextMenu { x: 10.0, y: 10.0 });
    c.open_class_form();
    let form: &mut ClassForm = c.form_mut().unwrap();
    form.set_name("User");
    let keep_a = form.add_field();
    let drop = form.add_field();
    let keep_b = form.add_field();
    form.edit_field(keep_a, FieldEdit::Name("email".into())).unwrap();
    form.edit_field(keep_b, FieldEdit::Name("age".into())).unwrap();
    form.remove_field(drop).unwrap();
    form.add_method();

    let id = c.submit_class_form().unwrap();
    let class = c.diagram().get_by_id(id).unwrap();
    let names: Vec<&str> = class.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["email", "age"]);
    assert_eq!(class.methods.len(), 1);
    assert_eq!(class.methods[0].return_type, "void");
}

#[test]
fn context_menu_over_a_class_is_suppressed() {
    let mut c = controller();
    create_class(&mut c, "A", 100.0, 100.0);
    c.cancel();

    let outcome = c.handle_event(&InputEvent::ContextMenu { x: 100.0, y: 120.0 });
    assert!(outcome.prevent_default);
    assert!(!outcome.changed);
    assert!(!c.context_menu().visible);
}

#[test]
fn any_click_closes_the_menu() {
    let mut c = controller();
    create_class(&mut c, "A", 100.0, 100.0);
    c.handle_event(&InputEvent::ContextMenu { x: 600.0, y: 400.0 });
    assert!(c.context_menu().visible);

    // Click on the class body, not the background.
    c.handle_event(&InputEvent::click(100.0, 130.0));
    assert!(!c.context_menu().visible);
}

// ─── Connections ────────────────────────────────────────────────────────

#[test]
fn clicking_two_handles_connects_classes() {
    let mut c = controller();
    let a = create_class(&mut c, "A", 100.0, 100.0);
    let b = create_class(&mut c, "B", 500.0, 100.0);

    // A's right handle sits at (196, 100), B's left at (404, 100).
    c.handle_event(&InputEvent::click(196.0, 100.0));
    assert!(matches!(c.interaction(), Interaction::Connecting(_)));
    c.handle_event(&InputEvent::click(404.0, 101.0));

    assert_eq!(c.diagram().connections.len(), 1);
    let Connection {
        from,
        to,
        from_handle,
        to_handle,
        ..
    } = c.diagram().connections[0].clone();
    assert_eq!((from, to), (a, b));
    assert_eq!((from_handle, to_handle), (HandleSide::Right, HandleSide::Left));
    assert_eq!(c.pending_connection(), None);
}

#[test]
fn same_class_handles_create_nothing() {
    let mut c = controller();
    create_class(&mut c, "A", 100.0, 100.0);

    c.handle_event(&InputEvent::click(196.0, 100.0));
    c.handle_event(&InputEvent::click(4.0, 100.0));
    assert!(c.diagram().connections.is_empty());
    assert_eq!(c.pending_connection(), None);
}

#[test]
fn background_click_cancels_pending_connection() {
    let mut c = controller();
    create_class(&mut c, "A", 100.0, 100.0);

    c.handle_event(&InputEvent::click(100.0, 50.0));
    assert!(c.pending_connection().is_some());
    let outcome = c.handle_event(&InputEvent::click(700.0, 500.0));
    assert!(outcome.changed);
    assert_eq!(c.pending_connection(), None);
}

#[test]
fn starting_a_pan_cancels_pending_connection() {
    let mut c = controller();
    create_class(&mut c, "A", 100.0, 100.0);
    c.handle_event(&InputEvent::click(196.0, 100.0));

    c.handle_event(&InputEvent::pointer_down(700.0, 500.0));
    assert!(matches!(c.interaction(), Interaction::Panning { .. }));
    assert_eq!(c.pending_connection(), None);
}

// ─── Class drag ─────────────────────────────────────────────────────────

#[test]
fn header_drag_moves_class() {
    let mut c = controller();
    let a = create_class(&mut c, "A", 100.0, 100.0);

    let down = c.handle_event(&InputEvent::pointer_down(100.0, 60.0));
    assert!(down.prevent_default);
    assert!(c.captures_pointer());
    c.handle_event(&InputEvent::pointer_move(130.0, 40.0));
    c.handle_event(&InputEvent::pointer_move(150.0, 80.0));
    c.handle_event(&InputEvent::pointer_up(150.0, 80.0));

    assert_eq!(
        c.diagram().get_by_id(a).unwrap().position,
        Point::new(150.0, 120.0)
    );
    assert!(c.interaction().is_idle());
    // Layout cache follows the class.
    assert_eq!(c.layouts()[0].frame.center(), kurbo::Point::new(150.0, 120.0));
}

#[test]
fn drag_is_scaled_by_zoom() {
    let mut c = controller();
    let a = create_class(&mut c, "A", 100.0, 100.0);
    for _ in 0..5 {
        c.handle_event(&InputEvent::Wheel {
            x: 400.0,
            y: 300.0,
            delta_y: -100.0,
            modifiers: Modifiers::CTRL,
        });
    }
    let zoom = c.viewport().zoom;
    assert!(zoom > 1.5);

    // Grab the header center, wherever it now is on screen.
    let grip = c.viewport().canvas_to_screen(Point::new(100.0, 60.0));
    let before = c.diagram().get_by_id(a).unwrap().position;
    c.handle_event(&InputEvent::pointer_down(grip.x, grip.y));
    c.handle_event(&InputEvent::pointer_move(grip.x + 60.0, grip.y - 30.0));
    c.handle_event(&InputEvent::pointer_up(grip.x + 60.0, grip.y - 30.0));

    let after = c.diagram().get_by_id(a).unwrap().position;
    assert!((after - before).approx_eq(Point::new(60.0 / zoom, -30.0 / zoom), 1e-3));
}

#[test]
fn drag_continues_outside_the_canvas() {
    let mut c = controller();
    let a = create_class(&mut c, "A", 100.0, 100.0);

    c.handle_event(&InputEvent::pointer_down(100.0, 60.0));
    c.handle_event(&InputEvent::PointerLeave);
    assert!(c.captures_pointer());
    c.handle_event(&InputEvent::pointer_move(-100.0, 60.0));
    c.handle_event(&InputEvent::pointer_up(-100.0, 60.0));

    assert_eq!(
        c.diagram().get_by_id(a).unwrap().position,
        Point::new(-100.0, 100.0)
    );
}

#[test]
fn drag_move_intent_divides_by_zoom() {
    let mut c = controller();
    let a = create_class(&mut c, "A", 0.0, 0.0);
    c.handle_event(&InputEvent::Key {
        key: "=".into(),
        modifiers: Modifiers::CTRL,
    });
    let zoom = c.viewport().zoom;

    assert!(c.on_node_drag_move(a, Point::new(11.0, -22.0)));
    let moved = c.diagram().get_by_id(a).unwrap().position;
    assert!(moved.approx_eq(Point::new(11.0 / zoom, -22.0 / zoom), 1e-4));
}

#[test]
fn body_press_does_not_start_a_gesture() {
    let mut c = controller();
    create_class(&mut c, "A", 100.0, 100.0);
    let outcome = c.handle_event(&InputEvent::pointer_down(100.0, 130.0));
    assert!(!outcome.changed);
    assert!(c.interaction().is_idle());
}

// ─── Pan ────────────────────────────────────────────────────────────────

#[test]
fn background_drag_pans() {
    let mut c = controller();
    c.handle_event(&InputEvent::pointer_down(10.0, 10.0));
    assert_eq!(c.cursor(), "grabbing");
    c.handle_event(&InputEvent::pointer_move(60.0, -15.0));
    c.handle_event(&InputEvent::pointer_up(60.0, -15.0));
    assert_eq!(c.viewport().pan, Point::new(50.0, -25.0));
}

#[test]
fn leaving_the_canvas_ends_a_pan() {
    let mut c = controller();
    c.handle_event(&InputEvent::pointer_down(10.0, 10.0));
    c.handle_event(&InputEvent::pointer_move(20.0, 10.0));
    c.handle_event(&InputEvent::PointerLeave);
    c.handle_event(&InputEvent::pointer_move(500.0, 500.0));
    assert_eq!(c.viewport().pan, Point::new(10.0, 0.0));
    assert!(c.interaction().is_idle());
}

#[test]
fn surface_offset_is_respected() {
    init();
    let mut c = CanvasController::default();
    c.set_surface(Surface::new(200.0, 50.0, 800.0, 600.0));
    let id = create_class(&mut c, "Offset", 300.0, 150.0);
    assert_eq!(
        c.diagram().get_by_id(id).unwrap().position,
        Point::new(100.0, 100.0)
    );
}
