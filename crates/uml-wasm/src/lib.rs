//! WASM bridge for the UML class canvas: exposes the Rust editor to
//! JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! `<canvas>` element and the HTML overlays (context menu, creation form);
//! it forwards DOM events here and re-renders when a call reports a change.

mod render2d;

use uml_core::{CanvasConfig, ElementId, HandleSide, Point, Surface};
use uml_editor::{
    CanvasController, EditError, EventOutcome, FieldEdit, HandleClick, InputEvent, MethodEdit,
    Modifiers, PointerButton,
};
use uml_render::Hit;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The WASM-facing canvas.
///
/// Holds the controller plus view-only state (theme, hover). All
/// interaction from the page goes through this struct.
#[wasm_bindgen]
pub struct UmlCanvas {
    controller: CanvasController,
    width: f64,
    height: f64,
    /// `false` = light (default), `true` = dark.
    dark_mode: bool,
    hovered: Hit,
}

#[wasm_bindgen]
impl UmlCanvas {
    /// Create a canvas with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_controller(CanvasController::new(CanvasConfig::default()), width, height)
    }

    /// Create a canvas from a JSON config (any subset of the config keys).
    /// Returns `undefined` if the JSON is invalid.
    pub fn with_config(width: f64, height: f64, config_json: &str) -> Option<UmlCanvas> {
        let controller = report(
            CanvasController::from_config_json(config_json),
            "with_config",
        )?;
        Some(Self::with_controller(controller, width, height))
    }

    /// Merge a JSON config override (any subset of the config keys) into
    /// the live canvas. Returns false and keeps the old config if the JSON
    /// is invalid.
    pub fn set_config(&mut self, config_json: &str) -> bool {
        report(self.controller.set_config_json(config_json), "set_config").is_some()
    }

    /// Render the diagram to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = if self.dark_mode {
            render2d::CanvasTheme::dark()
        } else {
            render2d::CanvasTheme::light()
        };
        render2d::render_canvas(
            ctx,
            &self.controller,
            self.width,
            self.height,
            &theme,
            self.hovered,
        );
    }

    /// Set the canvas theme.
    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    /// The canvas element moved or resized. `left`/`top` are its client
    /// position (`getBoundingClientRect`).
    pub fn resize(&mut self, left: f32, top: f32, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.controller
            .set_surface(Surface::new(left, top, width as f32, height as f32));
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    /// Handle mousedown. Returns `{"changed":bool,"preventDefault":bool}`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let event = InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::from_dom(button),
            modifiers: modifiers(shift, ctrl, alt, meta),
        };
        outcome_json(self.controller.handle_event(&event))
    }

    /// Handle mousemove. While `captures_pointer()` is true the page should
    /// forward moves from the whole document. Returns true if a repaint is
    /// needed.
    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = InputEvent::PointerMove {
            x,
            y,
            modifiers: modifiers(shift, ctrl, alt, meta),
        };
        let outcome = self.controller.handle_event(&event);

        let hit = self.controller.hit_at(Point::new(x, y));
        let hover_changed = hit != self.hovered;
        self.hovered = hit;

        outcome.changed || hover_changed
    }

    /// Handle mouseup. Returns true if a gesture ended.
    pub fn handle_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = InputEvent::PointerUp {
            x,
            y,
            modifiers: modifiers(shift, ctrl, alt, meta),
        };
        self.controller.handle_event(&event).changed
    }

    /// Handle mouseleave on the canvas element.
    pub fn handle_pointer_leave(&mut self) -> bool {
        let changed = self.controller.handle_event(&InputEvent::PointerLeave).changed;
        let hover_changed = self.hovered != Hit::Background;
        self.hovered = Hit::Background;
        changed || hover_changed
    }

    /// Handle click. Returns `{"changed":bool,"preventDefault":bool}`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_click(
        &mut self,
        x: f32,
        y: f32,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let event = InputEvent::Click {
            x,
            y,
            button: PointerButton::from_dom(button),
            modifiers: modifiers(shift, ctrl, alt, meta),
        };
        outcome_json(self.controller.handle_event(&event))
    }

    /// Handle contextmenu. The page should always prevent the browser menu;
    /// the returned JSON says whether ours opened.
    pub fn handle_context_menu(&mut self, x: f32, y: f32) -> String {
        outcome_json(self.controller.handle_event(&InputEvent::ContextMenu { x, y }))
    }

    /// Handle wheel. Returns true if the event zoomed the canvas; the page
    /// must then call `preventDefault()` to stop browser page zoom.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_wheel(
        &mut self,
        x: f32,
        y: f32,
        delta_y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = InputEvent::Wheel {
            x,
            y,
            delta_y,
            modifiers: modifiers(shift, ctrl, alt, meta),
        };
        self.controller.handle_event(&event).prevent_default
    }

    /// Whether the page must route document-level mouse events here.
    pub fn captures_pointer(&self) -> bool {
        self.controller.captures_pointer()
    }

    /// CSS cursor for the canvas element.
    pub fn get_cursor(&self) -> String {
        if !self.controller.interaction().is_idle() {
            return self.controller.cursor().to_string();
        }
        match self.hovered {
            Hit::Handle { .. } => "pointer",
            Hit::Header(_) => "grab",
            Hit::Body(_) | Hit::Background => "default",
        }
        .to_string()
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns `{"changed":bool,"preventDefault":bool}`.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let event = InputEvent::Key {
            key: key.to_string(),
            modifiers: modifiers(shift, ctrl, alt, meta),
        };
        outcome_json(self.controller.handle_event(&event))
    }

    // ─── Context menu ────────────────────────────────────────────────────

    /// `{"position":{x,y},"visible":bool,"insertionPoint":{x,y}}`.
    pub fn get_context_menu_json(&self) -> String {
        serde_json::to_string(self.controller.context_menu()).unwrap_or_default()
    }

    /// The menu's "Add Class" entry: opens an empty creation form.
    pub fn add_class_from_menu(&mut self) {
        self.controller.open_class_form();
    }

    // ─── Creation form ───────────────────────────────────────────────────

    /// The open form as JSON (`{"name","fields","methods","canSubmit"}`),
    /// or `""` when no form is open.
    pub fn get_form_json(&self) -> String {
        let Some(form) = self.controller.form() else {
            return String::new();
        };
        match serde_json::to_value(form) {
            Ok(mut value) => {
                value["canSubmit"] = serde_json::Value::Bool(form.can_submit());
                value.to_string()
            }
            Err(e) => {
                log::warn!("form serialization failed: {e}");
                String::new()
            }
        }
    }

    pub fn close_form(&mut self) -> bool {
        self.controller.close_class_form()
    }

    pub fn form_set_name(&mut self, name: &str) -> bool {
        report(self.controller.form_mut(), "form_set_name")
            .map(|form| form.set_name(name))
            .is_some()
    }

    /// Append a blank field. Returns its id, or `""` if no form is open.
    pub fn form_add_field(&mut self) -> String {
        report(self.controller.form_mut(), "form_add_field")
            .map(|form| form.add_field().to_string())
            .unwrap_or_default()
    }

    /// Append a blank method. Returns its id, or `""` if no form is open.
    pub fn form_add_method(&mut self) -> String {
        report(self.controller.form_mut(), "form_add_method")
            .map(|form| form.add_method().to_string())
            .unwrap_or_default()
    }

    pub fn form_remove_field(&mut self, id: &str) -> bool {
        let result = self.with_member(id, |form, id| form.remove_field(id).map(drop));
        report(result, "form_remove_field").is_some()
    }

    pub fn form_remove_method(&mut self, id: &str) -> bool {
        let result = self.with_member(id, |form, id| form.remove_method(id).map(drop));
        report(result, "form_remove_method").is_some()
    }

    /// Set one property of a field draft. Keys: `name`, `type`.
    pub fn form_edit_field(&mut self, id: &str, key: &str, value: &str) -> bool {
        let result = FieldEdit::from_key(key, value)
            .and_then(|edit| self.with_member(id, |form, id| form.edit_field(id, edit)));
        report(result, "form_edit_field").is_some()
    }

    /// Set one property of a method draft. Keys: `name`, `parameters`,
    /// `returnType`.
    pub fn form_edit_method(&mut self, id: &str, key: &str, value: &str) -> bool {
        let result = MethodEdit::from_key(key, value)
            .and_then(|edit| self.with_member(id, |form, id| form.edit_method(id, edit)));
        report(result, "form_edit_method").is_some()
    }

    /// Toggle a field's visibility. Returns the new value name, or `""`.
    pub fn form_cycle_field_visibility(&mut self, id: &str) -> String {
        let result = self.with_member(id, |form, id| form.cycle_field_visibility(id));
        report(result, "form_cycle_field_visibility")
            .map(|v| v.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn form_cycle_method_visibility(&mut self, id: &str) -> String {
        let result = self.with_member(id, |form, id| form.cycle_method_visibility(id));
        report(result, "form_cycle_method_visibility")
            .map(|v| v.as_str().to_string())
            .unwrap_or_default()
    }

    /// Create the class. Returns its id, or `""` if the name is blank (the
    /// form then stays open).
    pub fn form_submit(&mut self) -> String {
        report(self.controller.submit_class_form(), "form_submit")
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    // ─── Direct intents ──────────────────────────────────────────────────

    /// Handle click from an HTML overlay. Returns `started`, `connected`,
    /// `cancelled`, or `""` for an unknown class or side.
    pub fn click_handle(&mut self, class_id: &str, side: &str) -> String {
        let side = HandleSide::from_name(side).ok_or_else(|| EditError::UnknownHandle(side.into()));
        let Some(side) = report(side, "click_handle") else {
            return String::new();
        };
        let Some(id) = known_id(class_id) else {
            return String::new();
        };
        match self.controller.on_handle_click(id, side) {
            HandleClick::Started => "started",
            HandleClick::Connected(_) => "connected",
            HandleClick::Cancelled => "cancelled",
        }
        .to_string()
    }

    /// Move a class by a screen-space delta.
    pub fn drag_class_by(&mut self, class_id: &str, dx: f32, dy: f32) -> bool {
        known_id(class_id)
            .map(|id| self.controller.on_node_drag_move(id, Point::new(dx, dy)))
            .unwrap_or(false)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// `{"classes":[...],"connections":[...]}`.
    pub fn get_diagram_json(&self) -> String {
        serde_json::to_string(self.controller.diagram()).unwrap_or_else(|e| {
            log::warn!("diagram serialization failed: {e}");
            r#"{"classes":[],"connections":[]}"#.to_string()
        })
    }

    pub fn get_zoom_percent(&self) -> u32 {
        self.controller.zoom_percent()
    }

    /// Pending connection source as `{"from":id,"fromHandle":side}`, or `""`.
    pub fn get_pending_json(&self) -> String {
        self.controller
            .pending_connection()
            .map(|p| {
                serde_json::json!({
                    "from": p.from.as_str(),
                    "fromHandle": p.from_handle.as_str(),
                })
                .to_string()
            })
            .unwrap_or_default()
    }
}

impl UmlCanvas {
    fn with_controller(controller: CanvasController, width: f64, height: f64) -> Self {
        // Set up panic hook and console logging
        console_error_panic_hook_setup();
        console_logger_setup();

        let mut canvas = Self {
            controller,
            width,
            height,
            dark_mode: false,
            hovered: Hit::Background,
        };
        canvas.resize(0.0, 0.0, width, height);
        canvas
    }

    /// Resolve a member id and run `f` against the open form.
    fn with_member<T>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut uml_editor::ClassForm, ElementId) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let form = self.controller.form_mut()?;
        // An id the interner has never seen cannot be in the form.
        let member =
            ElementId::lookup(id).ok_or_else(|| EditError::UnknownMember(id.to_string()))?;
        f(form, member)
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn outcome_json(outcome: EventOutcome) -> String {
    serde_json::json!({
        "changed": outcome.changed,
        "preventDefault": outcome.prevent_default,
    })
    .to_string()
}

/// Log a rejected call and turn it into `None`.
fn report<T>(result: Result<T, EditError>, call: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("{call}: {e}");
            None
        }
    }
}

fn known_id(s: &str) -> Option<ElementId> {
    let id = ElementId::lookup(s);
    if id.is_none() {
        log::warn!("unknown class id {s:?}");
    }
    id
}

/// Set the console log level (`error`, `warn`, `info`, `debug`, `trace`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("UML canvas panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

/// Forwards `log` records to the browser console.
#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from(format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

fn console_logger_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        static LOGGER: ConsoleLogger = ConsoleLogger;
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Info);
        }
    }
}
