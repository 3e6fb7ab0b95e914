//! Canvas controller: the single owner of diagram and view state.
//!
//! Every change to the canvas goes through here:
//!
//! - **Pointer gestures** (pan, class drag) are tracked by the
//!   [`Interaction`] state and turned into `CanvasMutation`s on each move.
//! - **Intents** from the rest of the UI (context menu, creation form,
//!   handle clicks) are plain methods that validate and then mutate.
//!
//! Class layouts are cached and refreshed after every diagram mutation so
//! hit testing always sees what was last drawn.

use crate::error::EditError;
use crate::form::ClassForm;
use crate::gesture::{Interaction, PendingConnection};
use crate::input::{InputEvent, Modifiers, PointerButton};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use serde::Serialize;
use uml_core::{
    CanvasConfig, ClassBox, Connection, Diagram, ElementId, Fields, HandleSide, Methods, Point,
    Surface, Viewport,
};
use uml_render::{ClassLayout, Hit, handle_anchor, hit_test, layout_class, layout_diagram};

/// A state change produced by a gesture or an intent.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasMutation {
    AddClass { class: Box<ClassBox> },
    /// Absolute canvas position of a class center.
    MoveClass { id: ElementId, position: Point },
    AddConnection { connection: Connection },
    SetPan { pan: Point },
}

/// Right-click menu state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenu {
    /// Client position the menu opens at.
    pub position: Point,
    pub visible: bool,
    /// Canvas position the next created class is placed at. Survives the
    /// menu closing, since the form opens after the menu is gone.
    pub insertion_point: Point,
}

/// What a handle click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleClick {
    /// First click: a connection is now pending.
    Started,
    /// Second click on another class: the new connection's id.
    Connected(ElementId),
    /// Second click on the source class: pending cleared, nothing created.
    Cancelled,
}

/// Result of routing one input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The canvas needs a repaint (or overlays a refresh).
    pub changed: bool,
    /// The host should call `preventDefault()` on the native event.
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const IGNORED: EventOutcome = EventOutcome {
        changed: false,
        prevent_default: false,
    };

    fn changed(changed: bool) -> Self {
        Self {
            changed,
            prevent_default: false,
        }
    }
}

/// Owns the diagram, the view transform and all transient UI state.
pub struct CanvasController {
    diagram: Diagram,
    viewport: Viewport,
    surface: Surface,
    config: CanvasConfig,
    interaction: Interaction,
    menu: ContextMenu,
    form: Option<ClassForm>,
    /// Cached layouts, parallel to `diagram.classes`.
    layouts: Vec<ClassLayout>,
    /// Last known pointer position in canvas space.
    pointer: Option<Point>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasController {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            diagram: Diagram::new(),
            viewport: Viewport::default(),
            surface: Surface::default(),
            config: config.sanitized(),
            interaction: Interaction::Idle,
            menu: ContextMenu::default(),
            form: None,
            layouts: Vec::new(),
            pointer: None,
        }
    }

    /// Build a controller from a JSON config. Missing keys take defaults.
    pub fn from_config_json(json: &str) -> Result<Self, EditError> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        Ok(Self::new(config))
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn pending_connection(&self) -> Option<PendingConnection> {
        self.interaction.pending()
    }

    pub fn context_menu(&self) -> &ContextMenu {
        &self.menu
    }

    pub fn form(&self) -> Option<&ClassForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Result<&mut ClassForm, EditError> {
        self.form.as_mut().ok_or(EditError::NoOpenForm)
    }

    pub fn layouts(&self) -> &[ClassLayout] {
        &self.layouts
    }

    pub fn zoom_percent(&self) -> u32 {
        self.viewport.zoom_percent()
    }

    pub fn captures_pointer(&self) -> bool {
        self.interaction.captures_pointer()
    }

    pub fn cursor(&self) -> &'static str {
        self.interaction.cursor()
    }

    /// The host moved or resized the canvas element.
    pub fn set_surface(&mut self, surface: Surface) {
        log::debug!("surface {surface:?}");
        self.surface = surface;
    }

    // ─── Coordinates & hit testing ───────────────────────────────────────

    pub fn client_to_canvas(&self, client: Point) -> Point {
        self.viewport.client_to_canvas(&self.surface, client)
    }

    /// What is under the pointer at `client`.
    pub fn hit_at(&self, client: Point) -> Hit {
        let p = self.client_to_canvas(client);
        hit_test(
            &self.layouts,
            kurbo::Point::new(p.x as f64, p.y as f64),
            self.config.handle_radius as f64,
        )
    }

    /// Rubber-band segment from the pending source handle to the pointer,
    /// in canvas space.
    pub fn pending_preview(&self) -> Option<(kurbo::Point, kurbo::Point)> {
        let pending = self.interaction.pending()?;
        let class = self.diagram.get_by_id(pending.from)?;
        let start = handle_anchor(class, pending.from_handle, &self.config);
        let end = self
            .pointer
            .map(|p| kurbo::Point::new(p.x as f64, p.y as f64))
            .unwrap_or(start);
        Some((start, end))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply a mutation and keep the layout cache in step.
    pub fn apply_mutation(&mut self, mutation: CanvasMutation) {
        match mutation {
            CanvasMutation::AddClass { class } => {
                self.layouts.push(layout_class(&class, &self.config));
                self.diagram.add_class(*class);
            }
            CanvasMutation::MoveClass { id, position } => {
                let Some(class) = self.diagram.get_by_id_mut(id) else {
                    log::debug!("move of unknown class {id} ignored");
                    return;
                };
                class.position = position;
                let layout = layout_class(class, &self.config);
                if let Some(slot) = self.layouts.iter_mut().find(|l| l.id == id) {
                    *slot = layout;
                }
            }
            CanvasMutation::AddConnection { connection } => {
                self.diagram.add_connection(connection);
            }
            CanvasMutation::SetPan { pan } => {
                self.viewport.pan = pan;
            }
        }
    }

    /// Swap in a new config at runtime. Boxes are laid out again and the
    /// zoom is pulled back inside the new bounds about the surface center.
    pub fn set_config(&mut self, config: CanvasConfig) {
        self.config = config.sanitized();
        self.relayout();
        self.zoom_step(1.0);
        log::debug!(
            "config updated, zoom bounds {}..{}",
            self.config.min_zoom,
            self.config.max_zoom
        );
    }

    /// Merge a partial JSON override into the current config.
    pub fn set_config_json(&mut self, json: &str) -> Result<(), EditError> {
        let patch: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(&self.config)?;
        if let (Some(target), serde_json::Value::Object(patch)) = (merged.as_object_mut(), patch) {
            target.extend(patch);
        }
        let config: CanvasConfig = serde_json::from_value(merged)?;
        self.set_config(config);
        Ok(())
    }

    fn relayout(&mut self) {
        self.layouts = layout_diagram(&self.diagram, &self.config);
    }

    // ─── Context menu & creation form ────────────────────────────────────

    /// Right click on empty canvas: open the menu and remember where the
    /// next class goes.
    pub fn on_background_right_click(&mut self, client: Point) {
        let insertion_point = self.client_to_canvas(client);
        log::debug!(
            "context menu at ({}, {}), insertion ({}, {})",
            client.x,
            client.y,
            insertion_point.x,
            insertion_point.y
        );
        self.menu = ContextMenu {
            position: client,
            visible: true,
            insertion_point,
        };
    }

    /// Left click on empty canvas: close the menu and drop any pending
    /// connection. Returns whether anything changed.
    pub fn on_background_left_click(&mut self) -> bool {
        let hid = self.hide_menu();
        let cancelled = self.cancel_pending();
        hid || cancelled
    }

    /// "Add Class" from the context menu.
    pub fn open_class_form(&mut self) {
        log::debug!("open class form");
        self.hide_menu();
        self.form = Some(ClassForm::new());
    }

    pub fn close_class_form(&mut self) -> bool {
        self.form.take().is_some()
    }

    /// Create a class at the recorded insertion point.
    ///
    /// The name is stored as given; only an all-whitespace name is rejected.
    pub fn on_create_node(
        &mut self,
        name: impl Into<String>,
        fields: Fields,
        methods: Methods,
    ) -> Result<ElementId, EditError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EditError::EmptyClassName);
        }
        let id = ElementId::with_prefix("class");
        let mut class = ClassBox::new(id, name, self.menu.insertion_point);
        class.fields = fields;
        class.methods = methods;
        self.apply_mutation(CanvasMutation::AddClass {
            class: Box::new(class),
        });
        self.form = None;
        Ok(id)
    }

    /// Submit the open form. A blank name leaves the form open.
    pub fn submit_class_form(&mut self) -> Result<ElementId, EditError> {
        match self.form.take() {
            None => Err(EditError::NoOpenForm),
            Some(form) if !form.can_submit() => {
                self.form = Some(form);
                Err(EditError::EmptyClassName)
            }
            Some(form) => {
                let (name, fields, methods) = form.into_parts();
                self.on_create_node(name, fields, methods)
            }
        }
    }

    // ─── Class drag ──────────────────────────────────────────────────────

    /// Move a class by a screen-space delta. Unknown ids are ignored.
    pub fn on_node_drag_move(&mut self, id: ElementId, screen_delta: Point) -> bool {
        let Some(class) = self.diagram.get_by_id(id) else {
            log::debug!("drag of unknown class {id} ignored");
            return false;
        };
        let position = class.position + self.viewport.screen_delta_to_canvas(screen_delta);
        self.apply_mutation(CanvasMutation::MoveClass { id, position });
        true
    }

    fn begin_class_drag(&mut self, id: ElementId, client: Point) -> bool {
        let Some(class) = self.diagram.get_by_id(id) else {
            return false;
        };
        let initial_position = class.position;
        if self.cancel_pending() {
            log::debug!("pending connection dropped by drag of {id}");
        }
        log::debug!("drag {id} start");
        self.interaction = Interaction::DraggingClass {
            id,
            start: client,
            initial_position,
        };
        true
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Two-click connection gesture.
    pub fn on_handle_click(&mut self, id: ElementId, side: HandleSide) -> HandleClick {
        match self.interaction.pending() {
            None => {
                log::debug!("connection pending from {id}:{}", side.as_str());
                self.interaction = Interaction::Connecting(PendingConnection {
                    from: id,
                    from_handle: side,
                });
                HandleClick::Started
            }
            Some(pending) if pending.from == id => {
                log::debug!("connection to self dropped");
                self.interaction = Interaction::Idle;
                HandleClick::Cancelled
            }
            Some(pending) => {
                let connection = Connection {
                    id: ElementId::with_prefix("conn"),
                    from: pending.from,
                    to: id,
                    from_handle: pending.from_handle,
                    to_handle: side,
                };
                let conn_id = connection.id;
                self.apply_mutation(CanvasMutation::AddConnection { connection });
                self.interaction = Interaction::Idle;
                HandleClick::Connected(conn_id)
            }
        }
    }

    // ─── View ────────────────────────────────────────────────────────────

    /// Wheel zoom about the cursor. Only acts while the zoom modifier is
    /// held; returns whether the event was consumed.
    pub fn apply_zoom(&mut self, delta_y: f32, client: Point, modifiers: Modifiers) -> bool {
        if !modifiers.zoom_held() {
            return false;
        }
        let anchor = self.surface.to_local(client);
        if self.viewport.zoom_for_wheel(delta_y, anchor, &self.config) {
            log::trace!("zoom {}%", self.viewport.zoom_percent());
        }
        true
    }

    /// Zoom by `factor` about the surface center (keyboard zoom).
    pub fn zoom_step(&mut self, factor: f32) -> bool {
        let anchor = self.surface.center();
        self.viewport.zoom_about(anchor, factor, &self.config)
    }

    pub fn apply_pan(&mut self, screen_delta: Point) {
        self.viewport.pan_by(screen_delta);
    }

    pub fn reset_view(&mut self) -> bool {
        let before = self.viewport;
        self.viewport.reset();
        before != self.viewport
    }

    fn begin_pan(&mut self, client: Point) {
        if self.cancel_pending() {
            log::debug!("pending connection dropped by pan");
        }
        self.interaction = Interaction::Panning {
            start: client,
            initial_pan: self.viewport.pan,
        };
    }

    // ─── Transient state ─────────────────────────────────────────────────

    /// Escape: drop the pending connection, else the menu, else the form.
    pub fn cancel(&mut self) -> bool {
        self.cancel_pending() || self.hide_menu() || self.close_class_form()
    }

    fn cancel_pending(&mut self) -> bool {
        if self.interaction.pending().is_some() {
            self.interaction = Interaction::Idle;
            true
        } else {
            false
        }
    }

    fn hide_menu(&mut self) -> bool {
        std::mem::replace(&mut self.menu.visible, false)
    }

    // ─── Event routing ───────────────────────────────────────────────────

    /// Route one host event.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventOutcome {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button: PointerButton::Primary,
                ..
            } => {
                let client = Point::new(*x, *y);
                match self.hit_at(client) {
                    // Prevent text selection while dragging.
                    Hit::Header(id) => EventOutcome {
                        changed: self.begin_class_drag(id, client),
                        prevent_default: true,
                    },
                    Hit::Background => {
                        self.begin_pan(client);
                        EventOutcome::changed(true)
                    }
                    Hit::Handle { .. } | Hit::Body(_) => EventOutcome::IGNORED,
                }
            }
            InputEvent::PointerDown { .. } => EventOutcome::IGNORED,

            InputEvent::PointerMove { x, y, .. } => {
                let client = Point::new(*x, *y);
                self.pointer = Some(self.client_to_canvas(client));
                let mutations = self.interaction.track(client, &self.viewport);
                let changed = !mutations.is_empty() || self.interaction.pending().is_some();
                for mutation in mutations {
                    self.apply_mutation(mutation);
                }
                EventOutcome::changed(changed)
            }

            InputEvent::PointerUp { .. } => {
                if let Some(id) = self.interaction.dragged_class() {
                    log::debug!("drag {id} end");
                }
                EventOutcome::changed(self.interaction.release())
            }

            InputEvent::PointerLeave => EventOutcome::changed(self.interaction.leave()),

            InputEvent::Click {
                x,
                y,
                button: PointerButton::Primary,
                ..
            } => {
                let client = Point::new(*x, *y);
                let changed = match self.hit_at(client) {
                    Hit::Handle { class, side } => {
                        self.hide_menu();
                        self.on_handle_click(class, side);
                        true
                    }
                    Hit::Background => self.on_background_left_click(),
                    Hit::Header(_) | Hit::Body(_) => self.hide_menu(),
                };
                EventOutcome::changed(changed)
            }
            InputEvent::Click { .. } => EventOutcome::IGNORED,

            InputEvent::ContextMenu { x, y } => {
                let client = Point::new(*x, *y);
                let changed = match self.hit_at(client) {
                    Hit::Background => {
                        self.on_background_right_click(client);
                        true
                    }
                    _ => false,
                };
                EventOutcome {
                    changed,
                    prevent_default: true,
                }
            }

            InputEvent::Wheel {
                x,
                y,
                delta_y,
                modifiers,
            } => {
                let consumed = self.apply_zoom(*delta_y, Point::new(*x, *y), *modifiers);
                EventOutcome {
                    changed: consumed,
                    prevent_default: consumed,
                }
            }

            InputEvent::Key { key, modifiers } => {
                let Some(action) = ShortcutMap::resolve(
                    key,
                    modifiers.ctrl,
                    modifiers.shift,
                    modifiers.alt,
                    modifiers.meta,
                ) else {
                    return EventOutcome::IGNORED;
                };
                EventOutcome {
                    changed: self.run_shortcut(action),
                    prevent_default: true,
                }
            }
        }
    }

    fn run_shortcut(&mut self, action: ShortcutAction) -> bool {
        log::debug!("shortcut {action:?}");
        match action {
            ShortcutAction::Cancel => self.cancel(),
            ShortcutAction::ZoomIn => self.zoom_step(self.config.zoom_in_factor),
            ShortcutAction::ZoomOut => self.zoom_step(self.config.zoom_out_factor),
            ShortcutAction::ResetView => self.reset_view(),
        }
    }
}
