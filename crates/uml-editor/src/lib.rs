//! Editing engine for the class canvas: the controller that owns the
//! diagram and view, gesture state, the class creation form, input
//! normalization and keyboard shortcuts.

pub mod controller;
pub mod error;
pub mod form;
pub mod gesture;
pub mod input;
pub mod shortcuts;

pub use controller::{CanvasController, CanvasMutation, ContextMenu, EventOutcome, HandleClick};
pub use error::EditError;
pub use form::{ClassForm, FieldEdit, MethodEdit};
pub use gesture::{Interaction, PendingConnection};
pub use input::{InputEvent, Modifiers, PointerButton};
pub use shortcuts::{ShortcutAction, ShortcutMap};
