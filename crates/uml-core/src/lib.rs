pub mod config;
pub mod id;
pub mod label;
pub mod model;
pub mod viewport;

pub use config::CanvasConfig;
pub use id::ElementId;
pub use model::*;
pub use viewport::{Surface, Viewport};
