//! GUI drawn over the shader quad
pub mod egui_render;
pub mod overlay;

pub use egui_render::{EguiLayer, EguiLayerError};
pub use overlay::Overlay;
