pub mod config;
pub mod render;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::core::ViewerConfig;
pub use render::quad::FullscreenQuad;
pub use render::shaders::{ShaderError, ShaderProgram};
pub use render::source::{ShaderProgramSource, ShaderSourceError, ShaderStage};
pub use ui::overlay::Overlay;
pub use utils::timing::FrameContext;
