pub mod core;
pub mod rendering;
pub mod window;

pub use self::core::{ConfigError, ViewerConfig};
pub use rendering::RenderConfig;
pub use window::{OverlayConfig, WindowConfig};
