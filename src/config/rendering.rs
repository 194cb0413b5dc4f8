use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub shader_path: PathBuf,
    pub time_uniform: String,
    pub resolution_uniform: String,
    /// Period in seconds after which the time uniform restarts at 0.
    pub time_wrap_secs: u32,
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shader_path: PathBuf::from("res/shaders/Main.shader"),
            time_uniform: "iTime".to_string(),
            resolution_uniform: "iResolution".to_string(),
            time_wrap_secs: 60,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
