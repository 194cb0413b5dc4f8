pub mod quad;
pub mod shaders;
pub mod source;

pub use quad::FullscreenQuad;
pub use shaders::{ShaderError, ShaderProgram};
pub use source::{ShaderProgramSource, ShaderSourceError, ShaderStage};
