pub mod timing;

pub use timing::{shader_time, FrameContext};
