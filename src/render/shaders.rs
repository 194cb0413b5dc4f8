use crate::render::source::{ShaderProgramSource, ShaderStage};
use gl::types::*;
use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::ptr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
}

fn gl_shader_type(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

/// Linked vertex + fragment program
pub struct ShaderProgram {
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl ShaderProgram {
    pub fn from_source(source: &ShaderProgramSource) -> Result<Self, ShaderError> {
        let vertex_shader = Self::compile_stage(source, ShaderStage::Vertex)?;
        let fragment_shader = match Self::compile_stage(source, ShaderStage::Fragment) {
            Ok(shader) => shader,
            Err(e) => {
                unsafe { gl::DeleteShader(vertex_shader) };
                return Err(e);
            }
        };

        let program = unsafe { gl::CreateProgram() };
        unsafe {
            gl::AttachShader(program, vertex_shader);
            gl::AttachShader(program, fragment_shader);
            gl::LinkProgram(program);
            gl::ValidateProgram(program);
            gl::DeleteShader(vertex_shader);
            gl::DeleteShader(fragment_shader);
        }

        Self::check_link_status(program)
    }

    fn compile_stage(source: &ShaderProgramSource, stage: ShaderStage) -> Result<GLuint, ShaderError> {
        let c_str = CString::new(source.stage(stage).as_bytes())?;
        let shader = unsafe { gl::CreateShader(gl_shader_type(stage)) };

        unsafe {
            gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
            gl::CompileShader(shader);
        }

        let mut success = 1;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe {
                gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            }

            let mut buffer = vec![0u8; len.max(1) as usize];
            let mut written = 0;
            unsafe {
                gl::GetShaderInfoLog(
                    shader,
                    buffer.len() as GLsizei,
                    &mut written,
                    buffer.as_mut_ptr() as *mut GLchar,
                );
                gl::DeleteShader(shader);
            }

            return Err(ShaderError::Compilation {
                stage,
                log: info_log_to_string(&buffer, written),
            });
        }

        log::debug!("Compiled {} shader {}", stage, shader);
        Ok(shader)
    }

    fn check_link_status(program: GLuint) -> Result<Self, ShaderError> {
        let mut success = 1;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe {
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            }

            let mut buffer = vec![0u8; len.max(1) as usize];
            let mut written = 0;
            unsafe {
                gl::GetProgramInfoLog(
                    program,
                    buffer.len() as GLsizei,
                    &mut written,
                    buffer.as_mut_ptr() as *mut GLchar,
                );
                gl::DeleteProgram(program);
            }

            return Err(ShaderError::Linking(info_log_to_string(&buffer, written)));
        }

        Ok(ShaderProgram {
            id: program,
            uniforms: HashMap::new(),
        })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    pub fn uniform_location(&mut self, name: &str) -> GLint {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(_) => -1,
        };

        if location == -1 {
            log::warn!("Uniform '{}' not found in shader", name);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    pub fn set_uniform_1f(&mut self, name: &str, value: f32) {
        self.set_used();
        let location = self.uniform_location(name);
        unsafe {
            gl::Uniform1f(location, value);
        }
    }

    pub fn set_uniform_2f(&mut self, name: &str, value: glam::Vec2) {
        self.set_used();
        let location = self.uniform_location(name);
        unsafe {
            gl::Uniform2f(location, value.x, value.y);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

/// Trims an info log buffer to what GL reported writing.
fn info_log_to_string(buffer: &[u8], written: GLsizei) -> String {
    let end = (written.max(0) as usize).min(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_gl_types() {
        assert_eq!(gl_shader_type(ShaderStage::Vertex), gl::VERTEX_SHADER);
        assert_eq!(gl_shader_type(ShaderStage::Fragment), gl::FRAGMENT_SHADER);
    }

    #[test]
    fn test_info_log_trimmed() {
        let buffer = b"0:1(1): error: syntax error\n\0\0\0";
        assert_eq!(info_log_to_string(buffer, 28), "0:1(1): error: syntax error");
        assert_eq!(info_log_to_string(b"link error", 500), "link error");
        assert_eq!(info_log_to_string(buffer, -3), "");
    }

    #[test]
    fn test_compilation_error_names_stage() {
        let err = ShaderError::Compilation {
            stage: ShaderStage::Fragment,
            log: "bad".into(),
        };
        assert_eq!(err.to_string(), "fragment shader compilation failed: bad");
    }
}
