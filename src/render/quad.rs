use gl::types::*;

/// Floats per vertex: position (x, y) then uv (u, v).
pub const FLOATS_PER_VERTEX: usize = 4;
pub const VERTEX_COUNT: usize = 6;

/// Two triangles covering clip space.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; VERTEX_COUNT * FLOATS_PER_VERTEX] = [
    // positions   // texture coords
    -1.0, -1.0,    0.0, 0.0,
    -1.0,  1.0,    0.0, 1.0,
     1.0, -1.0,    1.0, 0.0,

     1.0, -1.0,    1.0, 0.0,
    -1.0,  1.0,    0.0, 1.0,
     1.0,  1.0,    1.0, 1.0,
];

pub struct FullscreenQuad {
    vao: GLuint,
    vbo: GLuint,
}

impl FullscreenQuad {
    pub fn new() -> Self {
        let vertices: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        let stride = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as GLsizei;

        let mut vao = 0;
        let mut vbo = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                vertices.len() as GLsizeiptr,
                vertices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            // Position attribute
            gl::VertexAttribPointer(0, 2, gl::FLOAT, gl::FALSE, stride, std::ptr::null());
            gl::EnableVertexAttribArray(0);

            // Texture coordinate attribute
            gl::VertexAttribPointer(
                1,
                2,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (2 * std::mem::size_of::<f32>()) as *const _,
            );
            gl::EnableVertexAttribArray(1);

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        log::debug!("Created fullscreen quad (vao {}, vbo {})", vao, vbo);
        Self { vao, vbo }
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawArrays(gl::TRIANGLES, 0, VERTEX_COUNT as GLsizei);
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for FullscreenQuad {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices() -> impl Iterator<Item = &'static [f32]> {
        let all: &'static [f32] = &QUAD_VERTICES;
        all.chunks_exact(FLOATS_PER_VERTEX)
    }

    #[test]
    fn test_quad_covers_clip_space() {
        let (mut min, mut max) = ([f32::MAX; 2], [f32::MIN; 2]);
        for v in vertices() {
            for axis in 0..2 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        assert_eq!(min, [-1.0, -1.0]);
        assert_eq!(max, [1.0, 1.0]);
    }

    #[test]
    fn test_uv_follows_position() {
        for v in vertices() {
            assert_eq!(v[2], (v[0] + 1.0) * 0.5);
            assert_eq!(v[3], (v[1] + 1.0) * 0.5);
        }
    }

    #[test]
    fn test_byte_layout() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), VERTEX_COUNT * FLOATS_PER_VERTEX * 4);
        assert_eq!(vertices().count(), VERTEX_COUNT);
    }
}
