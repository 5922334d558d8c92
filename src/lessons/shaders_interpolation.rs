use super::{program_from_sources, GlProgram};
use crate::app::{Assets, Frame, Lesson};
use crate::gfx::mesh::{Mesh, VertexLayout};
use crate::wayland::egl::GlVersion;
use anyhow::Result;
use glow::HasContext;
use std::rc::Rc;

const VERTEX_SHADER: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;
out vec3 ourColor;
void main() {
    gl_Position = vec4(aPos, 1.0);
    ourColor = aColor;
}
";

const FRAGMENT_SHADER: &str = "#version 330 core
out vec4 FragColor;
in vec3 ourColor;
void main() {
    FragColor = vec4(ourColor, 1.0);
}
";

#[rustfmt::skip]
pub const COLORED_TRIANGLE: [f32; 18] = [
    // positions       // colors
     0.5, -0.5, 0.0,   1.0, 0.0, 0.0,
    -0.5, -0.5, 0.0,   0.0, 1.0, 0.0,
     0.0,  0.5, 0.0,   0.0, 0.0, 1.0,
];

/// Per-vertex colours blended across the triangle by the rasterizer.
pub struct ShadersInterpolation {
    program: GlProgram,
    triangle: Mesh,
}

impl Lesson for ShadersInterpolation {
    const NAME: &'static str = "shaders_interpolation";
    const GL_VERSION: GlVersion = GlVersion::new(4, 6);

    fn setup(gl: &Rc<glow::Context>, _assets: &Assets) -> Result<Self> {
        let program = program_from_sources(gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let triangle = Mesh::new(gl, &COLORED_TRIANGLE, &VertexLayout::new(&[3, 3]), None)?;
        Ok(Self { program, triangle })
    }

    fn render(&mut self, gl: &glow::Context, _frame: &Frame) {
        unsafe {
            gl.use_program(Some(self.program.raw()));
        }
        self.triangle.draw();
    }
}
