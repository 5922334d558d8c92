use super::{program_from_sources, GlProgram};
use crate::app::{Assets, Frame, Lesson};
use crate::gfx::mesh::{Mesh, VertexLayout};
use anyhow::Result;
use glow::HasContext;
use std::rc::Rc;

pub const VERTEX_SHADER: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
void main() {
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
";

pub const ORANGE_FRAGMENT_SHADER: &str = "#version 330 core
out vec4 FragColor;
void main() {
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
";

#[rustfmt::skip]
const VERTICES: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

pub struct HelloTriangle {
    program: GlProgram,
    triangle: Mesh,
}

impl Lesson for HelloTriangle {
    const NAME: &'static str = "hello_triangle";

    fn setup(gl: &Rc<glow::Context>, _assets: &Assets) -> Result<Self> {
        let program = program_from_sources(gl, VERTEX_SHADER, ORANGE_FRAGMENT_SHADER)?;
        let triangle = Mesh::new(gl, &VERTICES, &VertexLayout::new(&[3]), None)?;
        Ok(Self { program, triangle })
    }

    fn render(&mut self, gl: &glow::Context, _frame: &Frame) {
        unsafe {
            gl.use_program(Some(self.program.raw()));
        }
        self.triangle.draw();
    }
}
