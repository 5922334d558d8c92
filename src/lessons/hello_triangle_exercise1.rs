use super::hello_triangle::{ORANGE_FRAGMENT_SHADER, VERTEX_SHADER};
use super::{program_from_sources, GlProgram};
use crate::app::{Assets, Frame, Lesson};
use crate::gfx::mesh::{Mesh, VertexLayout};
use anyhow::Result;
use glow::HasContext;
use std::rc::Rc;

// two triangles side by side in one buffer
#[rustfmt::skip]
const VERTICES: [f32; 18] = [
    -1.0, -0.5, 0.0,
     0.0, -0.5, 0.0,
    -0.5,  0.5, 0.0,
     0.0, -0.5, 0.0,
     1.0, -0.5, 0.0,
     0.5,  0.5, 0.0,
];

pub struct HelloTriangleExercise1 {
    program: GlProgram,
    triangles: Mesh,
}

impl Lesson for HelloTriangleExercise1 {
    const NAME: &'static str = "hello_triangle_exercise1";

    fn setup(gl: &Rc<glow::Context>, _assets: &Assets) -> Result<Self> {
        let program = program_from_sources(gl, VERTEX_SHADER, ORANGE_FRAGMENT_SHADER)?;
        let triangles = Mesh::new(gl, &VERTICES, &VertexLayout::new(&[3]), None)?;
        Ok(Self { program, triangles })
    }

    fn render(&mut self, gl: &glow::Context, _frame: &Frame) {
        unsafe {
            gl.use_program(Some(self.program.raw()));
        }
        self.triangles.draw();
    }
}
