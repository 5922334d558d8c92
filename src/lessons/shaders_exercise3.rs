use super::{program_from_files, GlProgram};
use crate::app::{Assets, Frame, Lesson};
use crate::gfx::mesh::{Mesh, VertexLayout};
use crate::wayland::egl::GlVersion;
use anyhow::Result;
use glow::HasContext;
use std::rc::Rc;

#[rustfmt::skip]
const VERTICES: [f32; 9] = [
     0.5, -0.5, 0.0,
    -0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

/// The vertex position doubles as the fragment colour. Negative components
/// clamp to zero, which is why the bottom-left corner is black.
pub struct ShadersExercise3 {
    program: GlProgram,
    triangle: Mesh,
}

impl Lesson for ShadersExercise3 {
    const NAME: &'static str = "shaders_exercise3";
    const GL_VERSION: GlVersion = GlVersion::new(4, 6);

    fn setup(gl: &Rc<glow::Context>, assets: &Assets) -> Result<Self> {
        let program = program_from_files(gl, assets, Self::NAME)?;
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
