use super::shaders_interpolation::COLORED_TRIANGLE;
use super::{program_from_files, GlProgram};
use crate::app::{Assets, Frame, Lesson};
use crate::gfx::anim::{sine_swing, PeriodicTimer};
use crate::gfx::mesh::{Mesh, VertexLayout};
use crate::wayland::egl::GlVersion;
use anyhow::Result;
use glow::HasContext;
use std::rc::Rc;

/// The interpolated triangle swinging left and right through an `xOffset`
/// uniform, one full swing every two seconds.
pub struct ShadersExercise2 {
    program: GlProgram,
    triangle: Mesh,
    x_offset: Option<glow::UniformLocation>,
    timer: PeriodicTimer,
}

impl Lesson for ShadersExercise2 {
    const NAME: &'static str = "shaders_exercise2";
    const GL_VERSION: GlVersion = GlVersion::new(4, 6);

    fn setup(gl: &Rc<glow::Context>, assets: &Assets) -> Result<Self> {
        let program = program_from_files(gl, assets, Self::NAME)?;
        let x_offset = unsafe { gl.get_uniform_location(program.raw(), "xOffset") };
        let triangle = Mesh::new(gl, &COLORED_TRIANGLE, &VertexLayout::new(&[3, 3]), None)?;

        Ok(Self {
            program,
            triangle,
            x_offset,
            timer: PeriodicTimer::new(2.0),
        })
    }

    fn render(&mut self, gl: &glow::Context, frame: &Frame) {
        self.timer.update(frame.dt);

        unsafe {
            gl.use_program(Some(self.program.raw()));
            gl.uniform_1_f32(self.x_offset.as_ref(), sine_swing(self.timer.elapsed));
        }
        self.triangle.draw();
    }
}
