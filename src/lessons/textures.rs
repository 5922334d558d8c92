use super::{bind_samplers, load_texture, program_from_files, GlProgram};
use crate::app::{Assets, Frame, Lesson};
use crate::gfx::mesh::{Mesh, VertexLayout};
use crate::gfx::texture::{Texture, TextureParams};
use crate::wayland::egl::GlVersion;
use anyhow::Result;
use glow::HasContext;
use std::rc::Rc;

#[rustfmt::skip]
const VERTICES: [f32; 32] = [
    // positions        // colors         // texture coords
     0.5,  0.5, 0.0,    1.0, 0.0, 0.0,    1.0, 1.0,
     0.5, -0.5, 0.0,    0.0, 1.0, 0.0,    1.0, 0.0,
    -0.5, -0.5, 0.0,    0.0, 0.0, 1.0,    0.0, 0.0,
    -0.5,  0.5, 0.0,    1.0, 1.0, 0.0,    0.0, 1.0,
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// A textured quad tinted by its vertex colours.
pub struct Textures {
    program: GlProgram,
    quad: Mesh,
    container: Texture,
}

impl Lesson for Textures {
    const NAME: &'static str = "textures";
    const GL_VERSION: GlVersion = GlVersion::new(4, 6);

    fn setup(gl: &Rc<glow::Context>, assets: &Assets) -> Result<Self> {
        let program = program_from_files(gl, assets, Self::NAME)?;
        let quad = Mesh::new(
            gl,
            &VERTICES,
            &VertexLayout::new(&[3, 3, 2]),
            Some(&QUAD_INDICES[..]),
        )?;
        let container = load_texture(gl, assets, "container.jpg", TextureParams::default())?;

        bind_samplers(gl, &program, &[("ourTexture", 0)]);

        Ok(Self {
            program,
            quad,
            container,
        })
    }

    fn render(&mut self, gl: &glow::Context, _frame: &Frame) {
        self.container.bind(0);
        unsafe {
            gl.use_program(Some(self.program.raw()));
        }
        self.quad.draw();
    }
}
