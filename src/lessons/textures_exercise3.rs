use super::textures::QUAD_INDICES;
use super::{bind_samplers, load_texture, program_from_files, GlProgram};
use crate::app::{Assets, Frame, Lesson};
use crate::gfx::mesh::{Mesh, VertexLayout};
use crate::gfx::texture::{Filter, Texture, TextureParams, Wrap};
use crate::wayland::egl::GlVersion;
use anyhow::Result;
use glow::HasContext;
use std::rc::Rc;

// only the middle tenth of each texture is shown, so texels are large
#[rustfmt::skip]
const VERTICES: [f32; 32] = [
    // positions        // colors         // texture coords
     0.5,  0.5, 0.0,    1.0, 0.0, 0.0,    0.55, 0.55,
     0.5, -0.5, 0.0,    0.0, 1.0, 0.0,    0.55, 0.45,
    -0.5, -0.5, 0.0,    0.0, 0.0, 1.0,    0.45, 0.45,
    -0.5,  0.5, 0.0,    1.0, 1.0, 0.0,    0.45, 0.55,
];

/// Two textures blended on a zoomed quad with nearest-neighbour sampling.
pub struct TexturesExercise3 {
    program: GlProgram,
    quad: Mesh,
    container: Texture,
    face: Texture,
}

impl Lesson for TexturesExercise3 {
    const NAME: &'static str = "textures_exercise3";
    const GL_VERSION: GlVersion = GlVersion::new(4, 6);

    fn setup(gl: &Rc<glow::Context>, assets: &Assets) -> Result<Self> {
        let program = program_from_files(gl, assets, Self::NAME)?;
        let quad = Mesh::new(
            gl,
            &VERTICES,
            &VertexLayout::new(&[3, 3, 2]),
            Some(&QUAD_INDICES[..]),
        )?;

        let nearest = TextureParams {
            wrap: Wrap::Repeat,
            min_filter: Filter::Nearest,
            mag_filter: Filter::Nearest,
            flip_vertically: true,
        };
        let container = load_texture(
            gl,
            assets,
            "container.jpg",
            TextureParams {
                wrap: Wrap::ClampToEdge,
                ..nearest
            },
        )?;
        let face = load_texture(gl, assets, "awesomeface.png", nearest)?;

        bind_samplers(gl, &program, &[("texture1", 0), ("texture2", 1)]);

        Ok(Self {
            program,
            quad,
            container,
            face,
        })
    }

    fn render(&mut self, gl: &glow::Context, _frame: &Frame) {
        self.container.bind(0);
        self.face.bind(1);
        unsafe {
            gl.use_program(Some(self.program.raw()));
        }
        self.quad.draw();
    }
}
