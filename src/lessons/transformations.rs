use super::textures::QUAD_INDICES;
use super::{bind_samplers, load_texture, program_from_files, GlProgram};
use crate::app::{Assets, Frame, Lesson};
use crate::gfx::math::Mat4;
use crate::gfx::mesh::{Mesh, VertexLayout};
use crate::gfx::texture::{Texture, TextureParams};
use crate::wayland::egl::GlVersion;
use anyhow::Result;
use glow::HasContext;
use std::rc::Rc;

// texture v runs top-down so images load unflipped
#[rustfmt::skip]
const VERTICES: [f32; 20] = [
    // positions        // texture coords
     0.5,  0.5, 0.0,    1.0, 0.0,
     0.5, -0.5, 0.0,    1.0, 1.0,
    -0.5, -0.5, 0.0,    0.0, 1.0,
    -0.5,  0.5, 0.0,    0.0, 0.0,
];

/// Model matrix for a quad parked in the bottom-right quadrant and spun
/// about z by `time` radians.
pub fn spin_transform(time: f32) -> Mat4 {
    Mat4::IDENTITY
        .translate([0.5, -0.5, 0.0])
        .rotate(time, [0.0, 0.0, 1.0])
}

pub struct Transformations {
    program: GlProgram,
    quad: Mesh,
    container: Texture,
    face: Texture,
    transform: Option<glow::UniformLocation>,
}

impl Lesson for Transformations {
    const NAME: &'static str = "transformations";
    const GL_VERSION: GlVersion = GlVersion::new(4, 6);

    fn setup(gl: &Rc<glow::Context>, assets: &Assets) -> Result<Self> {
        let program = program_from_files(gl, assets, Self::NAME)?;
        let quad = Mesh::new(gl, &VERTICES, &VertexLayout::new(&[3, 2]), Some(&QUAD_INDICES[..]))?;

        let container = load_texture(gl, assets, "container.jpg", TextureParams::default())?;
        let face = load_texture(gl, assets, "awesomeface.png", TextureParams::default())?;

        let transform = unsafe { gl.get_uniform_location(program.raw(), "transform") };
        bind_samplers(gl, &program, &[("texture1", 0), ("texture2", 1)]);

        Ok(Self {
            program,
            quad,
            container,
            face,
            transform,
        })
    }

    fn render(&mut self, gl: &glow::Context, frame: &Frame) {
        let transform = spin_transform(frame.time);

        self.container.bind(0);
        self.face.bind(1);
        unsafe {
            gl.use_program(Some(self.program.raw()));
            gl.uniform_matrix_4_f32_slice(self.transform.as_ref(), false, transform.as_slice());
        }
        self.quad.draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn quad_centre_sits_in_bottom_right() {
        for time in [0.0, 1.0, 2.5] {
            let centre = spin_transform(time).transform_point([0.0, 0.0, 0.0]);
            assert!(close(centre, [0.5, -0.5, 0.0]));
        }
    }

    #[test]
    fn corner_rotates_about_the_quad_centre() {
        let half_turn = spin_transform(std::f32::consts::PI);
        let corner = half_turn.transform_point([0.5, 0.5, 0.0]);
        assert!(close(corner, [0.0, -1.0, 0.0]));
    }

    #[test]
    fn at_time_zero_only_translates() {
        let corner = spin_transform(0.0).transform_point([-0.5, 0.5, 0.0]);
        assert!(close(corner, [0.0, 0.0, 0.0]));
    }
}
