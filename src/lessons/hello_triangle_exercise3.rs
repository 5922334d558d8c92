use super::hello_triangle::{ORANGE_FRAGMENT_SHADER, VERTEX_SHADER};
use super::GlProgram;
use crate::app::{Assets, Frame, Lesson};
use crate::gfx::gl::ShaderStage;
use crate::gfx::mesh::{Mesh, VertexLayout};
use crate::gfx::shader::{Program, Shader};
use anyhow::Result;
use glow::HasContext;
use std::rc::Rc;

const YELLOW_FRAGMENT_SHADER: &str = "#version 330 core
out vec4 FragColor;
void main() {
    FragColor = vec4(1.0, 1.0, 0.0, 1.0);
}
";

#[rustfmt::skip]
const LEFT: [f32; 9] = [
    -1.0, -0.5, 0.0,
     0.0, -0.5, 0.0,
    -0.5,  0.5, 0.0,
];

#[rustfmt::skip]
const RIGHT: [f32; 9] = [
    0.0, -0.5, 0.0,
    1.0, -0.5, 0.0,
    0.5,  0.5, 0.0,
];

/// Two triangles with their own vertex arrays, drawn by two programs that
/// share one compiled vertex stage.
pub struct HelloTriangleExercise3 {
    orange: GlProgram,
    yellow: GlProgram,
    left: Mesh,
    right: Mesh,
}

impl Lesson for HelloTriangleExercise3 {
    const NAME: &'static str = "hello_triangle_exercise3";

    fn setup(gl: &Rc<glow::Context>, _assets: &Assets) -> Result<Self> {
        let vertex = Shader::new(gl, ShaderStage::Vertex)?;
        vertex.compile_source("vertex", VERTEX_SHADER);

        let orange_fragment = Shader::new(gl, ShaderStage::Fragment)?;
        orange_fragment.compile_source("fragment 1", ORANGE_FRAGMENT_SHADER);
        let yellow_fragment = Shader::new(gl, ShaderStage::Fragment)?;
        yellow_fragment.compile_source("fragment 2", YELLOW_FRAGMENT_SHADER);

        let orange = Program::new(gl)?;
        orange.attach(&vertex);
        orange.attach(&orange_fragment);
        orange.link();

        let yellow = Program::new(gl)?;
        yellow.attach(&vertex);
        yellow.attach(&yellow_fragment);
        yellow.link();

        let layout = VertexLayout::new(&[3]);
        let left = Mesh::new(gl, &LEFT, &layout, None)?;
        let right = Mesh::new(gl, &RIGHT, &layout, None)?;

        // stages are deleted here; the linked programs keep their binaries
        Ok(Self {
            orange,
            yellow,
            left,
            right,
        })
    }

    fn render(&mut self, gl: &glow::Context, _frame: &Frame) {
        unsafe {
            gl.use_program(Some(self.orange.raw()));
        }
        self.left.draw();

        unsafe {
            gl.use_program(Some(self.yellow.raw()));
        }
        self.right.draw();
    }
}
