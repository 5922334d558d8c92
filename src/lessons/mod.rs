pub mod hello_triangle;
pub mod hello_triangle_exercise1;
pub mod hello_triangle_exercise3;
pub mod hello_window_clear;
pub mod shaders_exercise2;
pub mod shaders_exercise3;
pub mod shaders_interpolation;
pub mod textures;
pub mod textures_exercise3;
pub mod transformations;

use crate::app::Assets;
use crate::gfx::gl::ShaderStage;
use crate::gfx::shader::{build_program, Program, SourceRef};
use crate::gfx::texture::{Texture, TextureParams, TextureStatus};
use anyhow::Result;
use glow::HasContext;
use log::warn;
use std::rc::Rc;

pub type GlProgram = Program<glow::Context>;

/// Builds a program from embedded vertex and fragment sources.
pub fn program_from_sources(gl: &Rc<glow::Context>, vertex: &str, fragment: &str) -> Result<GlProgram> {
    let (program, _report) = build_program(
        gl,
        &[
            (ShaderStage::Vertex, SourceRef::inline("vertex", vertex)),
            (ShaderStage::Fragment, SourceRef::inline("fragment", fragment)),
        ],
    )?;
    Ok(program)
}

/// Builds a program from `shaders/<lesson>/vertex.glsl` and `fragment.glsl`.
pub fn program_from_files(gl: &Rc<glow::Context>, assets: &Assets, lesson: &str) -> Result<GlProgram> {
    let vertex = assets.shader(lesson, "vertex.glsl");
    let fragment = assets.shader(lesson, "fragment.glsl");
    let (program, _report) = build_program(
        gl,
        &[
            (ShaderStage::Vertex, SourceRef::file(&vertex)),
            (ShaderStage::Fragment, SourceRef::file(&fragment)),
        ],
    )?;
    Ok(program)
}

/// Loads `textures/<file>`. A texture that failed to decode stays bound
/// without storage and samples as black.
pub fn load_texture(gl: &Rc<glow::Context>, assets: &Assets, file: &str, params: TextureParams) -> Result<Texture> {
    let texture = Texture::load(gl, assets.texture(file), params)?;
    if let TextureStatus::Failed(_) = texture.status() {
        warn!("Drawing without {}", file);
    }
    Ok(texture)
}

/// Points each named sampler uniform at its texture unit.
pub fn bind_samplers(gl: &glow::Context, program: &GlProgram, samplers: &[(&str, i32)]) {
    unsafe {
        gl.use_program(Some(program.raw()));
        for &(name, unit) in samplers {
            let location = gl.get_uniform_location(program.raw(), name);
            gl.uniform_1_i32(location.as_ref(), unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::shader::fake::FakeDriver;
    use crate::gfx::texture::{decode, PixelFormat};
    use std::path::Path;

    const FILE_LESSONS: [&str; 5] = [
        "shaders_exercise2",
        "shaders_exercise3",
        "textures",
        "textures_exercise3",
        "transformations",
    ];

    fn assets() -> Assets {
        Assets::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"))
    }

    fn build(vertex: SourceRef, fragment: SourceRef) -> bool {
        let driver = Rc::new(FakeDriver::default());
        let (_program, report) = build_program(
            &driver,
            &[(ShaderStage::Vertex, vertex), (ShaderStage::Fragment, fragment)],
        )
        .unwrap();
        report.is_usable()
    }

    #[test]
    fn shipped_shader_files_link() {
        let assets = assets();
        for lesson in FILE_LESSONS {
            let vertex = assets.shader(lesson, "vertex.glsl");
            let fragment = assets.shader(lesson, "fragment.glsl");
            assert!(
                build(SourceRef::file(&vertex), SourceRef::file(&fragment)),
                "{} shaders did not link",
                lesson
            );
        }
    }

    #[test]
    fn embedded_shaders_link() {
        use hello_triangle::{ORANGE_FRAGMENT_SHADER, VERTEX_SHADER};

        assert!(build(
            SourceRef::inline("vertex", VERTEX_SHADER),
            SourceRef::inline("fragment", ORANGE_FRAGMENT_SHADER),
        ));
    }

    #[test]
    fn shipped_textures_decode() {
        let assets = assets();

        let container = decode(assets.texture("container.jpg"), false).unwrap();
        assert_eq!(container.format, PixelFormat::Rgb);
        assert_eq!(container.pixels.len(), (container.width * container.height * 3) as usize);

        let face = decode(assets.texture("awesomeface.png"), true).unwrap();
        assert_eq!(face.format, PixelFormat::Rgba);
        assert_eq!(face.pixels.len(), (face.width * face.height * 4) as usize);
    }
}
