use glow::HasContext;

/// Pipeline step a shader stage is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// The slice of the GL API needed to build shader programs.
///
/// Handles are opaque driver identifiers. Every call must happen on the
/// thread that owns the current context.
pub trait ShaderDriver {
    type Shader: Copy;
    type Program: Copy;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
}

impl ShaderDriver for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_shader(&self, stage: ShaderStage) -> Result<glow::Shader, String> {
        unsafe { HasContext::create_shader(self, stage.gl_enum()) }
    }

    fn shader_source(&self, shader: glow::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: glow::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: glow::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: glow::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: glow::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }
}
