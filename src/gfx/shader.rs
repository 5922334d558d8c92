use super::gl::{ShaderDriver, ShaderStage};
use anyhow::{anyhow, Result};
use log::{debug, error, warn};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Longest driver log kept in a [`Diagnostic`], in bytes.
pub const MAX_DIAGNOSTIC_LEN: usize = 511;

/// Full contents of a shader file, kept with a trailing nul so it can be
/// handed to C-style APIs unchanged. The bytes are not required to be UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    bytes: Vec<u8>,
}

impl ShaderSource {
    fn new(mut bytes: Vec<u8>) -> Self {
        bytes.push(0);
        Self { bytes }
    }

    /// The file contents without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// The contents as text; invalid UTF-8 sequences become U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads a whole shader file. Returns `None` when the file cannot be opened
/// or read; partial contents are never returned.
pub fn read_source(path: impl AsRef<Path>) -> Option<ShaderSource> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => Some(ShaderSource::new(bytes)),
        Err(e) => {
            debug!("Reading {} failed: {}", path.display(), e);
            None
        }
    }
}

/// Compiler or linker output, capped at [`MAX_DIAGNOSTIC_LEN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic(String);

impl Diagnostic {
    pub fn from_log(log: &str) -> Self {
        let log = log.trim_end_matches('\0');
        let mut end = log.len().min(MAX_DIAGNOSTIC_LEN);
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        Self(log[..end].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.trim_end())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileStatus {
    Compiled,
    Failed(Diagnostic),
    /// The source file could not be read; nothing was submitted.
    Unreadable(PathBuf),
}

impl CompileStatus {
    pub fn is_compiled(&self) -> bool {
        matches!(self, CompileStatus::Compiled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Linked,
    Failed(Diagnostic),
}

impl LinkStatus {
    pub fn is_linked(&self) -> bool {
        matches!(self, LinkStatus::Linked)
    }
}

/// Compiles `source` into an already created shader and logs any failure
/// under `label`.
pub fn compile_source<D: ShaderDriver>(
    driver: &D,
    shader: D::Shader,
    label: &str,
    source: &str,
) -> CompileStatus {
    driver.shader_source(shader, source);
    driver.compile_shader(shader);

    if driver.shader_compile_status(shader) {
        return CompileStatus::Compiled;
    }

    let diagnostic = Diagnostic::from_log(&driver.shader_info_log(shader));
    error!("Shader \"{}\" compilation failed! Error: {}", label, diagnostic);
    CompileStatus::Failed(diagnostic)
}

/// Loads `path` and compiles it into `shader`. An unreadable file is logged
/// and leaves the shader untouched.
pub fn compile_file<D: ShaderDriver>(
    driver: &D,
    shader: D::Shader,
    path: impl AsRef<Path>,
) -> CompileStatus {
    let path = path.as_ref();
    let Some(source) = read_source(path) else {
        error!("Could not read shader file \"{}\"", path.display());
        return CompileStatus::Unreadable(path.to_path_buf());
    };

    compile_source(driver, shader, &path.display().to_string(), &source.text())
}

/// Links a program whose stages are already attached and logs any failure.
pub fn link<D: ShaderDriver>(driver: &D, program: D::Program) -> LinkStatus {
    driver.link_program(program);

    if driver.program_link_status(program) {
        return LinkStatus::Linked;
    }

    let diagnostic = Diagnostic::from_log(&driver.program_info_log(program));
    error!("Program linking failed! Error: {}", diagnostic);
    LinkStatus::Failed(diagnostic)
}

/// A shader stage object, deleted when dropped.
pub struct Shader<D: ShaderDriver> {
    driver: Rc<D>,
    raw: D::Shader,
    stage: ShaderStage,
}

impl<D: ShaderDriver> Shader<D> {
    pub fn new(driver: &Rc<D>, stage: ShaderStage) -> Result<Self> {
        let raw = driver
            .create_shader(stage)
            .map_err(|e| anyhow!("Failed to create {} shader: {}", stage.name(), e))?;

        Ok(Self {
            driver: Rc::clone(driver),
            raw,
            stage,
        })
    }

    pub fn raw(&self) -> D::Shader {
        self.raw
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn compile_file(&self, path: impl AsRef<Path>) -> CompileStatus {
        compile_file(&*self.driver, self.raw, path)
    }

    pub fn compile_source(&self, label: &str, source: &str) -> CompileStatus {
        compile_source(&*self.driver, self.raw, label, source)
    }
}

impl<D: ShaderDriver> Drop for Shader<D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.raw);
    }
}

/// A program object, deleted when dropped.
///
/// Holding a `Program` does not mean it linked; check the [`LinkStatus`]
/// returned by [`Program::link`] or the [`BuildReport`].
pub struct Program<D: ShaderDriver> {
    driver: Rc<D>,
    raw: D::Program,
}

impl<D: ShaderDriver> Program<D> {
    pub fn new(driver: &Rc<D>) -> Result<Self> {
        let raw = driver
            .create_program()
            .map_err(|e| anyhow!("Failed to create program: {}", e))?;

        Ok(Self {
            driver: Rc::clone(driver),
            raw,
        })
    }

    pub fn raw(&self) -> D::Program {
        self.raw
    }

    pub fn attach(&self, shader: &Shader<D>) {
        self.driver.attach_shader(self.raw, shader.raw);
    }

    pub fn detach(&self, shader: &Shader<D>) {
        self.driver.detach_shader(self.raw, shader.raw);
    }

    pub fn link(&self) -> LinkStatus {
        link(&*self.driver, self.raw)
    }

    pub fn is_linked(&self) -> bool {
        self.driver.program_link_status(self.raw)
    }
}

impl<D: ShaderDriver> Drop for Program<D> {
    fn drop(&mut self) {
        self.driver.delete_program(self.raw);
    }
}

/// Where a stage's source text comes from.
#[derive(Debug, Clone, Copy)]
pub enum SourceRef<'a> {
    File(&'a Path),
    Inline { label: &'a str, text: &'a str },
}

impl<'a> SourceRef<'a> {
    pub fn file(path: &'a Path) -> Self {
        SourceRef::File(path)
    }

    pub fn inline(label: &'a str, text: &'a str) -> Self {
        SourceRef::Inline { label, text }
    }
}

/// Outcome of every step of [`build_program`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub stages: Vec<(ShaderStage, CompileStatus)>,
    pub link: LinkStatus,
}

impl BuildReport {
    pub fn is_usable(&self) -> bool {
        self.link.is_linked() && self.stages.iter().all(|(_, status)| status.is_compiled())
    }
}

/// Creates, compiles and links a program from the given stages.
///
/// Only a driver refusing to create an object is an error. Compile and link
/// failures are logged, recorded in the report, and the program is returned
/// anyway. Stage objects are released before returning on every path.
pub fn build_program<D: ShaderDriver>(
    driver: &Rc<D>,
    stages: &[(ShaderStage, SourceRef<'_>)],
) -> Result<(Program<D>, BuildReport)> {
    let mut shaders = Vec::with_capacity(stages.len());
    let mut statuses = Vec::with_capacity(stages.len());

    for &(stage, source) in stages {
        let shader = Shader::new(driver, stage)?;
        let status = match source {
            SourceRef::File(path) => shader.compile_file(path),
            SourceRef::Inline { label, text } => shader.compile_source(label, text),
        };
        statuses.push((stage, status));
        shaders.push(shader);
    }

    let program = Program::new(driver)?;
    for shader in &shaders {
        program.attach(shader);
    }
    let link = program.link();
    for shader in &shaders {
        program.detach(shader);
    }

    let report = BuildReport {
        stages: statuses,
        link,
    };
    if !report.is_usable() {
        warn!("Shader program is not usable; draws with it will produce nothing");
    }

    Ok((program, report))
}


#[cfg(test)]
mod tests {
    use super::fake::FakeDriver;
    use super::*;
    use std::io::Write;

    const TRIANGLE_VERT: &str = "#version 330 core\n\
        layout (location = 0) in vec3 aPos;\n\
        out vec3 ourColor;\n\
        void main() {\n\
        gl_Position = vec4(aPos, 1.0);\n\
        ourColor = aPos;\n\
        }\n";

    const TRIANGLE_FRAG: &str = "#version 330 core\n\
        out vec4 FragColor;\n\
        in vec3 ourColor;\n\
        void main() {\n\
        FragColor = vec4(ourColor, 1.0);\n\
        }\n";

    const MISMATCHED_FRAG: &str = "#version 330 core\n\
        out vec4 FragColor;\n\
        in vec3 vertexColor;\n\
        void main() {\n\
        FragColor = vec4(vertexColor, 1.0);\n\
        }\n";

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_source(dir.path().join("nope.glsl")).is_none());
    }

    #[test]
    fn empty_file_reads_as_terminator_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.glsl", b"");

        let source = read_source(&path).unwrap();
        assert!(source.is_empty());
        assert_eq!(source.text(), "");
        assert_eq!(source.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn file_contents_are_kept_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "vertex.glsl", TRIANGLE_VERT.as_bytes());

        let source = read_source(&path).unwrap();
        assert_eq!(source.text(), TRIANGLE_VERT);
        assert_eq!(source.len(), TRIANGLE_VERT.len());

        let bytes = source.as_bytes_with_nul();
        assert_eq!(&bytes[..bytes.len() - 1], fs::read(&path).unwrap().as_slice());
        assert_eq!(bytes.last(), Some(&0));
    }

    #[test]
    fn non_utf8_file_is_still_read() {
        let dir = tempfile::tempdir().unwrap();
        let contents = b"#version 330 core\n// caf\xe9\nvoid main() {}\n";
        let path = write_file(&dir, "latin1.glsl", contents);

        let source = read_source(&path).unwrap();
        assert_eq!(source.as_bytes(), &contents[..]);
        assert_eq!(source.as_bytes_with_nul().last(), Some(&0));
        assert!(source.text().contains("caf\u{FFFD}"));
    }

    #[test]
    fn non_utf8_file_compiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "latin1.vert",
            b"#version 330 core\n// caf\xe9\nvoid main() {\ngl_Position = vec4(0.0);\n}\n",
        );

        let driver = Rc::new(FakeDriver::default());
        let shader = Shader::new(&driver, ShaderStage::Vertex).unwrap();
        assert_eq!(shader.compile_file(&path), CompileStatus::Compiled);
    }

    #[test]
    fn diagnostic_is_capped() {
        let long = "x".repeat(2000);
        assert_eq!(Diagnostic::from_log(&long).as_str().len(), MAX_DIAGNOSTIC_LEN);

        let short = Diagnostic::from_log("bad token\0");
        assert_eq!(short.as_str(), "bad token");
    }

    #[test]
    fn diagnostic_cap_respects_char_boundaries() {
        let log = format!("{}é", "a".repeat(MAX_DIAGNOSTIC_LEN - 1));
        let diagnostic = Diagnostic::from_log(&log);
        assert_eq!(diagnostic.as_str().len(), MAX_DIAGNOSTIC_LEN - 1);
    }

    #[test]
    fn invalid_source_fails_with_capped_diagnostic() {
        let driver = Rc::new(FakeDriver::default());
        let shader = Shader::new(&driver, ShaderStage::Vertex).unwrap();

        let status = shader.compile_source("broken", "#version 330 core\nvoid main() {");
        let CompileStatus::Failed(diagnostic) = status else {
            panic!("expected failure, got {:?}", status);
        };
        assert!(!diagnostic.is_empty());
        assert!(diagnostic.as_str().len() <= MAX_DIAGNOSTIC_LEN);
        assert!(!driver.shader_compile_status(shader.raw()));
    }

    #[test]
    fn valid_source_compiles_without_diagnostic() {
        let driver = Rc::new(FakeDriver::default());
        let shader = Shader::new(&driver, ShaderStage::Fragment).unwrap();

        assert_eq!(shader.compile_source("frag", TRIANGLE_FRAG), CompileStatus::Compiled);
        assert!(driver.shader_compile_status(shader.raw()));
        assert!(driver.shader_info_log(shader.raw()).is_empty());
    }

    #[test]
    fn unreadable_file_submits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("vertex.glsl");
        let driver = Rc::new(FakeDriver::default());
        let shader = Shader::new(&driver, ShaderStage::Vertex).unwrap();

        assert_eq!(shader.compile_file(&missing), CompileStatus::Unreadable(missing.clone()));
        let state = driver.state.borrow();
        let fake = &state.shaders[&shader.raw()];
        assert!(fake.source.is_none());
        assert!(!fake.compiled);
    }

    #[test]
    fn compatible_stages_link() {
        let driver = Rc::new(FakeDriver::default());
        let (_program, report) = build_program(
            &driver,
            &[
                (ShaderStage::Vertex, SourceRef::inline("vert", TRIANGLE_VERT)),
                (ShaderStage::Fragment, SourceRef::inline("frag", TRIANGLE_FRAG)),
            ],
        )
        .unwrap();

        assert_eq!(report.link, LinkStatus::Linked);
        assert!(report.is_usable());
    }

    #[test]
    fn mismatched_interface_fails_to_link_but_returns() {
        let driver = Rc::new(FakeDriver::default());
        let (program, report) = build_program(
            &driver,
            &[
                (ShaderStage::Vertex, SourceRef::inline("vert", TRIANGLE_VERT)),
                (ShaderStage::Fragment, SourceRef::inline("frag", MISMATCHED_FRAG)),
            ],
        )
        .unwrap();

        let LinkStatus::Failed(diagnostic) = &report.link else {
            panic!("expected link failure");
        };
        assert!(diagnostic.as_str().contains("vertexColor"));
        assert!(report.stages.iter().all(|(_, s)| s.is_compiled()));
        assert!(!report.is_usable());
        assert!(!program.is_linked());
    }

    #[test]
    fn triangle_files_build_a_usable_program() {
        let dir = tempfile::tempdir().unwrap();
        let vert = write_file(&dir, "vertex.glsl", TRIANGLE_VERT.as_bytes());
        let frag = write_file(&dir, "fragment.glsl", TRIANGLE_FRAG.as_bytes());
        let driver = Rc::new(FakeDriver::default());

        let (program, report) = build_program(
            &driver,
            &[
                (ShaderStage::Vertex, SourceRef::file(&vert)),
                (ShaderStage::Fragment, SourceRef::file(&frag)),
            ],
        )
        .unwrap();

        assert!(report.is_usable());
        assert_ne!(program.raw(), 0);
        for (_, status) in &report.stages {
            assert_eq!(status, &CompileStatus::Compiled);
        }

        let state = driver.state.borrow();
        assert_eq!(state.deleted_shaders.len(), 2);
        assert!(state.programs[&program.raw()].attached.is_empty());
    }

    #[test]
    fn objects_are_released_on_every_path() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Rc::new(FakeDriver::default());

        let raw = {
            let (program, report) = build_program(
                &driver,
                &[
                    (ShaderStage::Vertex, SourceRef::file(&dir.path().join("missing.glsl"))),
                    (ShaderStage::Fragment, SourceRef::inline("frag", "not glsl")),
                ],
            )
            .unwrap();

            assert!(matches!(report.stages[0].1, CompileStatus::Unreadable(_)));
            assert!(matches!(report.stages[1].1, CompileStatus::Failed(_)));
            assert!(!report.link.is_linked());
            program.raw()
        };

        let state = driver.state.borrow();
        assert_eq!(state.deleted_shaders.len(), 2);
        assert_eq!(state.deleted_programs, vec![raw]);
    }
}
