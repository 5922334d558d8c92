use crate::config::Config;
use crate::wayland::egl::GlVersion;
use crate::window::Window;
use anyhow::Result;
use glow::HasContext;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

/// Locates files under the configured asset directory.
#[derive(Debug, Clone)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/shaders/<lesson>/<file>`
    pub fn shader(&self, lesson: &str, file: &str) -> PathBuf {
        self.root.join("shaders").join(lesson).join(file)
    }

    /// `<root>/textures/<file>`
    pub fn texture(&self, file: &str) -> PathBuf {
        self.root.join("textures").join(file)
    }
}

/// Timing for the frame being drawn.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Seconds since the loop started.
    pub time: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
}

/// One tutorial program: builds its GL objects once, then draws every frame.
pub trait Lesson: Sized {
    /// Directory name under `shaders/`, also used in logs.
    const NAME: &'static str;
    const GL_VERSION: GlVersion = GlVersion::new(3, 3);

    fn setup(gl: &Rc<glow::Context>, assets: &Assets) -> Result<Self>;

    /// Called after the screen has been cleared.
    fn render(&mut self, gl: &glow::Context, frame: &Frame);
}

/// Exit code for startup failures.
pub const EXIT_STARTUP_FAILURE: i32 = -1;

/// Why a lesson stopped before the window was closed.
#[derive(Debug)]
pub enum RunError {
    /// Window, context or lesson objects could not be created.
    Startup(anyhow::Error),
    /// The compositor connection or presentation failed mid-run.
    Interrupted(anyhow::Error),
}

impl RunError {
    /// Only startup failures are distinguishable to the caller; a run cut
    /// short after the first frame is logged and exits like a normal close.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Startup(_) => EXIT_STARTUP_FAILURE,
            RunError::Interrupted(_) => 0,
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Startup(e) => write!(f, "startup failed: {:#}", e),
            RunError::Interrupted(e) => write!(f, "stopped early: {:#}", e),
        }
    }
}

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Runs `L` in a window until it is closed or Escape is pressed and returns
/// the process exit code: `0` on shutdown, [`EXIT_STARTUP_FAILURE`] when the
/// window, the GL context or the lesson's GL objects cannot be created.
pub fn run<L: Lesson>() -> i32 {
    init_logging();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Ignoring config file: {:#}", e);
            Config::default()
        }
    };

    info!("Starting {}...", L::NAME);
    let mut window = match Window::open(&config, L::GL_VERSION) {
        Ok(window) => window,
        Err(e) => {
            error!("Failed to create window: {:#}", e);
            return RunError::Startup(e).exit_code();
        }
    };

    let gl = Rc::new(window.load_gl());
    let assets = Assets::new(&config.asset_dir);
    info!("Loading assets from {}", assets.root().display());

    match render_loop::<L>(&mut window, &gl, &assets, &config) {
        Ok(()) => 0,
        Err(e) => {
            error!("{}: {}", L::NAME, e);
            e.exit_code()
        }
    }
}

fn render_loop<L: Lesson>(
    window: &mut Window,
    gl: &Rc<glow::Context>,
    assets: &Assets,
    config: &Config,
) -> Result<(), RunError> {
    let mut lesson = L::setup(gl, assets).map_err(RunError::Startup)?;

    let [width, height] = window.size();
    unsafe {
        gl.viewport(0, 0, width as i32, height as i32);
    }

    let [r, g, b, a] = config.clear_color;
    let start = Instant::now();
    let mut last_frame = start;

    info!("Starting main loop...");
    loop {
        window.poll_events().map_err(RunError::Interrupted)?;
        if window.should_close() {
            break;
        }

        if let Some([width, height]) = window.take_resize() {
            unsafe {
                gl.viewport(0, 0, width as i32, height as i32);
            }
        }

        let now = Instant::now();
        let frame = Frame {
            time: now.duration_since(start).as_secs_f32(),
            dt: now.duration_since(last_frame).as_secs_f32(),
        };
        last_frame = now;

        unsafe {
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
        lesson.render(gl, &frame);

        window.swap_buffers().map_err(RunError::Interrupted)?;
    }

    info!("Shutting down {}", L::NAME);
    // GL objects go while the context is still current
    drop(lesson);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_paths() {
        let assets = Assets::new("assets");
        assert_eq!(
            assets.shader("shaders_exercise2", "vertex.glsl"),
            Path::new("assets/shaders/shaders_exercise2/vertex.glsl")
        );
        assert_eq!(
            assets.texture("container.jpg"),
            Path::new("assets/textures/container.jpg")
        );
    }

    #[test]
    fn only_startup_failures_exit_nonzero() {
        let startup = RunError::Startup(anyhow::anyhow!("no EGL display"));
        assert_eq!(startup.exit_code(), EXIT_STARTUP_FAILURE);

        let lost = RunError::Interrupted(anyhow::anyhow!("Broken pipe"));
        assert_eq!(lost.exit_code(), 0);
        assert!(lost.to_string().contains("Broken pipe"));
    }
}
