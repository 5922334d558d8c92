use crate::config::Config;
use crate::wayland::egl::{EglContext, GlVersion};
use crate::wayland::WaylandState;
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::io::ErrorKind;
use wayland_client::backend::WaylandError;
use wayland_client::protocol::wl_surface::WlSurface;
use wayland_client::{Connection, EventQueue, Proxy};
use wayland_protocols::xdg::shell::client::{xdg_surface::XdgSurface, xdg_toplevel::XdgToplevel};

struct ToplevelSurface {
    surface: WlSurface,
    xdg_surface: XdgSurface,
    toplevel: XdgToplevel,
}

impl Drop for ToplevelSurface {
    fn drop(&mut self) {
        self.toplevel.destroy();
        self.xdg_surface.destroy();
        self.surface.destroy();
    }
}

/// A desktop window with a current GL context.
///
/// Field order is teardown order: the EGL context goes before the surfaces
/// it renders to, and those before the connection.
pub struct Window {
    egl: EglContext,
    _toplevel: ToplevelSurface,
    state: WaylandState,
    event_queue: EventQueue<WaylandState>,
    _conn: Connection,
    size: [u32; 2],
}

impl Window {
    pub fn open(config: &Config, version: GlVersion) -> Result<Self> {
        info!("Connecting to Wayland...");
        let conn = Connection::connect_to_env().context("Failed to connect to Wayland")?;
        let display = conn.display();

        let mut event_queue = conn.new_event_queue();
        let qh = event_queue.handle();
        let _registry = display.get_registry(&qh, ());

        let mut state = WaylandState::new();
        event_queue.roundtrip(&mut state)?;

        let compositor = state
            .compositor
            .clone()
            .ok_or_else(|| anyhow!("Compositor does not offer wl_compositor"))?;
        let wm_base = state
            .wm_base
            .clone()
            .ok_or_else(|| anyhow!("Compositor does not offer xdg_wm_base"))?;

        info!("Creating window...");
        let surface = compositor.create_surface(&qh, ());
        let xdg_surface = wm_base.get_xdg_surface(&surface, &qh, ());
        let toplevel = xdg_surface.get_toplevel(&qh, ());
        toplevel.set_title(config.title.clone());
        toplevel.set_app_id("learngl".to_string());
        surface.commit();

        let toplevel = ToplevelSurface {
            surface,
            xdg_surface,
            toplevel,
        };

        while !state.configured {
            event_queue.blocking_dispatch(&mut state)?;
        }
        let size = state.pending_size.take().unwrap_or([config.width, config.height]);
        info!("Window configured at {}x{}", size[0], size[1]);

        info!("Initializing EGL...");
        let display_ptr = display.id().as_ptr() as *mut _;
        let mut egl = EglContext::new(display_ptr, version)?;
        egl.create_surface(&toplevel.surface, size[0] as i32, size[1] as i32)?;

        if let Err(e) = egl.set_swap_interval(i32::from(config.vsync)) {
            warn!("Could not set swap interval: {:#}", e);
        }

        Ok(Self {
            egl,
            _toplevel: toplevel,
            state,
            event_queue,
            _conn: conn,
            size,
        })
    }

    /// Loads GL entry points for the window's context.
    pub fn load_gl(&self) -> glow::Context {
        unsafe { glow::Context::from_loader_function(|s| self.egl.get_proc_address(s)) }
    }

    /// Reads whatever the compositor has sent without blocking and handles it.
    pub fn poll_events(&mut self) -> Result<()> {
        self.event_queue.flush()?;

        if let Some(guard) = self.event_queue.prepare_read() {
            if let Err(e) = guard.read() {
                match e {
                    WaylandError::Io(io) if io.kind() == ErrorKind::WouldBlock => {}
                    e => return Err(e.into()),
                }
            }
        }

        self.event_queue.dispatch_pending(&mut self.state)?;
        Ok(())
    }

    pub fn should_close(&self) -> bool {
        self.state.input.should_quit()
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// Applies a pending compositor resize and returns the new size.
    pub fn take_resize(&mut self) -> Option<[u32; 2]> {
        let size = self.state.pending_size.take()?;
        if size == self.size {
            return None;
        }
        self.egl.resize(size[0] as i32, size[1] as i32);
        self.size = size;
        Some(size)
    }

    /// Presents the frame. Blocks for the display refresh when vsync is on.
    pub fn swap_buffers(&self) -> Result<()> {
        self.egl.swap_buffers()
    }
}
