use anyhow::{anyhow, Result};
use khronos_egl as egl;
use std::ffi::c_void;
use std::ptr;
use wayland_client::protocol::wl_surface::WlSurface;
use wayland_client::Proxy;

/// Requested desktop GL core-profile version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    pub major: i32,
    pub minor: i32,
}

impl GlVersion {
    pub const fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }
}

pub struct EglContext {
    egl: egl::Instance<egl::Static>,
    display: egl::Display,
    context: egl::Context,
    config: egl::Config,
    wl_egl_window: Option<wayland_egl::WlEglSurface>,
    surface: Option<egl::Surface>,
}

impl EglContext {
    pub fn new(wl_display: *mut c_void, version: GlVersion) -> Result<Self> {
        let egl_instance = egl::Instance::new(egl::Static);

        let display = unsafe {
            egl_instance.get_display(wl_display as egl::NativeDisplayType)
                .ok_or_else(|| anyhow!("Failed to get EGL display"))?
        };

        let (major, minor) = egl_instance.initialize(display)?;
        log::info!("EGL version: {}.{}", major, minor);

        let config_attribs = [
            egl::SURFACE_TYPE, egl::WINDOW_BIT,
            egl::RED_SIZE, 8,
            egl::GREEN_SIZE, 8,
            egl::BLUE_SIZE, 8,
            egl::ALPHA_SIZE, 8,
            egl::RENDERABLE_TYPE, egl::OPENGL_BIT,
            egl::NONE,
        ];

        let config = egl_instance.choose_first_config(display, &config_attribs)?
            .ok_or_else(|| anyhow!("No EGL config with desktop OpenGL support"))?;

        egl_instance.bind_api(egl::OPENGL_API)?;

        let context_attribs = [
            egl::CONTEXT_MAJOR_VERSION, version.major,
            egl::CONTEXT_MINOR_VERSION, version.minor,
            egl::CONTEXT_OPENGL_PROFILE_MASK, egl::CONTEXT_OPENGL_CORE_PROFILE_BIT,
            egl::NONE,
        ];

        let context = egl_instance
            .create_context(display, config, None, &context_attribs)
            .map_err(|e| anyhow!("Failed to create OpenGL {}.{} core context: {}", version.major, version.minor, e))?;

        Ok(Self {
            egl: egl_instance,
            display,
            context,
            config,
            wl_egl_window: None,
            surface: None,
        })
    }

    pub fn create_surface(&mut self, wl_surface: &WlSurface, width: i32, height: i32) -> Result<()> {
        if let Some(surface) = self.surface.take() {
            unsafe {
                self.egl.destroy_surface(self.display, surface)?;
            }
        }

        // The old wl_egl_window must outlive its EGL surface
        self.wl_egl_window = None;

        let wl_egl_window = unsafe {
            wayland_egl::WlEglSurface::new_from_raw(
                wl_surface.id().as_ptr() as *mut _,
                width,
                height,
            )?
        };

        let surface = unsafe {
            self.egl.create_window_surface(
                self.display,
                self.config,
                wl_egl_window.ptr() as egl::NativeWindowType,
                None,
            )?
        };

        self.wl_egl_window = Some(wl_egl_window);
        self.surface = Some(surface);

        self.make_current()
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        if let Some(window) = &mut self.wl_egl_window {
            window.resize(width, height, 0, 0);
        }
    }

    /// Waits for `interval` display refreshes per swap; 0 disables pacing.
    pub fn set_swap_interval(&self, interval: i32) -> Result<()> {
        unsafe {
            self.egl.swap_interval(self.display, interval)?;
        }
        Ok(())
    }

    pub fn swap_buffers(&self) -> Result<()> {
        if let Some(surface) = self.surface {
            unsafe {
                self.egl.swap_buffers(self.display, surface)?;
            }
        }
        Ok(())
    }

    pub fn make_current(&self) -> Result<()> {
        if let Some(surface) = self.surface {
            unsafe {
                self.egl.make_current(
                    self.display,
                    Some(surface),
                    Some(surface),
                    Some(self.context),
                )?;
            }
        }
        Ok(())
    }

    pub fn get_proc_address(&self, name: &str) -> *const c_void {
        self.egl.get_proc_address(name)
            .map(|f| f as *const c_void)
            .unwrap_or(ptr::null())
    }
}

impl Drop for EglContext {
    fn drop(&mut self) {
        unsafe {
            let _ = self.egl.make_current(self.display, None, None, None);

            if let Some(surface) = self.surface.take() {
                let _ = self.egl.destroy_surface(self.display, surface);
            }

            let _ = self.egl.destroy_context(self.display, self.context);
            let _ = self.egl.terminate(self.display);
        }
    }
}
