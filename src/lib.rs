pub mod app;
pub mod config;
pub mod gfx;
pub mod input;
pub mod lessons;
pub mod wayland;
pub mod window;
