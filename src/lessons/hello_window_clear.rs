use crate::app::{Assets, Frame, Lesson};
use anyhow::Result;
use std::rc::Rc;

/// An empty window cleared to the background colour every frame.
pub struct HelloWindowClear;

impl Lesson for HelloWindowClear {
    const NAME: &'static str = "hello_window_clear";

    fn setup(_gl: &Rc<glow::Context>, _assets: &Assets) -> Result<Self> {
        Ok(Self)
    }

    fn render(&mut self, _gl: &glow::Context, _frame: &Frame) {}
}
