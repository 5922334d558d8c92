use std::collections::HashSet;
use xkbcommon::xkb::keysyms;

/// Keyboard and window-close state, polled once per frame.
#[derive(Debug, Default)]
pub struct InputState {
    pressed: HashSet<u32>,
    close_requested: bool,
}

impl InputState {
    pub fn key_down(&mut self, keysym: u32) {
        self.pressed.insert(keysym);
    }

    pub fn key_up(&mut self, keysym: u32) {
        self.pressed.remove(&keysym);
    }

    /// Keyboard focus left the window; nothing is held anymore.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn is_pressed(&self, keysym: u32) -> bool {
        self.pressed.contains(&keysym)
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// True once the compositor asked to close the window or while Escape is held.
    pub fn should_quit(&self) -> bool {
        self.close_requested || self.is_pressed(keysyms::KEY_Escape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_quits_while_held() {
        let mut input = InputState::default();
        assert!(!input.should_quit());

        input.key_down(keysyms::KEY_a);
        assert!(!input.should_quit());

        input.key_down(keysyms::KEY_Escape);
        assert!(input.should_quit());

        input.key_up(keysyms::KEY_Escape);
        assert!(!input.should_quit());
    }

    #[test]
    fn close_request_sticks() {
        let mut input = InputState::default();
        input.request_close();
        input.release_all();
        assert!(input.close_requested());
        assert!(input.should_quit());
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut input = InputState::default();
        input.key_down(keysyms::KEY_Escape);
        input.release_all();
        assert!(!input.is_pressed(keysyms::KEY_Escape));
    }
}
