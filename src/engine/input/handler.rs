use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Pressed-key tracking bound to the application, replacing the usual
/// free-function key callback.
pub struct InputHandler {
    pressed_keys: HashSet<KeyCode>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self {
            pressed_keys: HashSet::new(),
        }
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key state change. Returns `true` only for a fresh press,
    /// so callers can ignore OS key repeat.
    pub fn handle_keyboard_input_event(&mut self, keycode: KeyCode, pressed: bool) -> bool {
        if pressed {
            self.pressed_keys.insert(keycode)
        } else {
            self.pressed_keys.remove(&keycode);
            false
        }
    }

    pub fn is_pressed(&self, keycode: KeyCode) -> bool {
        self.pressed_keys.contains(&keycode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_press_is_reported_once() {
        let mut input = InputHandler::new();
        assert!(input.handle_keyboard_input_event(KeyCode::Space, true));
        // OS key repeat delivers further presses without a release.
        assert!(!input.handle_keyboard_input_event(KeyCode::Space, true));
        assert!(input.is_pressed(KeyCode::Space));
    }

    #[test]
    fn release_rearms_the_key() {
        let mut input = InputHandler::new();
        assert!(input.handle_keyboard_input_event(KeyCode::Space, true));
        assert!(!input.handle_keyboard_input_event(KeyCode::Space, false));
        assert!(!input.is_pressed(KeyCode::Space));
        assert!(input.handle_keyboard_input_event(KeyCode::Space, true));
    }
}
