//! Game state management implementation.

use std::time::Instant;

/// Frame accounting for the render loop. Gameplay state lives here once the
/// game exists; for now it is a frame counter and a once-a-second FPS figure.
pub struct GameState {
    pub last_fps_print: Instant,
    pub frame_count: u32,
    pub last_fps: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            last_fps_print: Instant::now(),
            frame_count: 0,
            last_fps: 0,
        }
    }

    pub fn update_frame_count(&mut self) {
        self.frame_count += 1;
    }

    /// Returns the frame rate once per second, `None` in between.
    pub fn update_fps_display(&mut self) -> Option<u32> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print);

        if elapsed.as_secs_f32() >= 1.0 {
            self.last_fps = self.frame_count;
            self.frame_count = 0;
            self.last_fps_print = now;
            Some(self.last_fps)
        } else {
            None
        }
    }

    pub fn get_fps(&self) -> u32 {
        self.last_fps
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_accumulate_until_the_second_rolls_over() {
        let mut state = GameState::new();
        state.update_frame_count();
        state.update_frame_count();
        assert_eq!(state.frame_count, 2);
        // Less than a second has passed, so no figure yet.
        assert_eq!(state.update_fps_display(), None);
        assert_eq!(state.get_fps(), 0);
    }

    #[test]
    fn rollover_reports_and_resets() {
        let mut state = GameState::new();
        state.update_frame_count();
        state.update_frame_count();
        state.update_frame_count();
        state.last_fps_print = Instant::now() - std::time::Duration::from_secs(2);
        assert_eq!(state.update_fps_display(), Some(3));
        assert_eq!(state.frame_count, 0);
        assert_eq!(state.get_fps(), 3);
    }
}
