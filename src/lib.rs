//! Windowed rendering scaffold for Snake: one window, one GPU context, one
//! quad drawn through a shader program loaded from a tagged `.shader` file.

pub mod engine;
pub mod game;

// Re-export main types for convenience
pub use game::App;
