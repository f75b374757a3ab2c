//! Input handling module
//! Keyboard state tracking for the render loop.

pub mod handler;

pub use handler::InputHandler;
