//! Game-specific logic and features.

pub mod app;
pub mod state;

// Re-export commonly used types
pub use app::App;
pub use state::GameState;
