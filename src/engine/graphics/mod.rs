pub mod renderer;
pub mod shader;
pub mod vertex;

pub use renderer::Renderer;
pub use shader::{CompiledStage, ShaderError, ShaderProgram, ShaderSource, ShaderStage};
pub use vertex::Vertex;
