use wgpu;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x2,
        }];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRIBUTES,
        }
    }
}

// The one piece of geometry in the scaffold: a quad in clip space.
pub const QUAD_VERTICES: &[Vertex] = &[
    Vertex { position: [-0.5, -0.5] }, // bottom-left
    Vertex { position: [ 0.5, -0.5] }, // bottom-right
    Vertex { position: [ 0.5,  0.5] }, // top-right
    Vertex { position: [-0.5,  0.5] }, // top-left
];

pub const QUAD_INDICES: &[u16] = &[0, 1, 2, 2, 3, 0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_struct() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 8);
        assert_eq!(desc.attributes.len(), 1);
        assert_eq!(desc.attributes[0].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn quad_is_two_triangles() {
        assert_eq!(QUAD_VERTICES.len(), 4);
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }
}
