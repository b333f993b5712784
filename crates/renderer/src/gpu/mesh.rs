use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct PlaneVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl PlaneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlaneVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side unit plane spanning `[-0.5, 0.5]` on both axes.
///
/// Rows run top to bottom; `uv.y` is 1 on the top row so that a vertically
/// flipped upload shows the image upright.
#[derive(Debug, Clone)]
pub(crate) struct PlaneGeometry {
    pub vertices: Vec<PlaneVertex>,
    pub indices: Vec<u32>,
}

impl PlaneGeometry {
    pub fn new(segments: u32) -> Self {
        let segments = segments.max(1);
        let stride = segments + 1;
        let step = 1.0 / segments as f32;

        let mut vertices = Vec::with_capacity((stride * stride) as usize);
        for row in 0..stride {
            let y = 0.5 - row as f32 * step;
            for column in 0..stride {
                let x = column as f32 * step - 0.5;
                vertices.push(PlaneVertex {
                    position: [x, y, 0.0],
                    uv: [column as f32 / segments as f32, 1.0 - row as f32 / segments as f32],
                });
            }
        }

        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
        for row in 0..segments {
            for column in 0..segments {
                let top_left = column + stride * row;
                let bottom_left = column + stride * (row + 1);
                let bottom_right = column + 1 + stride * (row + 1);
                let top_right = column + 1 + stride * row;
                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    bottom_left,
                    bottom_right,
                    top_right,
                ]);
            }
        }

        Self { vertices, indices }
    }
}

pub(crate) struct PlaneMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl PlaneMesh {
    pub fn new(device: &wgpu::Device, segments: u32) -> Self {
        let geometry = PlaneGeometry::new(segments);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane vertices"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane indices"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }
}
