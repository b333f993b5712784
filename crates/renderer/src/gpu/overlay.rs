use bytemuck::{Pod, Zeroable};
use motion::{Rect, Viewport};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct OverlayVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl OverlayVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Logical top-left-origin point to normalised device coordinates.
pub(crate) fn to_ndc(x: f32, y: f32, viewport: Viewport) -> [f32; 2] {
    let width = viewport.width.max(1.0);
    let height = viewport.height.max(1.0);
    [x / width * 2.0 - 1.0, 1.0 - y / height * 2.0]
}

/// Two triangles per region, six vertices each, rebuilt whenever the
/// viewport changes.
pub(crate) fn build_vertices(regions: &[(Rect, [f32; 4])], viewport: Viewport) -> Vec<OverlayVertex> {
    let mut vertices = Vec::with_capacity(regions.len() * 6);
    for (rect, color) in regions {
        let top_left = to_ndc(rect.x, rect.y, viewport);
        let top_right = to_ndc(rect.x + rect.width, rect.y, viewport);
        let bottom_left = to_ndc(rect.x, rect.y + rect.height, viewport);
        let bottom_right = to_ndc(rect.x + rect.width, rect.y + rect.height, viewport);
        for position in [
            top_left,
            bottom_left,
            top_right,
            bottom_left,
            bottom_right,
            top_right,
        ] {
            vertices.push(OverlayVertex {
                position,
                color: *color,
            });
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_clip_space_extents() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(to_ndc(0.0, 0.0, viewport), [-1.0, 1.0]);
        assert_eq!(to_ndc(800.0, 600.0, viewport), [1.0, -1.0]);
        assert_eq!(to_ndc(400.0, 300.0, viewport), [0.0, 0.0]);
    }

    #[test]
    fn each_region_becomes_six_vertices() {
        let color = [1.0, 1.0, 1.0, 0.1];
        let regions = [
            (Rect::new(0.0, 0.0, 400.0, 300.0), color),
            (Rect::new(400.0, 300.0, 400.0, 300.0), color),
        ];
        let vertices = build_vertices(&regions, Viewport::new(800.0, 600.0));
        assert_eq!(vertices.len(), 12);
        assert_eq!(vertices[0].position, [-1.0, 1.0]);
        assert_eq!(vertices[4].position, [0.0, 0.0]);
        assert_eq!(vertices[10].position, [1.0, -1.0]);
        assert!(vertices.iter().all(|vertex| vertex.color == color));
    }
}
