use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use motion::{ShaderUniforms, Viewport};

use crate::types::PlaneSpec;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;

/// std140 mirror of the `PlaneParams` block in `compile.rs`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct PlaneUniforms {
    pub model_view_projection: [[f32; 4]; 4],
    pub offset: [f32; 2],
    pub alpha: f32,
    pub _padding: f32,
}

impl PlaneUniforms {
    pub fn new(model_view_projection: Mat4, shader: ShaderUniforms) -> Self {
        Self {
            model_view_projection: model_view_projection.to_cols_array_2d(),
            offset: shader.offset.to_array(),
            alpha: shader.alpha,
            _padding: 0.0,
        }
    }
}

/// Perspective camera placed so that one world unit at z=0 covers one
/// logical pixel, with the origin at the centre of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Camera {
    view_projection: Mat4,
}

impl Camera {
    pub fn new(distance: f32, viewport: Viewport) -> Self {
        let height = viewport.height.max(1.0);
        let aspect = viewport.width.max(1.0) / height;
        let fov_y = 2.0 * ((height / 2.0) / distance).atan();
        let far = FAR_PLANE.max(distance + 1.0);
        let projection = Mat4::perspective_rh(fov_y, aspect, NEAR_PLANE, far);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, distance), Vec3::ZERO, Vec3::Y);
        Self {
            view_projection: projection * view,
        }
    }

    /// Full transform for the plane centred at `placement`, scaled to `plane`.
    pub fn model_view_projection(&self, placement: Vec2, plane: PlaneSpec) -> Mat4 {
        let model = Mat4::from_translation(placement.extend(0.0))
            * Mat4::from_scale(Vec3::new(plane.width, plane.height, 1.0));
        self.view_projection * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(matrix: Mat4, point: Vec3) -> Vec3 {
        let clip = matrix * Vec4::new(point.x, point.y, point.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn uniform_layout_matches_std140_block() {
        assert_eq!(std::mem::size_of::<PlaneUniforms>(), 80);
        assert_eq!(std::mem::offset_of!(PlaneUniforms, offset), 64);
        assert_eq!(std::mem::offset_of!(PlaneUniforms, alpha), 72);
    }

    #[test]
    fn one_world_unit_is_one_pixel_at_origin_plane() {
        let viewport = Viewport::new(1000.0, 800.0);
        let camera = Camera::new(1000.0, viewport);
        let plane = PlaneSpec {
            width: 1.0,
            height: 1.0,
            segments: 1,
        };
        let mvp = camera.model_view_projection(Vec2::ZERO, plane);

        let corner = project(mvp, Vec3::new(500.0, 400.0, 0.0));
        assert!((corner.x - 1.0).abs() < 1e-4, "x {}", corner.x);
        assert!((corner.y - 1.0).abs() < 1e-4, "y {}", corner.y);
        assert!(corner.z > 0.0 && corner.z < 1.0, "depth {}", corner.z);

        let centre = project(mvp, Vec3::ZERO);
        assert!(centre.x.abs() < 1e-5 && centre.y.abs() < 1e-5);
    }

    #[test]
    fn placement_and_scale_move_plane_edges() {
        let viewport = Viewport::new(1000.0, 800.0);
        let camera = Camera::new(1000.0, viewport);
        let plane = PlaneSpec {
            width: 250.0,
            height: 350.0,
            segments: 20,
        };
        let mvp = camera.model_view_projection(Vec2::new(-250.0, 0.0), plane);
        // Right edge of the unit plane lands at x = -250 + 125 = -125 px.
        let edge = project(mvp, Vec3::new(0.5, 0.0, 0.0));
        assert!((edge.x - (-125.0 / 500.0)).abs() < 1e-4, "x {}", edge.x);
    }

    #[test]
    fn long_perspective_extends_far_plane() {
        let camera = Camera::new(2500.0, Viewport::new(800.0, 600.0));
        let mvp = camera.model_view_projection(Vec2::ZERO, PlaneSpec::default());
        let centre = project(mvp, Vec3::ZERO);
        assert!(centre.z > 0.0 && centre.z < 1.0, "depth {}", centre.z);
    }
}
