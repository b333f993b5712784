use glam::Vec2;

use crate::hover::{InputState, RegionId};
use crate::interpolate::{advance, lerp};
use crate::{DEFAULT_DAMPING, DEFAULT_OFFSET_SCALE};

/// Logical size of the drawable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Tunables shared by the position and alpha smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Damping factor in `(0, 1]`.
    pub damping: f32,
    /// Pixel lag to UV offset multiplier.
    pub offset_scale: f32,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            offset_scale: DEFAULT_OFFSET_SCALE,
        }
    }
}

/// Values the plane shader consumes each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniforms {
    pub offset: Vec2,
    pub alpha: f32,
}

/// Everything one redraw needs, computed against a single input snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub uniforms: ShaderUniforms,
    pub texture: Option<RegionId>,
    /// Mesh centre in world units (centre origin, Y up).
    pub placement: Vec2,
}

/// RGB-shift offset from the lag between raw and smoothed cursor. Y is
/// negated because screen Y grows downward while UV Y grows upward.
pub fn distortion_offset(target: Vec2, smoothed: Vec2, scale: f32) -> Vec2 {
    Vec2::new(
        (target.x - smoothed.x) * scale,
        -(target.y - smoothed.y) * scale,
    )
}

/// Maps a top-left-origin screen point to the centre-origin world plane.
pub fn mesh_placement(smoothed: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        smoothed.x - viewport.width / 2.0,
        -smoothed.y + viewport.height / 2.0,
    )
}

/// Animation state carried across frames: the smoothed cursor and the fade
/// accumulator. Only the frame callback owns this.
#[derive(Debug, Clone)]
pub struct FrameStep {
    params: FrameParams,
    smoothed: Vec2,
    alpha: f32,
}

impl FrameStep {
    pub fn new(params: FrameParams) -> Self {
        Self {
            params,
            smoothed: Vec2::ZERO,
            alpha: 0.0,
        }
    }

    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Runs one frame of the animation.
    ///
    /// The offset is taken from the lag at the start of the frame, before the
    /// smoothed position moves; placement uses the freshly advanced position.
    pub fn advance(&mut self, input: &InputState, viewport: Viewport) -> FrameOutput {
        let target = input.cursor();
        let offset = distortion_offset(target, self.smoothed, self.params.offset_scale);

        self.smoothed = advance(self.smoothed, target, self.params.damping);
        self.alpha = lerp(self.alpha, input.hover().alpha_target(), self.params.damping)
            .clamp(0.0, 1.0);

        FrameOutput {
            uniforms: ShaderUniforms {
                offset,
                alpha: self.alpha,
            },
            texture: input.active_texture(),
            placement: mesh_placement(self.smoothed, viewport),
        }
    }
}

impl Default for FrameStep {
    fn default() -> Self {
        Self::new(FrameParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn offset_sign_convention() {
        let offset = distortion_offset(Vec2::new(110.0, 100.0), Vec2::new(100.0, 100.0), 0.0005);
        assert!(approx(offset.x, 0.005));
        assert!(approx(offset.y, 0.0));

        let downward = distortion_offset(Vec2::new(0.0, 110.0), Vec2::new(0.0, 100.0), 0.0005);
        assert!(approx(downward.y, -0.005));
    }

    #[test]
    fn screen_centre_maps_to_origin() {
        let placement = mesh_placement(Vec2::new(500.0, 400.0), Viewport::new(1000.0, 800.0));
        assert_eq!(placement, Vec2::ZERO);

        let top_left = mesh_placement(Vec2::ZERO, Viewport::new(1000.0, 800.0));
        assert_eq!(top_left, Vec2::new(-500.0, 400.0));
    }

    #[test]
    fn offset_uses_lag_before_smoothing() {
        let mut step = FrameStep::default();
        let mut input = InputState::new(0);
        input.on_pointer_move(10.0, 0.0);
        let output = step.advance(&input, Viewport::new(100.0, 100.0));
        assert!(approx(output.uniforms.offset.x, 10.0 * DEFAULT_OFFSET_SCALE));
        assert!(approx(step.smoothed().x, 1.0));
        assert!(approx(output.placement.x, 1.0 - 50.0));
    }

    #[test]
    fn hover_fade_in_over_ten_frames() {
        let mut step = FrameStep::default();
        let mut input = InputState::new(1);
        input.on_region_enter(RegionId(0));
        let viewport = Viewport::new(800.0, 600.0);

        let mut previous = step.alpha();
        assert_eq!(previous, 0.0);
        for _ in 0..10 {
            let output = step.advance(&input, viewport);
            assert!(output.uniforms.alpha > previous);
            previous = output.uniforms.alpha;
        }
        let expected = 1.0 - 0.9_f32.powi(10);
        assert!((previous - expected).abs() < 1e-4, "alpha {previous}");
        assert!((previous - 0.6513).abs() < 1e-3);
    }

    #[test]
    fn alpha_stays_bounded_under_toggling() {
        let mut step = FrameStep::new(FrameParams {
            damping: 1.0,
            offset_scale: DEFAULT_OFFSET_SCALE,
        });
        let mut input = InputState::new(2);
        let viewport = Viewport::new(640.0, 480.0);
        for frame in 0..500 {
            match frame % 7 {
                0 => input.on_region_enter(RegionId(frame % 2)),
                3 => input.on_region_leave(RegionId(frame % 2)),
                _ => {}
            }
            let alpha = step.advance(&input, viewport).uniforms.alpha;
            assert!((0.0..=1.0).contains(&alpha), "alpha {alpha} at frame {frame}");
        }

        let mut step = FrameStep::default();
        for frame in 0..500 {
            if frame % 13 == 0 {
                input.on_region_enter(RegionId(0));
            } else if frame % 13 == 6 {
                input.on_region_leave(RegionId(0));
            }
            let alpha = step.advance(&input, viewport).uniforms.alpha;
            assert!((0.0..=1.0).contains(&alpha));
        }
    }

    #[test]
    fn fades_out_after_leave_and_keeps_texture() {
        let mut step = FrameStep::default();
        let mut input = InputState::new(2);
        let viewport = Viewport::new(800.0, 600.0);
        input.on_region_enter(RegionId(1));
        for _ in 0..30 {
            step.advance(&input, viewport);
        }
        let peak = step.alpha();
        input.on_region_leave(RegionId(1));
        let output = step.advance(&input, viewport);
        assert!(output.uniforms.alpha < peak);
        assert_eq!(output.texture, Some(RegionId(1)));
    }

    #[test]
    fn region_switch_binds_second_texture() {
        let mut step = FrameStep::default();
        let mut input = InputState::new(2);
        input.on_region_enter(RegionId(0));
        input.on_region_enter(RegionId(1));
        let output = step.advance(&input, Viewport::new(800.0, 600.0));
        assert_eq!(output.texture, Some(RegionId(1)));
        assert!(input.is_hovering());
        assert!(output.uniforms.alpha > 0.0);
    }

    #[test]
    fn runs_without_hover_or_texture() {
        let mut step = FrameStep::default();
        let input = InputState::new(2);
        let output = step.advance(&input, Viewport::new(800.0, 600.0));
        assert_eq!(output.texture, None);
        assert_eq!(output.uniforms.alpha, 0.0);
        assert_eq!(output.uniforms.offset, Vec2::ZERO);
    }
}
