//! Cursor-following motion for the RGB-shift plane.
//!
//! Everything here is plain arithmetic over in-memory state, so the crate has
//! no GPU or windowing dependencies. The renderer feeds input into
//! [`InputState`], calls [`FrameStep::advance`] once per redraw, and uploads
//! the resulting [`FrameOutput`]:
//!
//! ```text
//!   CursorMoved ──▶ InputState::on_pointer_move
//!        │
//!        └──▶ RegionTracker ──▶ on_region_enter / on_region_leave
//!
//!   RedrawRequested ──▶ FrameStep::advance(&InputState, Viewport)
//!                              │ offset, alpha, texture, placement
//!                              ▼
//!                         uniform buffer ──▶ submit
//! ```

mod frame;
mod hover;
mod interpolate;
mod regions;

pub use frame::{
    distortion_offset, mesh_placement, FrameOutput, FrameParams, FrameStep, ShaderUniforms,
    Viewport,
};
pub use hover::{HoverPhase, InputState, RegionId};
pub use interpolate::{advance, lerp};
pub use regions::{Rect, RegionEvent, RegionTracker};

pub use glam::Vec2;

/// Fraction of the remaining distance covered each frame.
pub const DEFAULT_DAMPING: f32 = 0.1;

/// Converts interpolation lag (pixels) into the shader's UV-space offset.
pub const DEFAULT_OFFSET_SCALE: f32 = 0.0005;
