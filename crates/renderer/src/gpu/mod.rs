//! GPU side of the effect.
//!
//! - `context` owns wgpu instance/device/surface wiring and rebuilds the
//!   swapchain when the window resizes.
//! - `mesh` builds the subdivided unit plane the vertex stage bends.
//! - `textures` uploads one image per region (or a placeholder) and wraps
//!   each in its own bind group so switching is a pointer swap.
//! - `overlay` turns region rectangles into NDC quads.
//! - `pipeline` creates the plane and overlay render pipelines.
//! - `uniforms` mirrors the GLSL uniform block and owns the camera math.
//! - `state` glues everything together behind the `GpuState` API used by
//!   `window`.

mod context;
mod mesh;
mod overlay;
mod pipeline;
mod state;
mod textures;
mod uniforms;

pub(crate) use state::GpuState;
