//! Windowed `wgpu` renderer for the RGB-shift hover effect.
//!
//! The crate turns a [`RendererConfig`] into a window with a set of hover
//! regions and a textured plane that trails the cursor. Motion itself lives in
//! the `motion` crate; this crate only feeds it input and draws what it says:
//!
//! ```text
//!   rgbshift CLI
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop
//!                          │                 │ CursorMoved / CursorLeft
//!                          │                 ▼
//!                          │          RegionTracker ──▶ InputState
//!                          ▼
//!              RedrawRequested ──▶ FrameStep::advance ──▶ GpuState::render
//! ```
//!
//! `WindowState` owns all GPU resources (surface, device, pipelines, region
//! textures), while `Renderer` is the thin entry point the binary calls.

mod compile;
mod gpu;
mod runtime;
mod types;
mod window;

use anyhow::Result;

pub use runtime::FrameScheduler;
pub use types::{
    AdapterProfile, Antialiasing, ColorSpaceMode, PlaneSpec, RegionVisual, RendererConfig,
};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and blocks until it is closed.
    ///
    /// Fails when no event loop, window, or GPU adapter can be created (for
    /// example on a headless machine).
    pub fn run(self) -> Result<()> {
        tracing::info!(
            width = self.config.window_size.0,
            height = self.config.window_size.1,
            regions = self.config.regions.len(),
            "starting renderer"
        );
        window::run_window(self.config)
    }
}
