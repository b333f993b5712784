use std::path::PathBuf;

use motion::{FrameParams, Rect};

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Gamma-encoded swapchain; texture bytes reach the screen untouched.
    #[default]
    Auto,
    /// Treat textures as gamma-encoded; use non-sRGB surfaces.
    Gamma,
    /// Use sRGB swapchains/textures so blending happens in linear space.
    Linear,
}

/// Summary of the adapter wgpu picked, kept for logging and software fallbacks.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
    pub max_texture_dimension: u32,
}

impl AdapterProfile {
    pub fn from_wgpu(info: &wgpu::AdapterInfo, limits: &wgpu::Limits) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
            max_texture_dimension: limits.max_texture_dimension_2d,
        }
    }

    /// CPU rasterizers (llvmpipe, WARP, SwiftShader) report themselves as `Cpu`.
    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
            || self.name.to_ascii_lowercase().contains("llvmpipe")
    }
}

/// Geometry of the textured plane, in world units (one unit per logical pixel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSpec {
    pub width: f32,
    pub height: f32,
    pub segments: u32,
}

impl Default for PlaneSpec {
    fn default() -> Self {
        Self {
            width: 250.0,
            height: 350.0,
            segments: 20,
        }
    }
}

/// A hoverable region as the renderer sees it: where it sits, how the
/// overlay tints it, and which image it reveals.
#[derive(Debug, Clone)]
pub struct RegionVisual {
    pub name: String,
    pub rect: Rect,
    pub color: [f32; 4],
    /// Local image path; `None` binds a placeholder texture.
    pub texture: Option<PathBuf>,
}

/// Immutable configuration passed to the renderer at start-up.
///
/// The binary resolves config files, CLI flags, and texture downloads into
/// this struct; the renderer itself never touches the network or TOML.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in logical pixels.
    pub window_size: (u32, u32),
    pub title: String,
    pub plane: PlaneSpec,
    /// Camera distance from the z=0 plane.
    pub perspective: f32,
    pub background: [f32; 3],
    pub regions: Vec<RegionVisual>,
    pub motion: FrameParams,
    /// Optional FPS cap; `None` renders at the display refresh rate.
    pub target_fps: Option<f32>,
    pub antialiasing: Antialiasing,
    pub color_space: ColorSpaceMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            window_size: (1280, 800),
            title: "rgbshift".into(),
            plane: PlaneSpec::default(),
            perspective: 1000.0,
            background: [0.0, 0.0, 0.0],
            regions: Vec::new(),
            motion: FrameParams::default(),
            target_fps: None,
            antialiasing: Antialiasing::default(),
            color_space: ColorSpaceMode::default(),
        }
    }
}
