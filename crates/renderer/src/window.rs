use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use motion::{FrameOutput, FrameStep, InputState, RegionTracker, Vec2};
use tracing::{debug, error, info, warn};

use crate::gpu::GpuState;
use crate::runtime::FrameScheduler;
use crate::types::{AdapterProfile, RendererConfig};

const SOFTWARE_FPS_CAP: f32 = 15.0;

/// Per-window state: GPU resources plus the motion pipeline they display.
///
/// `gpu` is declared before `window` so the surface is dropped while the
/// window handle it was created from is still alive.
pub(crate) struct WindowState {
    gpu: GpuState,
    window: Arc<Window>,
    input: InputState,
    tracker: RegionTracker,
    motion: FrameStep,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let gpu = GpuState::new(
            window.as_ref(),
            window.inner_size(),
            window.scale_factor(),
            config,
        )?;
        let rects = config.regions.iter().map(|region| region.rect).collect();
        Ok(Self {
            gpu,
            window,
            input: InputState::new(config.regions.len()),
            tracker: RegionTracker::new(rects),
            motion: FrameStep::new(config.motion),
        })
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        self.gpu.adapter_profile()
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size, self.window.scale_factor());
    }

    pub(crate) fn rescale(&mut self, scale_factor: f64) {
        let size = self.window.inner_size();
        self.gpu.resize(size, scale_factor);
    }

    /// Pointer positions are tracked in logical pixels so region rectangles
    /// and the plane keep their size across HiDPI outputs.
    pub(crate) fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let logical = position.to_logical::<f32>(self.window.scale_factor());
        self.tracker
            .dispatch_pointer(&mut self.input, Vec2::new(logical.x, logical.y));
    }

    pub(crate) fn handle_cursor_left(&mut self) {
        self.tracker.dispatch_pointer_left(&mut self.input);
    }

    pub(crate) fn render_frame(&mut self) -> Result<FrameOutput, wgpu::SurfaceError> {
        let output = self.motion.advance(&self.input, self.gpu.viewport());
        self.gpu.render(&output)?;
        Ok(output)
    }
}

fn is_escape(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && matches!(event.logical_key, Key::Named(NamedKey::Escape))
}

/// Opens the window and drives the effect until it is closed.
pub(crate) fn run_window(config: RendererConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let (width, height) = config.window_size;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(LogicalSize::new(width.max(1), height.max(1)))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);
    let mut state = WindowState::new(window, &config)
        .map_err(|err| anyhow!("failed to initialise window renderer: {err:#}"))?;

    let profile = state.adapter_profile().clone();
    let target_fps = match config.target_fps {
        Some(fps) => Some(fps),
        None if profile.is_software() => {
            warn!(
                adapter = %profile.name,
                backend = ?profile.backend,
                cap = SOFTWARE_FPS_CAP,
                "software rasterizer detected; capping to {} FPS (override with --fps)",
                SOFTWARE_FPS_CAP
            );
            Some(SOFTWARE_FPS_CAP)
        }
        None => None,
    };
    let mut scheduler = FrameScheduler::new(target_fps);
    info!(
        adapter = %profile.name,
        regions = config.regions.len(),
        fps_cap = ?scheduler.interval().map(|interval| 1.0 / interval.as_secs_f32()),
        "window ready"
    );
    state.window().request_redraw();

    let mut result = Ok(());
    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } if is_escape(&event) => {
                    elwt.exit();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    state.handle_cursor_moved(position);
                }
                WindowEvent::CursorLeft { .. } => {
                    state.handle_cursor_left();
                }
                WindowEvent::Resized(new_size) => {
                    state.resize(new_size);
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    debug!(scale_factor, "scale factor changed");
                    state.rescale(scale_factor);
                }
                WindowEvent::RedrawRequested => match state.render_frame() {
                    Ok(_) => scheduler.mark_rendered(Instant::now()),
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.size();
                        state.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("surface out of memory; exiting");
                        elwt.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        warn!("surface timeout; retrying next frame");
                    }
                    Err(other) => {
                        warn!("surface error: {other:?}; retrying next frame");
                    }
                },
                _ => {}
            }
        }
        Event::AboutToWait => {
            let now = Instant::now();
            if scheduler.ready_for_frame(now) {
                tracing::trace!("scheduler: issuing redraw now");
                state.window().request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            } else if let Some(deadline) = scheduler.next_deadline() {
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    });
    if let Err(err) = run_result {
        result = Err(anyhow!("window event loop error: {err}"));
    }
    result
}
