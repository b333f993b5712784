use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use motion::{FrameOutput, Rect, ShaderUniforms, Vec2, Viewport};

use crate::types::{AdapterProfile, PlaneSpec, RendererConfig};

use super::context::{GpuContext, SurfaceColorSpace};
use super::mesh::PlaneMesh;
use super::overlay;
use super::pipeline::{create_overlay_pipeline, create_plane_pipeline, PipelineLayouts};
use super::textures::{create_region_textures, RegionTexture};
use super::uniforms::{Camera, PlaneUniforms};

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }

    fn for_context(context: &GpuContext) -> Option<Self> {
        (context.sample_count > 1).then(|| {
            Self::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        })
    }
}

struct OverlayGeometry {
    regions: Vec<(Rect, [f32; 4])>,
    buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl OverlayGeometry {
    fn rebuild(&mut self, device: &wgpu::Device, viewport: Viewport) {
        let vertices = overlay::build_vertices(&self.regions, viewport);
        self.vertex_count = vertices.len() as u32;
        self.buffer = (!vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("region overlay vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
    }
}

pub(crate) struct GpuState {
    context: GpuContext,
    plane_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    mesh: PlaneMesh,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    textures: Vec<RegionTexture>,
    overlay: OverlayGeometry,
    multisample_target: Option<MultisampleTarget>,
    plane: PlaneSpec,
    perspective: f32,
    camera: Camera,
    scale_factor: f64,
    clear_color: wgpu::Color,
    frame_count: u64,
    last_fps_update: Instant,
    frames_since_last_update: u32,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        scale_factor: f64,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(
            target,
            initial_size,
            config.antialiasing,
            config.color_space,
        )?;
        let device = &context.device;

        let layouts = PipelineLayouts::new(device);
        let plane_pipeline =
            create_plane_pipeline(device, &layouts, context.surface_format, context.sample_count);
        let overlay_pipeline =
            create_overlay_pipeline(device, context.surface_format, context.sample_count);
        let mesh = PlaneMesh::new(device, config.plane.segments);

        let idle = PlaneUniforms::new(
            glam::Mat4::IDENTITY,
            ShaderUniforms {
                offset: Vec2::ZERO,
                alpha: 0.0,
            },
        );
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane uniforms"),
            contents: bytemuck::bytes_of(&idle),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plane uniform bind group"),
            layout: &layouts.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let textures = create_region_textures(
            device,
            &context.queue,
            &layouts.texture_layout,
            &config.regions,
            context.color_space,
            context.adapter_profile.max_texture_dimension,
        );
        for (region, texture) in config.regions.iter().zip(&textures) {
            debug!(
                region = %region.name,
                width = texture.size.0,
                height = texture.size.1,
                "bound region texture"
            );
        }

        let viewport = logical_viewport(context.size, scale_factor);
        let mut overlay = OverlayGeometry {
            regions: config
                .regions
                .iter()
                .map(|region| (region.rect, region.color))
                .collect(),
            buffer: None,
            vertex_count: 0,
        };
        overlay.rebuild(device, viewport);

        let multisample_target = MultisampleTarget::for_context(&context);
        let clear_color = clear_color(config.background, context.color_space);

        Ok(Self {
            camera: Camera::new(config.perspective, viewport),
            context,
            plane_pipeline,
            overlay_pipeline,
            mesh,
            uniform_buffer,
            uniform_bind_group,
            textures,
            overlay,
            multisample_target,
            plane: config.plane,
            perspective: config.perspective,
            scale_factor,
            clear_color,
            frame_count: 0,
            last_fps_update: Instant::now(),
            frames_since_last_update: 0,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        &self.context.adapter_profile
    }

    /// Drawable area in logical pixels, the unit pointer input arrives in.
    pub(crate) fn viewport(&self) -> Viewport {
        logical_viewport(self.context.size, self.scale_factor)
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>, scale_factor: f64) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.scale_factor = scale_factor;
        let viewport = self.viewport();
        self.camera = Camera::new(self.perspective, viewport);
        self.overlay.rebuild(&self.context.device, viewport);
        self.multisample_target = MultisampleTarget::for_context(&self.context);
        debug!(
            width = viewport.width,
            height = viewport.height,
            scale_factor,
            "resized render targets"
        );
    }

    pub(crate) fn render(&mut self, frame: &FrameOutput) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.context.surface.get_current_texture()?;
        self.record_stats(frame);

        let uniforms = PlaneUniforms::new(
            self.camera
                .model_view_projection(frame.placement, self.plane),
            frame.uniforms,
        );
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(buffer) = self.overlay.buffer.as_ref() {
                render_pass.set_pipeline(&self.overlay_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..self.overlay.vertex_count, 0..1);
            }

            // Nothing has been hovered yet, so there is no image to reveal.
            let bound = frame
                .texture
                .and_then(|region| self.textures.get(region.0));
            if let Some(texture) = bound {
                render_pass.set_pipeline(&self.plane_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
            } else if let Some(region) = frame.texture {
                warn!(region = region.0, "frame referenced an unknown region texture");
            }
        }

        self.context.queue.submit(Some(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn record_stats(&mut self, frame: &FrameOutput) {
        let now = Instant::now();
        self.frame_count += 1;
        self.frames_since_last_update += 1;
        let elapsed = now.saturating_duration_since(self.last_fps_update);
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_since_last_update as f32 / elapsed.as_secs_f32();
            self.frames_since_last_update = 0;
            self.last_fps_update = now;
            debug!(
                fps = fps.round(),
                frame_count = self.frame_count,
                alpha = frame.uniforms.alpha,
                offset_x = frame.uniforms.offset.x,
                offset_y = frame.uniforms.offset.y,
                texture = ?frame.texture.map(|region| region.0),
                "render stats"
            );
        }
    }
}

fn logical_viewport(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let logical = size.to_logical::<f32>(scale_factor);
    Viewport::new(logical.width.max(1.0), logical.height.max(1.0))
}

/// Background colours are written as sRGB; an sRGB swapchain expects the
/// clear value in linear space.
fn clear_color(background: [f32; 3], color_space: SurfaceColorSpace) -> wgpu::Color {
    let channel = |value: f32| -> f64 {
        let value = f64::from(value.clamp(0.0, 1.0));
        match color_space {
            SurfaceColorSpace::Gamma => value,
            SurfaceColorSpace::Linear => srgb_to_linear(value),
        }
    };
    wgpu::Color {
        r: channel(background[0]),
        g: channel(background[1]),
        b: channel(background[2]),
        a: 1.0,
    }
}

fn srgb_to_linear(value: f64) -> f64 {
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_is_measured_in_logical_pixels() {
        let viewport = logical_viewport(PhysicalSize::new(2560, 1600), 2.0);
        assert_eq!(viewport, Viewport::new(1280.0, 800.0));
    }

    #[test]
    fn gamma_clear_color_passes_through() {
        let color = clear_color([0.5, 0.25, 1.0], SurfaceColorSpace::Gamma);
        assert_eq!((color.r, color.g, color.b, color.a), (0.5, 0.25, 1.0, 1.0));
    }

    #[test]
    fn linear_clear_color_is_decoded() {
        let color = clear_color([0.5, 0.0, 1.0], SurfaceColorSpace::Linear);
        assert!((color.r - 0.214).abs() < 1e-3, "r {}", color.r);
        assert_eq!(color.g, 0.0);
        assert!((color.b - 1.0).abs() < 1e-9);
    }
}
