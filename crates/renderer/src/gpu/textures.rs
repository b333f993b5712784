use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::{flip_vertical_in_place, resize, FilterType};
use image::GenericImageView;
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::types::RegionVisual;

use super::context::SurfaceColorSpace;

/// Neutral stand-in shown when a region's image is missing or unreadable.
const PLACEHOLDER_TEXEL: [u8; 4] = [128, 128, 128, 255];

pub(crate) struct RegionTexture {
    _texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
    pub size: (u32, u32),
}

pub(crate) fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("region texture layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Uploads one texture per region, in region order, so a [`motion::RegionId`]
/// indexes straight into the returned vector. Images larger than
/// `max_dimension` on either axis are downscaled to fit.
pub(crate) fn create_region_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    regions: &[RegionVisual],
    color_space: SurfaceColorSpace,
    max_dimension: u32,
) -> Vec<RegionTexture> {
    let sampler = create_sampler(device);
    regions
        .iter()
        .enumerate()
        .map(|(index, region)| {
            let loaded = match region.texture.as_deref() {
                Some(path) => match load_rgba(path) {
                    Ok(image) => Some(fit_to_limit(image, max_dimension, &region.name)),
                    Err(error) => {
                        tracing::warn!(
                            region = %region.name,
                            path = %path.display(),
                            error = %error,
                            "failed to load region texture; using placeholder"
                        );
                        None
                    }
                },
                None => {
                    tracing::warn!(region = %region.name, "region has no texture; using placeholder");
                    None
                }
            };
            let (width, height, pixels) = match loaded {
                Some(image) => {
                    let (width, height) = image.dimensions();
                    (width, height, image.into_raw())
                }
                None => (1, 1, PLACEHOLDER_TEXEL.to_vec()),
            };
            upload(
                device,
                queue,
                layout,
                &sampler,
                index,
                (width, height),
                &pixels,
                color_space,
            )
        })
        .collect()
}

fn load_rgba(path: &Path) -> Result<image::RgbaImage> {
    // Cached downloads carry no meaningful extension, so sniff the format.
    let image = image::ImageReader::open(path)
        .with_context(|| format!("failed to open texture at {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("failed to read texture at {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode texture at {}", path.display()))?;
    let (width, height) = image.dimensions();
    tracing::debug!(path = %path.display(), width, height, "decoded region texture");
    let mut rgba = image.to_rgba8();
    flip_vertical_in_place(&mut rgba);
    Ok(rgba)
}

/// Size that keeps the aspect ratio while fitting within `max_dimension`,
/// or `None` when the image already fits.
fn scaled_size((width, height): (u32, u32), max_dimension: u32) -> Option<(u32, u32)> {
    let max_dimension = max_dimension.max(1);
    if width <= max_dimension && height <= max_dimension {
        return None;
    }
    let scale = max_dimension as f64 / width.max(height) as f64;
    let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_dimension);
    Some((fit(width), fit(height)))
}

fn fit_to_limit(image: image::RgbaImage, max_dimension: u32, region: &str) -> image::RgbaImage {
    let Some((width, height)) = scaled_size(image.dimensions(), max_dimension) else {
        return image;
    };
    tracing::warn!(
        region,
        original_width = image.width(),
        original_height = image.height(),
        width,
        height,
        max_dimension,
        "region texture exceeds device limit; downscaling"
    );
    resize(&image, width, height, FilterType::Triangle)
}

#[allow(clippy::too_many_arguments)]
fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    index: usize,
    (width, height): (u32, u32),
    pixels: &[u8],
    color_space: SurfaceColorSpace,
) -> RegionTexture {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(&format!("region texture #{index}")),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(color_space),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        pixels,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("region texture bind group #{index}")),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    RegionTexture {
        _texture: texture,
        bind_group,
        size: (width, height),
    }
}

fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("region sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

fn texture_format(color_space: SurfaceColorSpace) -> wgpu::TextureFormat {
    match color_space {
        SurfaceColorSpace::Gamma => wgpu::TextureFormat::Rgba8Unorm,
        SurfaceColorSpace::Linear => wgpu::TextureFormat::Rgba8UnormSrgb,
    }
}
