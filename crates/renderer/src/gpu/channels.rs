use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use image::imageops::flip_vertical_in_place;
use image::GenericImageView;
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::types::{
    ChannelBindings, ChannelSource, ChannelTextureKind, CHANNEL_COUNT, CUBEMAP_FACE_ALIASES,
    CUBEMAP_FACE_STEMS,
};

const CHANNEL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const FACE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub(crate) struct ChannelResources {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// Width, height and layer count, as exposed through `uChannelResolution`.
    pub resolution: [f32; 4],
}

/// Loads every channel. Failed loads are logged and replaced with a
/// placeholder of the same dimensionality so the pipeline layout holds.
pub(crate) fn create_resources(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    bindings: &ChannelBindings,
) -> Vec<ChannelResources> {
    let mut resources = Vec::with_capacity(CHANNEL_COUNT);
    for (index, binding) in bindings.slots().iter().enumerate() {
        let resource = match binding {
            Some(ChannelSource::Texture { path }) => {
                load_texture_channel(device, queue, index, path).unwrap_or_else(|error| {
                    tracing::warn!(
                        channel = index,
                        path = %path.display(),
                        error = %format!("{error:#}"),
                        "failed to load texture channel; using placeholder"
                    );
                    create_placeholder(device, queue, index, ChannelTextureKind::Texture2d)
                })
            }
            Some(ChannelSource::Cubemap { directory }) => {
                load_cubemap_channel(device, queue, index, directory).unwrap_or_else(|error| {
                    tracing::warn!(
                        channel = index,
                        dir = %directory.display(),
                        error = %format!("{error:#}"),
                        "failed to load cubemap channel; using placeholder"
                    );
                    create_placeholder(device, queue, index, ChannelTextureKind::Cubemap)
                })
            }
            None => create_placeholder(device, queue, index, ChannelTextureKind::Texture2d),
        };
        resources.push(resource);
    }
    resources
}

fn create_placeholder(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    index: usize,
    kind: ChannelTextureKind,
) -> ChannelResources {
    let layers = match kind {
        ChannelTextureKind::Texture2d => 1,
        ChannelTextureKind::Cubemap => 6,
    };
    let mut data = Vec::with_capacity(layers as usize * 4);
    for layer in 0..layers {
        let value = if layer % 2 == 0 { 255 } else { 0 };
        data.extend([value, value, value, 255]);
    }
    upload(
        device,
        queue,
        &format!("placeholder channel #{index}"),
        (1, 1),
        kind,
        &data,
    )
}

fn load_texture_channel(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    index: usize,
    path: &Path,
) -> Result<ChannelResources> {
    let image = image::open(path)
        .with_context(|| format!("failed to open texture at {}", path.display()))?;
    let (width, height) = image.dimensions();
    check_dimensions((width, height), &device.limits())
        .with_context(|| format!("texture at {} cannot be uploaded", path.display()))?;
    let mut rgba = image.to_rgba8();
    flip_vertical_in_place(&mut rgba);

    tracing::debug!(channel = index, width, height, "loaded texture channel");
    Ok(upload(
        device,
        queue,
        &format!("channel texture #{index}"),
        (width, height),
        ChannelTextureKind::Texture2d,
        &rgba,
    ))
}

fn load_cubemap_channel(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    index: usize,
    directory: &Path,
) -> Result<ChannelResources> {
    let face_paths = cubemap_face_paths(directory)?;

    let mut size = None;
    let mut data = Vec::new();
    for path in &face_paths {
        let image = image::open(path)
            .with_context(|| format!("failed to open cubemap face {}", path.display()))?;
        let dimensions = image.dimensions();
        if dimensions.0 != dimensions.1 {
            anyhow::bail!(
                "cubemap face {} is not square ({}x{})",
                path.display(),
                dimensions.0,
                dimensions.1
            );
        }
        match size {
            None => {
                check_dimensions(dimensions, &device.limits()).with_context(|| {
                    format!("cubemap face {} cannot be uploaded", path.display())
                })?;
                size = Some(dimensions);
            }
            Some(expected) if expected != dimensions => anyhow::bail!(
                "cubemap face {} is {}x{}, expected {}x{}",
                path.display(),
                dimensions.0,
                dimensions.1,
                expected.0,
                expected.1
            ),
            Some(_) => {}
        }
        let mut rgba = image.to_rgba8();
        flip_vertical_in_place(&mut rgba);
        data.extend_from_slice(&rgba);
    }

    let (width, height) = size.ok_or_else(|| anyhow!("cubemap has no faces"))?;
    tracing::debug!(channel = index, width, "loaded cubemap channel");
    Ok(upload(
        device,
        queue,
        &format!("cubemap texture #{index}"),
        (width, height),
        ChannelTextureKind::Cubemap,
        &data,
    ))
}

/// Rejects images the device cannot hold; callers then use a placeholder.
fn check_dimensions((width, height): (u32, u32), limits: &wgpu::Limits) -> Result<()> {
    if width == 0 || height == 0 {
        anyhow::bail!("image is empty ({width}x{height})");
    }
    let max = limits.max_texture_dimension_2d;
    if width > max || height > max {
        anyhow::bail!("image is {width}x{height}, device limit is {max}");
    }
    Ok(())
}

/// Resolves the six face images of a cubemap directory, accepting either
/// `posx..negz` or `right..back` stems.
pub(crate) fn cubemap_face_paths(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        anyhow::bail!(
            "cubemap directory {} is missing or not a directory",
            directory.display()
        );
    }

    CUBEMAP_FACE_STEMS
        .iter()
        .zip(CUBEMAP_FACE_ALIASES.iter())
        .map(|(stem, alias)| {
            find_face(directory, stem)
                .or_else(|| find_face(directory, alias))
                .ok_or_else(|| {
                    anyhow!(
                        "cubemap face '{stem}' (or '{alias}') missing in {}",
                        directory.display()
                    )
                })
        })
        .collect()
}

fn find_face(directory: &Path, stem: &str) -> Option<PathBuf> {
    FACE_EXTENSIONS
        .iter()
        .map(|ext| directory.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.exists())
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    (width, height): (u32, u32),
    kind: ChannelTextureKind,
    data: &[u8],
) -> ChannelResources {
    let layers = match kind {
        ChannelTextureKind::Texture2d => 1,
        ChannelTextureKind::Cubemap => 6,
    };
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CHANNEL_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        data,
    );

    let view = match kind {
        ChannelTextureKind::Texture2d => texture.create_view(&wgpu::TextureViewDescriptor::default()),
        ChannelTextureKind::Cubemap => texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            array_layer_count: Some(6),
            ..Default::default()
        }),
    };
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    ChannelResources {
        _texture: texture,
        view,
        sampler,
        resolution: [width as f32, height as f32, layers as f32, 0.0],
    }
}
