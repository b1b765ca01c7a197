use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use crate::compile::{compile_fragment_shader, compile_vertex_shader};
use crate::types::{ChannelBindings, ChannelTextureKind, ShaderPaths, CHANNEL_COUNT};

use super::channels::{self, ChannelResources};

/// Two clockwise triangles covering clip space, fed to user vertex shaders
/// at attribute location 0.
const QUAD_VERTICES: [[f32; 2]; 6] = [
    [-1.0, 1.0],
    [1.0, 1.0],
    [1.0, -1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [-1.0, 1.0],
];

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

/// Vertex input of the pipeline: either the quad buffer or the built-in
/// triangle generated from `gl_VertexIndex`.
enum Geometry {
    Quad(wgpu::Buffer),
    Triangle,
}

pub(crate) struct ShaderPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub channel_bind_group: wgpu::BindGroup,
    pub channel_resources: Vec<ChannelResources>,
    geometry: Geometry,
}

impl ShaderPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        shaders: &ShaderPaths,
        channel_bindings: &ChannelBindings,
    ) -> Result<Self> {
        let fragment_code = std::fs::read_to_string(&shaders.fragment).with_context(|| {
            format!(
                "failed to read fragment shader at {}",
                shaders.fragment.display()
            )
        })?;
        let vertex_code = shaders
            .vertex
            .as_ref()
            .map(|path| {
                std::fs::read_to_string(path).with_context(|| {
                    format!("failed to read vertex shader at {}", path.display())
                })
            })
            .transpose()?;

        let channel_kinds = channel_bindings.layout_signature();

        // GLSL errors surface through the device error sink.
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = compile_vertex_shader(device, vertex_code.as_deref());
        let fragment_module = compile_fragment_shader(device, &fragment_code, &channel_kinds);

        let channel_resources = channels::create_resources(device, queue, channel_bindings);
        let channel_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("channel layout"),
            entries: &build_channel_layout_entries(&channel_kinds),
        });
        let channel_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("channel bind group"),
            layout: &channel_layout,
            entries: &build_channel_entries(&channel_resources),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shader pipeline layout"),
            bind_group_layouts: &[uniform_layout, &channel_layout],
            push_constant_ranges: &[],
        });

        let geometry = if vertex_code.is_some() {
            Geometry::Quad(
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("screen quad"),
                    contents: bytemuck::cast_slice(&QUAD_VERTICES),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
            )
        } else {
            Geometry::Triangle
        };
        let quad_layout = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &QUAD_ATTRIBUTES,
        }];
        let vertex_buffers: &[wgpu::VertexBufferLayout] = match geometry {
            Geometry::Quad(_) => &quad_layout,
            Geometry::Triangle => &[],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shader pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            anyhow::bail!(
                "failed to build shader pipeline for {}:\n{error}",
                shaders.fragment.display()
            );
        }

        tracing::info!(
            fragment = %shaders.fragment.display(),
            vertex = ?shaders.vertex.as_ref().map(|path| path.display().to_string()),
            "shader pipeline ready"
        );

        Ok(Self {
            pipeline,
            channel_bind_group,
            channel_resources,
            geometry,
        })
    }

    /// Binds the vertex input and issues the draw call.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        match &self.geometry {
            Geometry::Quad(buffer) => {
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
            }
            Geometry::Triangle => render_pass.draw(0..3, 0..1),
        }
    }
}

pub(crate) fn build_channel_entries(
    resources: &[ChannelResources],
) -> Vec<wgpu::BindGroupEntry<'_>> {
    let mut entries = Vec::with_capacity(resources.len() * 2);
    for (index, resource) in resources.iter().enumerate() {
        entries.push(wgpu::BindGroupEntry {
            binding: (index as u32) * 2,
            resource: wgpu::BindingResource::TextureView(&resource.view),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: (index as u32) * 2 + 1,
            resource: wgpu::BindingResource::Sampler(&resource.sampler),
        });
    }
    entries
}

pub(crate) fn build_channel_layout_entries(
    kinds: &[ChannelTextureKind; CHANNEL_COUNT],
) -> Vec<wgpu::BindGroupLayoutEntry> {
    let mut entries = Vec::with_capacity(CHANNEL_COUNT * 2);
    for (index, kind) in kinds.iter().enumerate() {
        let view_dimension = match kind {
            ChannelTextureKind::Texture2d => wgpu::TextureViewDimension::D2,
            ChannelTextureKind::Cubemap => wgpu::TextureViewDimension::Cube,
        };
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: (index as u32) * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension,
                multisampled: false,
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: (index as u32) * 2 + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }
    entries
}
