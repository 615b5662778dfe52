//! Two-pass separable Gaussian blur over an offscreen image.
//!
//! The texture pass renders into this pass's intermediate texture; the
//! horizontal pass reads it into a second offscreen, and the vertical pass
//! reads that into the caller's target. Sigma 0 turns both passes into a
//! plain passthrough sample.

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::gpu::InstanceBuffer;
use crate::kernel::KernelTable;
use crate::texture::TextureSurface;
use crate::viewport::Viewport;
use wgpu::util::DeviceExt;

/// Per-draw blur parameters.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurInstance {
    /// Integer sigma class; 0 means passthrough
    pub sigma: u32,
    /// Baseline color the accumulator starts from
    pub tint: [f32; 4],
    /// Carried but not read by the pixel stage
    pub rect: [f32; 4],
}

impl BlurInstance {
    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<BlurInstance>() as u64,
            step_mode: VertexStepMode::Instance,
            attributes: &[
                // sigma
                VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: VertexFormat::Uint32,
                },
                // tint
                VertexAttribute {
                    offset: 4,
                    shader_location: 2,
                    format: VertexFormat::Float32x4,
                },
                // rect
                VertexAttribute {
                    offset: 20,
                    shader_location: 3,
                    format: VertexFormat::Float32x4,
                },
            ],
        }
    }

    /// The passthrough record uploaded when no surface requests a blur.
    pub fn passthrough() -> Self {
        Self {
            sigma: 0,
            tint: [0.0, 0.0, 0.0, 0.0],
            rect: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

struct OffscreenTarget {
    view: wgpu::TextureView,
}

impl OffscreenTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D2),
            ..Default::default()
        });
        Self { view }
    }
}

struct KernelBuffers {
    starts: wgpu::Buffer,
    weights: wgpu::Buffer,
    offsets: wgpu::Buffer,
}

/// The separable blur pass.
pub struct BlurCompositor {
    horizontal_pipeline: wgpu::RenderPipeline,
    vertical_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    intermediate: OffscreenTarget,
    output: OffscreenTarget,
    kernels: KernelTable,
    kernel_buffers: Option<KernelBuffers>,
    bind_groups: Option<[wgpu::BindGroup; 2]>,
    instances: InstanceBuffer<BlurInstance>,
}

impl BlurCompositor {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
            label: Some("Blur Compositor Bind Group Layout"),
        });

        let viewport_bind_group_layout = Viewport::bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blur Compositor Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout, &viewport_bind_group_layout],
            immediate_size: 0,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blur Compositor Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("blur_shader.wgsl").into()),
        });

        let make_pipeline = |entry_point: &str, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[crate::gpu::QuadVertex::desc(), BlurInstance::desc()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(entry_point),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        // Fractional tap offsets rely on linear filtering to read two
        // texels per sample.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Blur Compositor Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            horizontal_pipeline: make_pipeline(
                "fs_horizontal_blur",
                "Blur Compositor Horizontal Pipeline",
            ),
            vertical_pipeline: make_pipeline(
                "fs_vertical_blur",
                "Blur Compositor Vertical Pipeline",
            ),
            bind_group_layout,
            sampler,
            intermediate: OffscreenTarget::new(
                device,
                format,
                width,
                height,
                "Blur Intermediate Texture",
            ),
            output: OffscreenTarget::new(device, format, width, height, "Blur Output Texture"),
            kernels: KernelTable::new(),
            kernel_buffers: None,
            bind_groups: None,
            instances: InstanceBuffer::new(device, "Blur Compositor Instance Buffer", 4),
        }
    }

    /// The offscreen texture the texture pass renders into.
    pub fn intermediate_view(&self) -> &wgpu::TextureView {
        &self.intermediate.view
    }

    /// Registered kernel data, shared by both directions.
    pub fn kernels(&self) -> &KernelTable {
        &self.kernels
    }

    /// Recreate the offscreen pair at a new target size.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) {
        self.intermediate =
            OffscreenTarget::new(device, format, width, height, "Blur Intermediate Texture");
        self.output = OffscreenTarget::new(device, format, width, height, "Blur Output Texture");
        // Bind groups hold the old views.
        self.bind_groups = None;
    }

    /// Register kernels and upload the per-draw instance records.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surfaces: &[TextureSurface],
    ) {
        let known = self.kernels.entries().len();
        for surface in surfaces {
            self.kernels.register(surface.content.filters.blur);
        }
        if self.kernels.entries().len() != known || self.kernel_buffers.is_none() {
            self.kernel_buffers = Some(self.create_kernel_buffers(device));
            self.bind_groups = None;
        }

        let mut instances = surfaces
            .iter()
            .map(|surface| BlurInstance {
                sigma: surface.content.filters.blur,
                tint: surface.content.filters.tint,
                rect: [
                    surface.left,
                    surface.top,
                    surface.content.width,
                    surface.content.height,
                ],
            })
            .collect::<Vec<_>>();

        // The chain must still run as a passthrough when nothing blurs.
        if instances.is_empty() {
            instances.push(BlurInstance::passthrough());
        }

        self.instances.upload(device, queue, &instances);

        if self.bind_groups.is_none() {
            if let Some(kernels) = &self.kernel_buffers {
                self.bind_groups = Some(self.create_bind_groups(device, kernels));
            }
        }
    }

    fn create_kernel_buffers(&self, device: &wgpu::Device) -> KernelBuffers {
        let starts = self.kernels.dense_starts();
        let weights = self.kernels.weights();
        let offsets = self.kernels.offsets();

        // Storage bindings reject empty buffers; keep one zero element.
        let weights: &[f32] = if weights.is_empty() { &[0.0] } else { weights };
        let offsets: &[f32] = if offsets.is_empty() { &[0.0] } else { offsets };

        KernelBuffers {
            starts: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Blur Kernel Starts"),
                contents: bytemuck::cast_slice(&starts),
                usage: wgpu::BufferUsages::STORAGE,
            }),
            weights: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Blur Kernel Weights"),
                contents: bytemuck::cast_slice(weights),
                usage: wgpu::BufferUsages::STORAGE,
            }),
            offsets: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Blur Kernel Offsets"),
                contents: bytemuck::cast_slice(offsets),
                usage: wgpu::BufferUsages::STORAGE,
            }),
        }
    }

    fn create_bind_groups(
        &self,
        device: &wgpu::Device,
        kernels: &KernelBuffers,
    ) -> [wgpu::BindGroup; 2] {
        let make = |source: &wgpu::TextureView, label: &str| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: kernels.starts.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: kernels.weights.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: kernels.offsets.as_entire_binding(),
                    },
                ],
                label: Some(label),
            })
        };

        [
            make(&self.intermediate.view, "Blur Horizontal Bind Group"),
            make(&self.output.view, "Blur Vertical Bind Group"),
        ]
    }

    /// Run the horizontal then vertical pass. The vertical pass reads what
    /// the horizontal pass just wrote, so the two are encoded in order.
    pub fn render(
        &self,
        target_view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        viewport: &Viewport,
        vertex_buffer: &wgpu::Buffer,
        index_buffer: &wgpu::Buffer,
    ) {
        let Some([horizontal_bind_group, vertical_bind_group]) = self.bind_groups.as_ref() else {
            return;
        };

        let mut horizontal_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blur Horizontal Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.output.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });

        horizontal_pass.set_pipeline(&self.horizontal_pipeline);
        horizontal_pass.set_bind_group(0, horizontal_bind_group, &[]);
        horizontal_pass.set_bind_group(1, &viewport.bind_group, &[]);
        horizontal_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        horizontal_pass.set_vertex_buffer(1, self.instances.slice());
        horizontal_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        // Fullscreen effect: one quad regardless of the surface count.
        horizontal_pass.draw_indexed(0..4, 0, 0..1);
        drop(horizontal_pass);

        let mut vertical_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blur Vertical Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });

        vertical_pass.set_pipeline(&self.vertical_pipeline);
        vertical_pass.set_bind_group(0, vertical_bind_group, &[]);
        vertical_pass.set_bind_group(1, &viewport.bind_group, &[]);
        vertical_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        vertical_pass.set_vertex_buffer(1, self.instances.slice());
        vertical_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        vertical_pass.draw_indexed(0..4, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_instance_layout() {
        assert_eq!(std::mem::size_of::<BlurInstance>(), 36);
        assert_eq!(BlurInstance::desc().attributes.len(), 3);
    }

    #[test]
    fn test_passthrough_instance() {
        let instance = BlurInstance::passthrough();
        assert_eq!(instance.sigma, 0);
        assert_eq!(instance.tint, [0.0; 4]);
    }
}
