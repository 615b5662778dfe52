//! Textured-surface compositing pass.
//!
//! Draws one layer of a texture array per instance as an optionally rotated,
//! rounded, filtered, opacity-blended and soft-shadowed quad, hard-clipped
//! to an axis-aligned bounds rectangle. The pass renders into the blur
//! pass's offscreen intermediate; the owned [`BlurCompositor`] then carries
//! the result to the caller's target.

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::blur::BlurCompositor;
use crate::filter::Filters;
use crate::gpu::{
    self, InstanceBuffer, QuadVertex, STRIP_QUAD_INDICES, STRIP_QUAD_VERTICES,
};
use crate::viewport::Viewport;

bitflags::bitflags! {
    /// Capability flags selecting between the two historical texture-pass
    /// configurations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TextureOptions: u32 {
        /// Composite the analytic soft shadow under transparent content.
        const SHADOW = 1 << 0;
        /// Use the packed instance schema: filters in two vec4s, a depth
        /// value in clip z, identity filters skipped per pixel, and
        /// premultiplied output.
        const PACKED_FILTERS = 1 << 1;
    }
}

impl TextureOptions {
    /// The original shadowed configuration: unpacked schema, straight-alpha
    /// output, filter chain always applied.
    pub fn shadowed() -> Self {
        Self::SHADOW
    }

    /// The original packed configuration: identity filters skipped, no
    /// shadow contribution, premultiplied output.
    pub fn packed() -> Self {
        Self::PACKED_FILTERS
    }
}

/// Per-surface instance record, unpacked schema.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextureInstance {
    pub opacity: f32,
    /// Rotation around the quad center, degrees
    pub rotation: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub hue_rotate: f32,
    pub sepia: f32,
    pub invert: f32,
    pub grayscale: f32,
    /// Non-uniform scale applied to rect position and size
    pub scale: [f32; 2],
    /// Carried but not applied to the position
    pub skew: [f32; 2],
    /// Top-left position and size in pixels: [x, y, width, height]
    pub rect: [f32; 4],
    /// Corner radius percentages: top-left, top-right, bottom-right, bottom-left
    pub radius: [f32; 4],
    /// Clipping bounds in output pixel space: [left, top, right, bottom]
    pub bounds: [f32; 4],
    /// Shadow offset (x, y) and softness
    pub shadow: [f32; 3],
}

impl TextureInstance {
    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<TextureInstance>() as u64,
            step_mode: VertexStepMode::Instance,
            attributes: &[
                // opacity
                VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: VertexFormat::Float32,
                },
                // rotation
                VertexAttribute {
                    offset: 4,
                    shader_location: 2,
                    format: VertexFormat::Float32,
                },
                // brightness
                VertexAttribute {
                    offset: 8,
                    shader_location: 3,
                    format: VertexFormat::Float32,
                },
                // contrast
                VertexAttribute {
                    offset: 12,
                    shader_location: 4,
                    format: VertexFormat::Float32,
                },
                // saturation
                VertexAttribute {
                    offset: 16,
                    shader_location: 5,
                    format: VertexFormat::Float32,
                },
                // hue_rotate
                VertexAttribute {
                    offset: 20,
                    shader_location: 6,
                    format: VertexFormat::Float32,
                },
                // sepia
                VertexAttribute {
                    offset: 24,
                    shader_location: 7,
                    format: VertexFormat::Float32,
                },
                // invert
                VertexAttribute {
                    offset: 28,
                    shader_location: 8,
                    format: VertexFormat::Float32,
                },
                // grayscale
                VertexAttribute {
                    offset: 32,
                    shader_location: 9,
                    format: VertexFormat::Float32,
                },
                // scale
                VertexAttribute {
                    offset: 36,
                    shader_location: 10,
                    format: VertexFormat::Float32x2,
                },
                // skew
                VertexAttribute {
                    offset: 44,
                    shader_location: 11,
                    format: VertexFormat::Float32x2,
                },
                // rect
                VertexAttribute {
                    offset: 52,
                    shader_location: 12,
                    format: VertexFormat::Float32x4,
                },
                // radius
                VertexAttribute {
                    offset: 68,
                    shader_location: 13,
                    format: VertexFormat::Float32x4,
                },
                // bounds
                VertexAttribute {
                    offset: 84,
                    shader_location: 14,
                    format: VertexFormat::Float32x4,
                },
                // shadow
                VertexAttribute {
                    offset: 100,
                    shader_location: 15,
                    format: VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-surface instance record, packed schema.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedTextureInstance {
    /// [opacity, brightness, contrast, saturation]
    pub filters1: [f32; 4],
    /// [hue_rotate, sepia, invert, grayscale]
    pub filters2: [f32; 4],
    /// [rotation degrees, depth]
    pub rotation_depth: [f32; 2],
    pub scale: [f32; 2],
    pub skew: [f32; 2],
    pub rect: [f32; 4],
    pub radius: [f32; 4],
    pub bounds: [f32; 4],
    pub shadow: [f32; 3],
}

impl PackedTextureInstance {
    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<PackedTextureInstance>() as u64,
            step_mode: VertexStepMode::Instance,
            attributes: &[
                // filters1
                VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: VertexFormat::Float32x4,
                },
                // filters2
                VertexAttribute {
                    offset: 16,
                    shader_location: 2,
                    format: VertexFormat::Float32x4,
                },
                // rotation_depth
                VertexAttribute {
                    offset: 32,
                    shader_location: 3,
                    format: VertexFormat::Float32x2,
                },
                // scale
                VertexAttribute {
                    offset: 40,
                    shader_location: 4,
                    format: VertexFormat::Float32x2,
                },
                // skew
                VertexAttribute {
                    offset: 48,
                    shader_location: 5,
                    format: VertexFormat::Float32x2,
                },
                // rect
                VertexAttribute {
                    offset: 56,
                    shader_location: 6,
                    format: VertexFormat::Float32x4,
                },
                // radius
                VertexAttribute {
                    offset: 72,
                    shader_location: 7,
                    format: VertexFormat::Float32x4,
                },
                // bounds
                VertexAttribute {
                    offset: 88,
                    shader_location: 8,
                    format: VertexFormat::Float32x4,
                },
                // shadow
                VertexAttribute {
                    offset: 104,
                    shader_location: 9,
                    format: VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Axis-aligned clipping bounds in output pixel space.
#[derive(Clone, Debug)]
pub struct SurfaceBounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl SurfaceBounds {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Pixel content and per-surface filter state for one drawn element.
#[derive(Debug, Clone)]
pub struct SurfaceContent<'a> {
    /// Logical size in pixels
    pub width: f32,
    pub height: f32,
    /// RGBA8 bytes, straight alpha, row-major
    pub bytes: &'a [u8],
    /// Non-uniform scale applied on top of the surface scale
    pub scale: [f32; 2],
    pub filters: Filters,
}

impl<'a> Default for SurfaceContent<'a> {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            bytes: &[],
            scale: [1.0, 1.0],
            filters: Filters::default(),
        }
    }
}

impl<'a> SurfaceContent<'a> {
    pub fn new(width: f32, height: f32, bytes: &'a [u8]) -> Self {
        Self {
            width,
            height,
            bytes,
            scale: [1.0, 1.0],
            filters: Filters::default(),
        }
    }
}

/// One drawable element of the texture pass.
pub struct TextureSurface<'a> {
    pub left: f32,
    pub top: f32,
    pub scale: f32,
    /// Rotation around the quad center, degrees
    pub rotation: f32,
    pub bounds: SurfaceBounds,
    /// Carried but not applied (see the instance schema)
    pub skew: [f32; 2],
    /// Corner radius percentages: top-left, top-right, bottom-right, bottom-left
    pub radius: [f32; 4],
    /// Shadow offset (x, y) and softness; all zero disables the shadow
    pub shadow: [f32; 3],
    pub depth: f32,
    pub content: SurfaceContent<'a>,
}

impl<'a> TextureSurface<'a> {
    /// A surface at `(left, top)` with no rotation, shadow or filters.
    pub fn simple(
        content: SurfaceContent<'a>,
        left: f32,
        top: f32,
        bounds: SurfaceBounds,
        radius: [f32; 4],
        depth: f32,
    ) -> Self {
        Self {
            left,
            top,
            scale: 1.0,
            rotation: 0.0,
            bounds,
            skew: [0.0, 0.0],
            radius,
            shadow: [0.0, 0.0, 0.0],
            depth,
            content,
        }
    }
}

enum InstanceStore {
    Unpacked(InstanceBuffer<TextureInstance>),
    Packed(InstanceBuffer<PackedTextureInstance>),
}

/// The texture compositing pass.
pub struct TextureCompositor {
    options: TextureOptions,
    pipeline: wgpu::RenderPipeline,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instances: InstanceStore,
    blur: BlurCompositor,
    max_texture_width: u32,
    max_texture_height: u32,
    prepared_instances: usize,
}

impl TextureCompositor {
    /// Create the pass with square per-layer textures of `max_surface_size`
    /// and the default layer count.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        options: TextureOptions,
        max_surface_size: u32,
        width: u32,
        height: u32,
    ) -> Self {
        Self::with_layers(
            device,
            format,
            options,
            max_surface_size,
            width,
            height,
            256,
        )
    }

    pub fn with_layers(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        options: TextureOptions,
        max_surface_size: u32,
        width: u32,
        height: u32,
        max_layers: u32,
    ) -> Self {
        Self::with_texture_dimensions(
            device,
            format,
            options,
            max_surface_size,
            max_surface_size,
            width,
            height,
            max_layers,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_texture_dimensions(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        options: TextureOptions,
        texture_width: u32,
        texture_height: u32,
        width: u32,
        height: u32,
        max_layers: u32,
    ) -> Self {
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2Array,
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
                ],
                label: Some("Texture Compositor Bind Group Layout"),
            });

        let viewport_bind_group_layout = Viewport::bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Texture Compositor Pipeline Layout"),
            bind_group_layouts: &[&texture_bind_group_layout, &viewport_bind_group_layout],
            immediate_size: 0,
        });

        let packed = options.contains(TextureOptions::PACKED_FILTERS);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Texture Compositor Shader"),
            source: wgpu::ShaderSource::Wgsl(if packed {
                include_str!("texture_packed_shader.wgsl").into()
            } else {
                include_str!("texture_shader.wgsl").into()
            }),
        });

        let instance_layout = if packed {
            PackedTextureInstance::desc()
        } else {
            TextureInstance::desc()
        };

        // Packed output is premultiplied; the unpacked schema blends
        // straight alpha.
        let blend = if packed {
            wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING
        } else {
            wgpu::BlendState::ALPHA_BLENDING
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Texture Compositor Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::desc(), instance_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend),
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
        });

        log::info!(
            "texture compositor: {}x{} surface array, {} layers, packed={}",
            texture_width,
            texture_height,
            max_layers,
            packed
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Texture Compositor Surface Array"),
            size: wgpu::Extent3d {
                width: texture_width,
                height: texture_height,
                depth_or_array_layers: max_layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            base_array_layer: 0,
            array_layer_count: Some(max_layers),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture Compositor Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("Texture Compositor Bind Group"),
        });

        let instances = if packed {
            InstanceStore::Packed(InstanceBuffer::new(
                device,
                "Texture Compositor Instance Buffer",
                16,
            ))
        } else {
            InstanceStore::Unpacked(InstanceBuffer::new(
                device,
                "Texture Compositor Instance Buffer",
                16,
            ))
        };

        Self {
            options,
            pipeline,
            texture,
            bind_group,
            vertex_buffer: gpu::quad_vertex_buffer(device, STRIP_QUAD_VERTICES),
            index_buffer: gpu::quad_index_buffer(device, STRIP_QUAD_INDICES),
            instances,
            blur: BlurCompositor::new(device, format, width, height),
            max_texture_width: texture_width,
            max_texture_height: texture_height,
            prepared_instances: 0,
        }
    }

    pub fn options(&self) -> TextureOptions {
        self.options
    }

    /// Resize the blur offscreen pair to the new target size.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) {
        self.blur.resize(device, format, width, height);
    }

    /// Upload surface bytes and instance records for this frame's draw.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surfaces: &[TextureSurface],
    ) {
        self.prepared_instances = surfaces.len();

        if surfaces.is_empty() {
            return;
        }

        for (layer, surface) in surfaces.iter().enumerate() {
            self.upload_surface(queue, layer as u32, surface);
        }

        match &mut self.instances {
            InstanceStore::Unpacked(buffer) => {
                let instances = surfaces
                    .iter()
                    .map(|surface| {
                        let filters = &surface.content.filters;
                        TextureInstance {
                            opacity: filters.opacity,
                            rotation: surface.rotation,
                            brightness: filters.brightness,
                            contrast: filters.contrast,
                            saturation: filters.saturation,
                            hue_rotate: filters.hue_rotate,
                            sepia: filters.sepia,
                            invert: filters.invert,
                            grayscale: filters.grayscale,
                            scale: surface.content.scale,
                            skew: surface.skew,
                            rect: [
                                surface.left,
                                surface.top,
                                surface.content.width,
                                surface.content.height,
                            ],
                            radius: surface.radius,
                            bounds: [
                                surface.bounds.left as f32,
                                surface.bounds.top as f32,
                                surface.bounds.right as f32,
                                surface.bounds.bottom as f32,
                            ],
                            shadow: surface.shadow,
                        }
                    })
                    .collect::<Vec<_>>();
                buffer.upload(device, queue, &instances);
            }
            InstanceStore::Packed(buffer) => {
                let instances = surfaces
                    .iter()
                    .map(|surface| {
                        let filters = &surface.content.filters;
                        PackedTextureInstance {
                            filters1: [
                                filters.opacity,
                                filters.brightness,
                                filters.contrast,
                                filters.saturation,
                            ],
                            filters2: [
                                filters.hue_rotate,
                                filters.sepia,
                                filters.invert,
                                filters.grayscale,
                            ],
                            rotation_depth: [surface.rotation, surface.depth],
                            scale: surface.content.scale,
                            skew: surface.skew,
                            rect: [
                                surface.left,
                                surface.top,
                                surface.content.width,
                                surface.content.height,
                            ],
                            radius: surface.radius,
                            bounds: [
                                surface.bounds.left as f32,
                                surface.bounds.top as f32,
                                surface.bounds.right as f32,
                                surface.bounds.bottom as f32,
                            ],
                            shadow: surface.shadow,
                        }
                    })
                    .collect::<Vec<_>>();
                buffer.upload(device, queue, &instances);
            }
        }

        self.blur.prepare(device, queue, surfaces);
    }

    /// Write one surface's bytes into its texture array layer, padding rows
    /// to wgpu's 256-byte alignment when needed.
    fn upload_surface(&self, queue: &wgpu::Queue, layer: u32, surface: &TextureSurface) {
        let width = (surface.content.width as u32).min(self.max_texture_width);
        let height = (surface.content.height as u32).min(self.max_texture_height);
        if width == 0 || height == 0 {
            return;
        }

        let unpadded_bytes_per_row = 4 * width;
        let bytes_per_row = unpadded_bytes_per_row.div_ceil(256) * 256;

        let destination = wgpu::TexelCopyTextureInfo {
            texture: &self.texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        };
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        if bytes_per_row == unpadded_bytes_per_row {
            queue.write_texture(
                destination,
                surface.content.bytes,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: None,
                },
                extent,
            );
            return;
        }

        let mut padded = Vec::with_capacity((bytes_per_row * height) as usize);
        for row in 0..height {
            let start = (row * unpadded_bytes_per_row) as usize;
            let end = start + unpadded_bytes_per_row as usize;
            if end > surface.content.bytes.len() {
                break;
            }
            padded.extend_from_slice(&surface.content.bytes[start..end]);
            padded.resize(
                padded.len() + (bytes_per_row - unpadded_bytes_per_row) as usize,
                0,
            );
        }

        queue.write_texture(
            destination,
            &padded,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: None,
            },
            extent,
        );
    }

    /// Draw the prepared surfaces into the blur intermediate, then run the
    /// two blur passes toward `target_view`.
    pub fn render(
        &self,
        target_view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        viewport: &Viewport,
    ) {
        if self.prepared_instances == 0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Texture Compositor Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.blur.intermediate_view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_bind_group(1, &viewport.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.instances {
            InstanceStore::Unpacked(buffer) => render_pass.set_vertex_buffer(1, buffer.slice()),
            InstanceStore::Packed(buffer) => render_pass.set_vertex_buffer(1, buffer.slice()),
        }
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(
            0..STRIP_QUAD_INDICES.len() as u32,
            0,
            0..self.prepared_instances as u32,
        );

        drop(render_pass);

        self.blur.render(
            target_view,
            encoder,
            viewport,
            &self.vertex_buffer,
            &self.index_buffer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layouts() {
        assert_eq!(std::mem::size_of::<TextureInstance>(), 112);
        assert_eq!(std::mem::size_of::<PackedTextureInstance>(), 116);
        assert_eq!(TextureInstance::desc().attributes.len(), 15);
        assert_eq!(PackedTextureInstance::desc().attributes.len(), 9);
    }

    #[test]
    fn test_historical_configurations() {
        assert!(TextureOptions::shadowed().contains(TextureOptions::SHADOW));
        assert!(!TextureOptions::shadowed().contains(TextureOptions::PACKED_FILTERS));
        assert!(TextureOptions::packed().contains(TextureOptions::PACKED_FILTERS));
        assert!(!TextureOptions::packed().contains(TextureOptions::SHADOW));
    }

    #[test]
    fn test_surface_bounds_extent() {
        let bounds = SurfaceBounds {
            left: 10,
            top: 20,
            right: 110,
            bottom: 70,
        };
        assert_eq!(bounds.width(), 100);
        assert_eq!(bounds.height(), 50);
    }
}
