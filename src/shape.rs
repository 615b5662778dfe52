//! Rounded-rectangle shape compositing pass.
//!
//! Draws a filled rounded rectangle with an independently colored and sized
//! border ring. Output is premultiplied and carries an explicit depth value
//! so overlapping shapes resolve through the depth test instead of draw
//! order.

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::gpu::{self, InstanceBuffer, LIST_QUAD_INDICES, LIST_QUAD_VERTICES, QuadVertex};
use crate::viewport::Viewport;

/// Per-shape instance record.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeInstance {
    /// Content-box top-left position in pixels
    pub rect_pos: [f32; 2],
    /// Content-box size in pixels
    pub rect_size: [f32; 2],
    /// Straight-alpha sRGB fill color
    pub rect_color: [f32; 4],
    /// Corner radii: top-left, top-right, bottom-right, bottom-left
    pub border_radius: [f32; 4],
    /// Border thicknesses: left, right, top, bottom
    pub border_size: [f32; 4],
    /// Straight-alpha sRGB border color
    pub border_color: [f32; 4],
    /// Uniform scale
    pub scale: f32,
    /// Clip-space depth for depth-test ordering
    pub depth: f32,
}

impl ShapeInstance {
    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as u64,
            step_mode: VertexStepMode::Instance,
            attributes: &[
                // rect_pos
                VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: VertexFormat::Float32x2,
                },
                // rect_size
                VertexAttribute {
                    offset: 8,
                    shader_location: 2,
                    format: VertexFormat::Float32x2,
                },
                // rect_color
                VertexAttribute {
                    offset: 16,
                    shader_location: 3,
                    format: VertexFormat::Float32x4,
                },
                // border_radius
                VertexAttribute {
                    offset: 32,
                    shader_location: 4,
                    format: VertexFormat::Float32x4,
                },
                // border_size
                VertexAttribute {
                    offset: 48,
                    shader_location: 5,
                    format: VertexFormat::Float32x4,
                },
                // border_color
                VertexAttribute {
                    offset: 64,
                    shader_location: 6,
                    format: VertexFormat::Float32x4,
                },
                // scale
                VertexAttribute {
                    offset: 80,
                    shader_location: 7,
                    format: VertexFormat::Float32,
                },
                // depth
                VertexAttribute {
                    offset: 84,
                    shader_location: 8,
                    format: VertexFormat::Float32,
                },
            ],
        }
    }
}

/// Outer-box size of a shape: the content box grown by its border sides.
pub fn outer_size(rect_size: [f32; 2], border_size: [f32; 4]) -> [f32; 2] {
    let [left, right, top, bottom] = border_size;
    [rect_size[0] + left + right, rect_size[1] + top + bottom]
}

/// Outer corner radii: each requested radius grown by its two adjacent
/// border sides and clamped to half the smaller outer dimension so
/// opposing corners cannot overlap. Corner order: top-left, top-right,
/// bottom-right, bottom-left.
pub fn outer_corner_radii(border_radius: [f32; 4], rect_size: [f32; 2], border_size: [f32; 4]) -> [f32; 4] {
    let [left, right, top, bottom] = border_size;
    let outer = outer_size(rect_size, border_size);
    let max_radius = 0.5 * outer[0].min(outer[1]);
    [
        (border_radius[0] + left + top).min(max_radius),
        (border_radius[1] + right + top).min(max_radius),
        (border_radius[2] + right + bottom).min(max_radius),
        (border_radius[3] + left + bottom).min(max_radius),
    ]
}

/// Create a depth attachment matching the render target, for hosts driving
/// this pass.
pub fn create_depth_buffer(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Shape Depth Buffer"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    (texture, view)
}

/// The shape compositing pass.
pub struct ShapeCompositor {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instances: InstanceBuffer<ShapeInstance>,
}

impl ShapeCompositor {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let viewport_bind_group_layout = Viewport::bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shape Compositor Pipeline Layout"),
            bind_group_layouts: &[&viewport_bind_group_layout],
            immediate_size: 0,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shape Compositor Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shape_shader.wgsl").into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shape Compositor Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::desc(), ShapeInstance::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer: gpu::quad_vertex_buffer(device, LIST_QUAD_VERTICES),
            index_buffer: gpu::quad_index_buffer(device, LIST_QUAD_INDICES),
            instances: InstanceBuffer::new(device, "Shape Compositor Instance Buffer", 64),
        }
    }

    /// Upload this frame's instance records.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[ShapeInstance],
    ) {
        self.instances.upload(device, queue, instances);
    }

    /// Draw the prepared shapes. The caller supplies a render pass with a
    /// `Depth32Float` attachment.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>, viewport: &Viewport) {
        if self.instances.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &viewport.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instances.slice());
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..LIST_QUAD_INDICES.len() as u32, 0, 0..self.instances.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_shape_instance_layout() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 88);
        assert_eq!(ShapeInstance::desc().attributes.len(), 8);
    }

    #[test]
    fn test_outer_size_adds_border_sides() {
        let outer = outer_size([50.0, 40.0], [5.0, 3.0, 2.0, 6.0]);
        assert!(approx_eq(outer[0], 58.0));
        assert!(approx_eq(outer[1], 48.0));
    }

    #[test]
    fn test_outer_radii_grow_by_adjacent_borders() {
        let radii = outer_corner_radii([4.0; 4], [100.0, 100.0], [1.0, 2.0, 3.0, 4.0]);
        assert!(approx_eq(radii[0], 4.0 + 1.0 + 3.0)); // left + top
        assert!(approx_eq(radii[1], 4.0 + 2.0 + 3.0)); // right + top
        assert!(approx_eq(radii[2], 4.0 + 2.0 + 4.0)); // right + bottom
        assert!(approx_eq(radii[3], 4.0 + 1.0 + 4.0)); // left + bottom
    }

    #[test]
    fn test_outer_radii_clamp() {
        // Every combination of oversized radius and border stays under half
        // the smaller outer dimension.
        for requested in [0.0, 10.0, 50.0, 500.0] {
            for border in [0.0, 5.0, 40.0] {
                let border_size = [border; 4];
                let rect_size = [60.0, 30.0];
                let outer = outer_size(rect_size, border_size);
                let limit = 0.5 * outer[0].min(outer[1]);
                for radius in outer_corner_radii([requested; 4], rect_size, border_size) {
                    assert!(radius <= limit + 1e-5);
                }
            }
        }
    }
}
