//! Shared per-frame uniform: the render-target resolution.
//!
//! Every pass converts pixel positions to clip space against this record,
//! so it must always match the actual target dimensions.

/// Render-target size in physical pixels.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// The 16-byte uniform record bound to every draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameParams {
    /// Target size in pixels (width, height)
    pub resolution: [u32; 2],
    /// Padding to a 16-byte-aligned record
    pub _pad: [u32; 2],
}

/// Owns the frame uniform buffer and its bind group.
///
/// The GPU copy is rewritten only when the resolution actually changes.
pub struct Viewport {
    params: FrameParams,
    buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl Viewport {
    /// Bind group layout every pipeline uses for the frame uniform.
    pub(crate) fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("Viewport Bind Group Layout"),
        })
    }

    pub fn new(device: &wgpu::Device) -> Self {
        let params = FrameParams {
            resolution: [0, 0],
            _pad: [0, 0],
        };

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Viewport Uniform Buffer"),
            size: std::mem::size_of::<FrameParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &Self::bind_group_layout(device),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Viewport Bind Group"),
        });

        Self {
            params,
            buffer,
            bind_group,
        }
    }

    /// Record a (possibly unchanged) resolution, uploading on change only.
    pub fn update(&mut self, queue: &wgpu::Queue, resolution: Resolution) {
        let packed = [resolution.width, resolution.height];
        if self.params.resolution != packed {
            log::debug!(
                "viewport resized to {}x{}",
                resolution.width,
                resolution.height
            );
            self.params.resolution = packed;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.params]));
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.params.resolution[0],
            height: self.params.resolution[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_params_layout() {
        assert_eq!(std::mem::size_of::<FrameParams>(), 16);
    }
}
