//! Instanced-quad GPU plumbing shared by every pass.
//!
//! All three passes draw the same unit quad, stretched and placed per
//! instance; only the instance records differ.

use wgpu::util::DeviceExt;
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A single vertex of the shared unit quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Position in the unit square [0,1]²
    pub position: [f32; 2],
}

impl QuadVertex {
    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: &[VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x2,
            }],
        }
    }
}

/// Quad vertices in triangle-strip order (texture and blur passes).
pub const STRIP_QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex {
        position: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 0.0],
    },
    QuadVertex {
        position: [0.0, 1.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
    },
];

/// Strip indices for [`STRIP_QUAD_VERTICES`].
pub const STRIP_QUAD_INDICES: &[u16] = &[0, 1, 2, 3];

/// Quad vertices for the two-triangle list used by the shape pass
/// (counter-clockwise winding with back-face culling).
pub const LIST_QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex {
        position: [0.0, 1.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
    },
    QuadVertex {
        position: [1.0, 0.0],
    },
    QuadVertex {
        position: [0.0, 0.0],
    },
];

/// List indices for [`LIST_QUAD_VERTICES`].
pub const LIST_QUAD_INDICES: &[u16] = &[0, 1, 3, 1, 2, 3];

/// A growable vertex-stepped buffer of per-instance records.
pub struct InstanceBuffer<T> {
    buffer: wgpu::Buffer,
    label: &'static str,
    capacity: usize,
    len: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T: bytemuck::Pod> InstanceBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<T>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            label,
            capacity,
            len: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Write the instance records, growing the buffer geometrically when
    /// they no longer fit.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[T]) {
        if instances.len() > self.capacity {
            let new_capacity = (self.capacity * 2).max(instances.len());
            log::debug!(
                "{}: growing {} -> {} instances",
                self.label,
                self.capacity,
                new_capacity
            );
            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: (new_capacity * std::mem::size_of::<T>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.capacity = new_capacity;
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
        self.len = instances.len();
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    pub fn len(&self) -> u32 {
        self.len as u32
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Create the shared unit-quad vertex buffer.
pub(crate) fn quad_vertex_buffer(device: &wgpu::Device, vertices: &[QuadVertex]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Quad Vertex Buffer"),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// Create the shared unit-quad index buffer.
pub(crate) fn quad_index_buffer(device: &wgpu::Device, indices: &[u16]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Quad Index Buffer"),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_layouts() {
        assert_eq!(STRIP_QUAD_VERTICES.len(), 4);
        assert_eq!(STRIP_QUAD_INDICES.len(), 4);
        assert_eq!(LIST_QUAD_VERTICES.len(), 4);
        assert_eq!(LIST_QUAD_INDICES.len(), 6);
        assert_eq!(std::mem::size_of::<QuadVertex>(), 8);
    }
}
