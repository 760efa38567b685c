use super::context::{GpuResource, GraphicsContext};
use super::handle::{Handle, IndexBuffer, VertexBuffer};
use super::vertex::VertexFormat;

/// A vertex buffer paired with the index buffer that draws it.
///
/// Both buffers are uploaded once at construction and never change.
#[derive(Debug)]
pub struct VertexArray {
    vertex_buffer: GpuResource<VertexBuffer>,
    index_buffer: GpuResource<IndexBuffer>,
    vertex_count: usize,
    index_count: usize,
}

impl VertexArray {
    pub fn new<V: VertexFormat>(ctx: &mut GraphicsContext, vertices: &[V], indices: &[u16]) -> Self {
        let layout = V::layout();
        let backend = ctx.backend_mut();
        let vb = backend.create_vertex_buffer(bytemuck::cast_slice(vertices), &layout);
        let ib = backend.create_index_buffer(indices);

        if !vb.is_valid() || !ib.is_valid() {
            log::error!(
                "Failed to create vertex array ({} vertices, {} indices)",
                vertices.len(),
                indices.len()
            );
        }

        Self {
            vertex_buffer: ctx.track(vb),
            index_buffer: ctx.track(ib),
            vertex_count: vertices.len(),
            index_count: indices.len(),
        }
    }

    pub fn vertex_buffer(&self) -> Handle<VertexBuffer> {
        self.vertex_buffer.handle()
    }

    pub fn index_buffer(&self) -> Handle<IndexBuffer> {
        self.index_buffer.handle()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn is_valid(&self) -> bool {
        self.vertex_buffer.is_valid() && self.index_buffer.is_valid()
    }
}
