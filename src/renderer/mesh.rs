use std::rc::Rc;

use crate::scene::Transform;

use super::buffers::VertexArray;
use super::context::GraphicsContext;
use super::material::Material;
use super::vertex::Vertex;

/// Immutable geometry with its GPU buffers and an optional material.
#[derive(Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    vertex_array: VertexArray,
    material: Option<Rc<Material>>,
    transform: Transform,
}

impl Mesh {
    /// Uploads the geometry. Panics on empty vertices or indices.
    pub fn new(
        ctx: &mut GraphicsContext,
        vertices: Vec<Vertex>,
        indices: Vec<u16>,
        material: Option<Rc<Material>>,
    ) -> Self {
        assert!(!vertices.is_empty(), "mesh needs at least one vertex");
        assert!(!indices.is_empty(), "mesh needs at least one index");

        let vertex_array = VertexArray::new(ctx, &vertices, &indices);
        Self {
            vertices,
            indices,
            vertex_array,
            material,
            transform: Transform::IDENTITY,
        }
    }

    /// Local transform applied before the one passed at submission.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    pub fn material(&self) -> Option<&Rc<Material>> {
        self.material.as_ref()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}
