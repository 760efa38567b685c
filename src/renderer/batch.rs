// renderer/batch.rs
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

use super::context::GraphicsContext;
use super::material::Material;
use super::mesh::Mesh;
use super::vertex::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchParams {
    /// Upper bound on accumulated vertices plus indices before a flush.
    #[serde(default = "BatchParams::default_max_data_count")]
    pub max_data_count: usize,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            max_data_count: Self::default_max_data_count(),
        }
    }
}

impl BatchParams {
    pub const fn default_max_data_count() -> usize {
        1000
    }
}

/// Accumulates geometry that shares one material into as few meshes as the
/// capacity allows.
///
/// Indices of every added chunk are rebased by the number of vertices already
/// pending, so each chunk keeps addressing its own vertices. When the next
/// chunk would push `vertices + indices` past `max_data_count` the pending
/// data is flushed into a finalized mesh first.
#[derive(Debug)]
pub struct Batch {
    params: BatchParams,
    material: Option<Rc<Material>>,
    pending_vertices: Vec<Vertex>,
    pending_indices: Vec<u16>,
    batched_meshes: Vec<Rc<Mesh>>,
}

impl Batch {
    pub fn new(params: BatchParams, material: Option<Rc<Material>>) -> Self {
        assert!(params.max_data_count > 0, "batch capacity must be non-zero");
        if material.is_none() {
            log::warn!("Batch created without a material; its meshes will not be drawn");
        }
        Self {
            params,
            material,
            pending_vertices: Vec::new(),
            pending_indices: Vec::new(),
            batched_meshes: Vec::new(),
        }
    }

    /// Appends one chunk of geometry, flushing first if it does not fit.
    pub fn add(
        &mut self,
        ctx: &mut GraphicsContext,
        vertices: &[Vertex],
        indices: &[u16],
    ) -> Result<()> {
        assert!(!vertices.is_empty(), "batch input needs at least one vertex");
        assert!(!indices.is_empty(), "batch input needs at least one index");
        assert!(
            indices.iter().all(|&index| usize::from(index) < vertices.len()),
            "batch input indices must address the chunk's own vertices"
        );

        let requested = vertices.len() + indices.len();
        if requested > self.params.max_data_count {
            return Err(RenderError::BatchInputTooLarge {
                requested,
                capacity: self.params.max_data_count,
            });
        }

        if requested + self.pending_len() > self.params.max_data_count
            || !self.fits_index_range(vertices.len())
        {
            self.flush(ctx);
        }

        let base = self.pending_vertices.len();
        self.pending_indices
            .extend(indices.iter().map(|&index| rebase(index, base)));
        self.pending_vertices.extend_from_slice(vertices);
        Ok(())
    }

    /// Adds a mesh's geometry. The mesh is drawn with the batch's material
    /// even if it carries a different one.
    pub fn add_mesh(&mut self, ctx: &mut GraphicsContext, mesh: &Mesh) -> Result<()> {
        if !same_material(mesh.material(), self.material.as_ref()) {
            log::warn!("Overwriting mesh material with the batch material");
        }
        self.add(ctx, mesh.vertices(), mesh.indices())
    }

    /// Turns the pending geometry into a mesh. Does nothing when empty.
    pub fn flush(&mut self, ctx: &mut GraphicsContext) -> Option<Rc<Mesh>> {
        if !self.has_pending() {
            return None;
        }

        let vertices = std::mem::take(&mut self.pending_vertices);
        let indices = std::mem::take(&mut self.pending_indices);
        let (vertex_count, index_count) = (vertices.len(), indices.len());

        let mesh = Rc::new(Mesh::new(ctx, vertices, indices, self.material.clone()));
        self.batched_meshes.push(Rc::clone(&mesh));

        log::info!(
            "Flushed batch, with {} batches, {} vertices and {} indices",
            self.batched_meshes.len(),
            vertex_count,
            index_count
        );
        Some(mesh)
    }

    pub fn batched_meshes(&self) -> &[Rc<Mesh>] {
        &self.batched_meshes
    }

    pub fn pending_vertices(&self) -> &[Vertex] {
        &self.pending_vertices
    }

    pub fn pending_indices(&self) -> &[u16] {
        &self.pending_indices
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_vertices.is_empty() || !self.pending_indices.is_empty()
    }

    pub fn material(&self) -> Option<&Rc<Material>> {
        self.material.as_ref()
    }

    pub fn params(&self) -> &BatchParams {
        &self.params
    }

    fn pending_len(&self) -> usize {
        self.pending_vertices.len() + self.pending_indices.len()
    }

    // Rebased indices are u16, so the pending vertex count must stay addressable.
    fn fits_index_range(&self, incoming_vertices: usize) -> bool {
        self.pending_vertices.len() + incoming_vertices <= usize::from(u16::MAX) + 1
    }
}

fn rebase(index: u16, base: usize) -> u16 {
    u16::try_from(usize::from(index) + base).unwrap_or(u16::MAX)
}

fn same_material(a: Option<&Rc<Material>>, b: Option<&Rc<Material>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
