// renderer/renderer.rs
//
// Submission context. Everything that reaches the backend as a draw goes
// through here, in call order, tagged with the view id of the active pass.

use crate::error::{RenderError, Result};
use crate::scene::{compose_matrix, Camera, Transform};
use crate::settings::RendererSettings;

use super::backend::{ClearParams, RenderBackend, ViewId, ViewRect};
use super::batch::Batch;
use super::buffers::VertexArray;
use super::context::GraphicsContext;
use super::handle::{FrameBuffer, Handle};
use super::mesh::Mesh;
use super::shader::{shader_paths, Shader, ShaderManager};
use super::state::ResetFlags;
use super::uniforms::StandardUniforms;

/// View used for submissions made outside of any pass.
pub const DEFAULT_VIEW: ViewId = 0;

/// Shader used by `DebugDraw`, only loaded when debug shaders are enabled.
pub const DEBUG_DRAW_SHADER: &str = "debugdraw";

/// Optional per-pass bindings applied to the camera's view in `begin_pass`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassParams {
    pub frame_buffer: Option<Handle<FrameBuffer>>,
    pub viewport: Option<ViewRect>,
    pub clear: Option<ClearParams>,
}

/// Counters for the frame in progress; reset by `Renderer::frame`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub passes: u32,
    pub draw_calls: u32,
    pub skipped_meshes: u32,
}

pub struct Renderer {
    ctx: GraphicsContext,
    shaders: ShaderManager,
    uniforms: StandardUniforms,
    active_view: Option<ViewId>,
    stats: FrameStats,
    last_frame_stats: FrameStats,
    frame_number: u32,
}

impl Renderer {
    /// Wraps the backend, creates the shared uniforms and loads the standard
    /// shader set. Shaders that fail to load are logged and skipped.
    pub fn new(backend: Box<dyn RenderBackend>, settings: &RendererSettings) -> Self {
        let mut ctx = GraphicsContext::new(backend);
        let uniforms = StandardUniforms::new(&mut ctx);
        let mut shaders = ShaderManager::new();

        let debug = settings.debug_shaders.then_some(DEBUG_DRAW_SHADER);
        for name in settings
            .standard_shaders
            .iter()
            .map(String::as_str)
            .chain(debug)
        {
            let (vertex, fragment) = shader_paths(&settings.shader_dir, name);
            shaders.load_and_add(&mut ctx, vertex, fragment);
        }

        log::info!(
            "Renderer initialized with {} shaders from {:?}",
            shaders.len(),
            settings.shader_dir
        );

        Self {
            ctx,
            shaders,
            uniforms,
            active_view: None,
            stats: FrameStats::default(),
            last_frame_stats: FrameStats::default(),
            frame_number: 0,
        }
    }

    /// Releases the renderer's own shaders and uniforms and drains the
    /// release queue one last time.
    pub fn shutdown(self) {
        let Renderer {
            mut ctx,
            shaders,
            uniforms,
            active_view,
            ..
        } = self;
        if let Some(view) = active_view {
            log::warn!("Renderer shut down while pass {} was still active", view);
        }
        drop(shaders);
        drop(uniforms);
        let released = ctx.collect_garbage();
        log::info!("Renderer shut down, released {} GPU resources", released);
    }

    /// Starts a pass on the camera's view and binds its matrices.
    pub fn begin(&mut self, camera: &Camera) -> Result<()> {
        if let Some(view) = self.active_view {
            return Err(RenderError::PassAlreadyActive { view });
        }
        let view = camera.view_id();
        self.ctx.backend_mut().set_view_transform(
            view,
            &camera.view_matrix(),
            &camera.projection_matrix(),
        );
        self.active_view = Some(view);
        self.stats.passes += 1;
        Ok(())
    }

    /// Like `begin`, additionally binding the target, viewport and clear
    /// values given in `params` to the camera's view.
    pub fn begin_pass(&mut self, camera: &Camera, params: &PassParams) -> Result<()> {
        self.begin(camera)?;
        let view = camera.view_id();
        let backend = self.ctx.backend_mut();
        if let Some(frame_buffer) = params.frame_buffer {
            backend.set_view_frame_buffer(view, frame_buffer);
        }
        if let Some(rect) = params.viewport {
            backend.set_view_rect(view, rect);
        }
        if let Some(clear) = params.clear {
            backend.set_view_clear(view, clear);
        }
        Ok(())
    }

    pub fn end(&mut self) {
        if self.active_view.take().is_none() {
            log::warn!("Renderer::end called without an active pass");
        }
    }

    pub fn end_pass(&mut self) {
        self.end();
    }

    /// Binds the buffers and issues one draw. Panics on invalid handles.
    pub fn submit_vertex_array(&mut self, vertex_array: &VertexArray, shader: &Shader) {
        assert!(
            vertex_array.is_valid(),
            "cannot submit a vertex array with invalid buffers"
        );
        assert!(
            shader.program().is_valid(),
            "cannot submit with invalid shader '{}'",
            shader.name()
        );

        let view = self.active_view();
        let backend = self.ctx.backend_mut();
        backend.set_vertex_buffer(0, vertex_array.vertex_buffer());
        backend.set_index_buffer(vertex_array.index_buffer());
        backend.submit(view, shader.program());
        self.stats.draw_calls += 1;
    }

    pub fn submit_vertex_array_transform(
        &mut self,
        vertex_array: &VertexArray,
        shader: &Shader,
        transform: &Transform,
    ) {
        self.ctx
            .backend_mut()
            .set_transform(&compose_matrix(transform));
        self.submit_vertex_array(vertex_array, shader);
    }

    /// Draws a mesh with `transform * mesh.transform`. Meshes without a
    /// material are skipped.
    pub fn submit_mesh(&mut self, mesh: &Mesh, transform: &Transform) {
        let Some(material) = mesh.material() else {
            log::warn!("Skipping mesh without a material");
            self.stats.skipped_meshes += 1;
            return;
        };

        let model = compose_matrix(transform) * compose_matrix(mesh.transform());
        let backend = self.ctx.backend_mut();
        backend.set_transform(&model);
        material.update_uniforms(backend, &self.uniforms);
        self.submit_vertex_array(mesh.vertex_array(), material.shader());
    }

    /// Flushes pending geometry, then draws every finalized mesh.
    pub fn submit_batch(&mut self, batch: &mut Batch, transform: &Transform) {
        batch.flush(&mut self.ctx);
        for mesh in batch.batched_meshes() {
            self.submit_mesh(mesh, transform);
        }
    }

    /// Resizes the backbuffer and the default view.
    pub fn resize(&mut self, width: u32, height: u32, flags: ResetFlags) {
        let backend = self.ctx.backend_mut();
        backend.reset(width, height, flags);
        backend.set_view_rect(DEFAULT_VIEW, ViewRect::sized(width, height));
    }

    pub fn debug_text(&mut self, x: u16, y: u16, text: &str) {
        self.ctx.backend_mut().debug_text(x, y, text);
    }

    /// Ends the frame: advances the backend, destroys released resources and
    /// starts a fresh set of statistics.
    pub fn frame(&mut self) -> u32 {
        if let Some(view) = self.active_view {
            log::warn!("Frame ended while pass {} is still active", view);
        }
        self.frame_number = self.ctx.backend_mut().frame();
        self.ctx.collect_garbage();
        self.last_frame_stats = std::mem::take(&mut self.stats);
        self.frame_number
    }

    pub fn context(&self) -> &GraphicsContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GraphicsContext {
        &mut self.ctx
    }

    pub fn shaders(&self) -> &ShaderManager {
        &self.shaders
    }

    /// Registry and context together, for loading shaders after startup.
    pub fn shaders_mut(&mut self) -> (&mut ShaderManager, &mut GraphicsContext) {
        (&mut self.shaders, &mut self.ctx)
    }

    pub fn uniforms(&self) -> &StandardUniforms {
        &self.uniforms
    }

    /// View id submissions go to right now.
    pub fn active_view(&self) -> ViewId {
        self.active_view.unwrap_or(DEFAULT_VIEW)
    }

    pub fn has_active_pass(&self) -> bool {
        self.active_view.is_some()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn last_frame_stats(&self) -> &FrameStats {
        &self.last_frame_stats
    }

    pub fn frame_number(&self) -> u32 {
        self.frame_number
    }
}
