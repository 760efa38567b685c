use glam::{Mat4, Vec4};

use super::handle::{
    FrameBuffer, Handle, IndexBuffer, Program, ResourceHandle, ShaderModule, Texture, Uniform,
    VertexBuffer,
};
use super::state::{ClearFlags, ResetFlags, SamplerFlags, StateFlags};
use super::vertex::VertexLayout;

/// Identifies one render pass. Draws are grouped and ordered by view id.
pub type ViewId = u16;

/// Capabilities the backend reports once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caps {
    /// True when clip-space depth spans [-1, 1] instead of [0, 1].
    pub homogeneous_depth: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ViewRect {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: clamp_u16(width),
            height: clamp_u16(height),
        }
    }
}

fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearParams {
    pub flags: ClearFlags,
    /// Packed 0xRRGGBBAA.
    pub rgba: u32,
    pub depth: f32,
    pub stencil: u8,
}

impl Default for ClearParams {
    fn default() -> Self {
        Self {
            flags: ClearFlags::COLOR | ClearFlags::DEPTH,
            rgba: 0x3030_30ff,
            depth: 1.0,
            stencil: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Sampler,
    Vec4,
    Mat4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureDesc {
    pub width: u16,
    pub height: u16,
    pub has_mips: bool,
    pub format: TextureFormat,
    pub sampler: SamplerFlags,
}

/// The immediate-mode GPU command surface everything in this crate talks to.
///
/// Resource creation returns typed handles; `Handle::INVALID` signals a
/// failed creation. Per-draw state (`set_transform`, `set_state`, buffers,
/// uniforms, textures) accumulates until the next `submit`, which consumes it.
pub trait RenderBackend {
    fn caps(&self) -> Caps;

    fn create_vertex_buffer(&mut self, data: &[u8], layout: &VertexLayout) -> Handle<VertexBuffer>;
    fn create_index_buffer(&mut self, indices: &[u16]) -> Handle<IndexBuffer>;
    fn create_shader(&mut self, code: &[u8]) -> Handle<ShaderModule>;
    fn create_program(
        &mut self,
        vertex: Handle<ShaderModule>,
        fragment: Handle<ShaderModule>,
    ) -> Handle<Program>;
    fn create_texture_2d(&mut self, desc: &TextureDesc, data: &[u8]) -> Handle<Texture>;
    fn create_frame_buffer(&mut self, attachments: &[Handle<Texture>]) -> Handle<FrameBuffer>;
    fn create_uniform(&mut self, name: &str, kind: UniformKind, count: u16) -> Handle<Uniform>;
    fn destroy(&mut self, handle: ResourceHandle);

    fn set_view_transform(&mut self, view: ViewId, view_matrix: &Mat4, projection: &Mat4);
    fn set_view_rect(&mut self, view: ViewId, rect: ViewRect);
    fn set_view_clear(&mut self, view: ViewId, clear: ClearParams);
    fn set_view_frame_buffer(&mut self, view: ViewId, frame_buffer: Handle<FrameBuffer>);

    fn set_transform(&mut self, transform: &Mat4);
    fn set_uniform(&mut self, uniform: Handle<Uniform>, value: Vec4);
    fn set_texture(&mut self, stage: u8, sampler: Handle<Uniform>, texture: Handle<Texture>);
    fn set_state(&mut self, state: StateFlags);
    fn set_vertex_buffer(&mut self, stream: u8, buffer: Handle<VertexBuffer>);
    fn set_index_buffer(&mut self, buffer: Handle<IndexBuffer>);
    fn submit(&mut self, view: ViewId, program: Handle<Program>);

    fn debug_text(&mut self, x: u16, y: u16, text: &str);
    fn reset(&mut self, width: u32, height: u32, flags: ResetFlags);

    /// Ends the current frame and returns the new frame number.
    fn frame(&mut self) -> u32;
}
