// renderer/recording.rs
//
// Headless backend. Allocates handles like a real device would and records
// every call so that the submission order can be inspected afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec4};

use super::backend::{Caps, ClearParams, RenderBackend, TextureDesc, UniformKind, ViewId, ViewRect};
use super::handle::{
    FrameBuffer, Handle, IndexBuffer, Program, ResourceHandle, ShaderModule, Texture, Uniform,
    VertexBuffer,
};
use super::state::{ResetFlags, StateFlags};
use super::vertex::VertexLayout;

/// Per-draw state captured at `submit` time.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub transform: Mat4,
    pub state: StateFlags,
    pub vertex_buffer: Handle<VertexBuffer>,
    pub index_buffer: Handle<IndexBuffer>,
    pub uniforms: Vec<(Handle<Uniform>, Vec4)>,
    pub textures: Vec<(u8, Handle<Uniform>, Handle<Texture>)>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            state: StateFlags::DEFAULT,
            vertex_buffer: Handle::INVALID,
            index_buffer: Handle::INVALID,
            uniforms: Vec::new(),
            textures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateVertexBuffer {
        handle: Handle<VertexBuffer>,
        data: Vec<u8>,
        stride: u16,
    },
    CreateIndexBuffer {
        handle: Handle<IndexBuffer>,
        indices: Vec<u16>,
    },
    CreateShader(Handle<ShaderModule>),
    CreateProgram(Handle<Program>),
    CreateTexture {
        handle: Handle<Texture>,
        desc: TextureDesc,
    },
    CreateFrameBuffer {
        handle: Handle<FrameBuffer>,
        attachments: Vec<Handle<Texture>>,
    },
    CreateUniform {
        handle: Handle<Uniform>,
        name: String,
        kind: UniformKind,
    },
    Destroy(ResourceHandle),
    SetViewTransform {
        view: ViewId,
        view_matrix: Mat4,
        projection: Mat4,
    },
    SetViewRect(ViewId, ViewRect),
    SetViewClear(ViewId, ClearParams),
    SetViewFrameBuffer(ViewId, Handle<FrameBuffer>),
    SetTransform(Mat4),
    SetUniform(Handle<Uniform>, Vec4),
    SetTexture {
        stage: u8,
        sampler: Handle<Uniform>,
        texture: Handle<Texture>,
    },
    SetState(StateFlags),
    SetVertexBuffer(u8, Handle<VertexBuffer>),
    SetIndexBuffer(Handle<IndexBuffer>),
    Submit {
        view: ViewId,
        program: Handle<Program>,
        draw: DrawState,
    },
    DebugText {
        x: u16,
        y: u16,
        text: String,
    },
    Reset {
        width: u32,
        height: u32,
        flags: ResetFlags,
    },
    Frame(u32),
}

/// A submitted draw, as seen by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub view: ViewId,
    pub program: Handle<Program>,
    pub draw: DrawState,
}

/// Shared view of everything a `RecordingBackend` has been asked to do.
///
/// Cloning the log shares the same storage, so a test can keep one clone
/// while the backend itself is boxed away inside a `GraphicsContext`.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Rc<RefCell<Vec<Command>>>,
}

impl CommandLog {
    fn push(&self, command: Command) {
        self.commands.borrow_mut().push(command);
    }

    pub fn snapshot(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    pub fn submits(&self) -> Vec<Submitted> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|command| match command {
                Command::Submit {
                    view,
                    program,
                    draw,
                } => Some(Submitted {
                    view: *view,
                    program: *program,
                    draw: draw.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed(&self) -> Vec<ResourceHandle> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|command| match command {
                Command::Destroy(handle) => Some(*handle),
                _ => None,
            })
            .collect()
    }

    /// Index buffer contents keyed by handle, in creation order.
    pub fn index_buffers(&self) -> Vec<(Handle<IndexBuffer>, Vec<u16>)> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|command| match command {
                Command::CreateIndexBuffer { handle, indices } => {
                    Some((*handle, indices.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Command) -> bool) -> usize {
        self.commands.borrow().iter().filter(|c| predicate(c)).count()
    }
}

/// Index allocator for one resource table. Destroyed indices are handed
/// out again before the table grows.
#[derive(Debug, Default)]
struct HandleTable {
    next: u16,
    free: Vec<u16>,
}

impl HandleTable {
    fn alloc<T>(&mut self) -> Handle<T> {
        if let Some(index) = self.free.pop() {
            return Handle::new(index);
        }
        // u16::MAX is the invalid sentinel, so the table stops one short of it.
        if self.next == u16::MAX {
            log::error!("Backend handle table exhausted");
            return Handle::INVALID;
        }
        let handle = Handle::new(self.next);
        self.next += 1;
        handle
    }

    fn free<T>(&mut self, handle: Handle<T>) {
        if handle.is_valid() && handle.index() < self.next && !self.free.contains(&handle.index()) {
            self.free.push(handle.index());
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    vertex_buffers: HandleTable,
    index_buffers: HandleTable,
    shaders: HandleTable,
    programs: HandleTable,
    textures: HandleTable,
    frame_buffers: HandleTable,
    uniforms: HandleTable,
}

impl Tables {
    fn release(&mut self, handle: ResourceHandle) {
        match handle {
            ResourceHandle::VertexBuffer(h) => self.vertex_buffers.free(h),
            ResourceHandle::IndexBuffer(h) => self.index_buffers.free(h),
            ResourceHandle::Shader(h) => self.shaders.free(h),
            ResourceHandle::Program(h) => self.programs.free(h),
            ResourceHandle::Texture(h) => self.textures.free(h),
            ResourceHandle::FrameBuffer(h) => self.frame_buffers.free(h),
            ResourceHandle::Uniform(h) => self.uniforms.free(h),
        }
    }
}

/// Backend that renders nothing and remembers everything.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    caps: Caps,
    log: CommandLog,
    tables: Tables,
    pending: DrawState,
    frame: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caps(caps: Caps) -> Self {
        Self {
            caps,
            ..Self::default()
        }
    }

    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }
}

impl RenderBackend for RecordingBackend {
    fn caps(&self) -> Caps {
        self.caps
    }

    fn create_vertex_buffer(&mut self, data: &[u8], layout: &VertexLayout) -> Handle<VertexBuffer> {
        if data.is_empty() || layout.stride() == 0 {
            return Handle::INVALID;
        }
        let handle = self.tables.vertex_buffers.alloc();
        self.log.push(Command::CreateVertexBuffer {
            handle,
            data: data.to_vec(),
            stride: layout.stride(),
        });
        handle
    }

    fn create_index_buffer(&mut self, indices: &[u16]) -> Handle<IndexBuffer> {
        if indices.is_empty() {
            return Handle::INVALID;
        }
        let handle = self.tables.index_buffers.alloc();
        self.log.push(Command::CreateIndexBuffer {
            handle,
            indices: indices.to_vec(),
        });
        handle
    }

    fn create_shader(&mut self, code: &[u8]) -> Handle<ShaderModule> {
        if code.is_empty() {
            return Handle::INVALID;
        }
        let handle = self.tables.shaders.alloc();
        self.log.push(Command::CreateShader(handle));
        handle
    }

    fn create_program(
        &mut self,
        vertex: Handle<ShaderModule>,
        fragment: Handle<ShaderModule>,
    ) -> Handle<Program> {
        if !vertex.is_valid() || !fragment.is_valid() {
            return Handle::INVALID;
        }
        let handle = self.tables.programs.alloc();
        self.log.push(Command::CreateProgram(handle));
        handle
    }

    fn create_texture_2d(&mut self, desc: &TextureDesc, data: &[u8]) -> Handle<Texture> {
        let expected =
            usize::from(desc.width) * usize::from(desc.height) * desc.format.bytes_per_pixel();
        if expected == 0 || data.len() < expected {
            return Handle::INVALID;
        }
        let handle = self.tables.textures.alloc();
        self.log.push(Command::CreateTexture {
            handle,
            desc: *desc,
        });
        handle
    }

    fn create_frame_buffer(&mut self, attachments: &[Handle<Texture>]) -> Handle<FrameBuffer> {
        if attachments.is_empty() || attachments.iter().any(|t| !t.is_valid()) {
            return Handle::INVALID;
        }
        let handle = self.tables.frame_buffers.alloc();
        self.log.push(Command::CreateFrameBuffer {
            handle,
            attachments: attachments.to_vec(),
        });
        handle
    }

    fn create_uniform(&mut self, name: &str, kind: UniformKind, _count: u16) -> Handle<Uniform> {
        let handle = self.tables.uniforms.alloc();
        self.log.push(Command::CreateUniform {
            handle,
            name: name.to_owned(),
            kind,
        });
        handle
    }

    fn destroy(&mut self, handle: ResourceHandle) {
        self.tables.release(handle);
        self.log.push(Command::Destroy(handle));
    }

    fn set_view_transform(&mut self, view: ViewId, view_matrix: &Mat4, projection: &Mat4) {
        self.log.push(Command::SetViewTransform {
            view,
            view_matrix: *view_matrix,
            projection: *projection,
        });
    }

    fn set_view_rect(&mut self, view: ViewId, rect: ViewRect) {
        self.log.push(Command::SetViewRect(view, rect));
    }

    fn set_view_clear(&mut self, view: ViewId, clear: ClearParams) {
        self.log.push(Command::SetViewClear(view, clear));
    }

    fn set_view_frame_buffer(&mut self, view: ViewId, frame_buffer: Handle<FrameBuffer>) {
        self.log.push(Command::SetViewFrameBuffer(view, frame_buffer));
    }

    fn set_transform(&mut self, transform: &Mat4) {
        self.pending.transform = *transform;
        self.log.push(Command::SetTransform(*transform));
    }

    fn set_uniform(&mut self, uniform: Handle<Uniform>, value: Vec4) {
        self.pending.uniforms.push((uniform, value));
        self.log.push(Command::SetUniform(uniform, value));
    }

    fn set_texture(&mut self, stage: u8, sampler: Handle<Uniform>, texture: Handle<Texture>) {
        self.pending.textures.push((stage, sampler, texture));
        self.log.push(Command::SetTexture {
            stage,
            sampler,
            texture,
        });
    }

    fn set_state(&mut self, state: StateFlags) {
        self.pending.state = state;
        self.log.push(Command::SetState(state));
    }

    fn set_vertex_buffer(&mut self, stream: u8, buffer: Handle<VertexBuffer>) {
        self.pending.vertex_buffer = buffer;
        self.log.push(Command::SetVertexBuffer(stream, buffer));
    }

    fn set_index_buffer(&mut self, buffer: Handle<IndexBuffer>) {
        self.pending.index_buffer = buffer;
        self.log.push(Command::SetIndexBuffer(buffer));
    }

    fn submit(&mut self, view: ViewId, program: Handle<Program>) {
        let draw = std::mem::take(&mut self.pending);
        self.log.push(Command::Submit {
            view,
            program,
            draw,
        });
    }

    fn debug_text(&mut self, x: u16, y: u16, text: &str) {
        self.log.push(Command::DebugText {
            x,
            y,
            text: text.to_owned(),
        });
    }

    fn reset(&mut self, width: u32, height: u32, flags: ResetFlags) {
        self.log.push(Command::Reset {
            width,
            height,
            flags,
        });
    }

    fn frame(&mut self) -> u32 {
        self.pending = DrawState::default();
        self.frame = self.frame.wrapping_add(1);
        self.log.push(Command::Frame(self.frame));
        self.frame
    }
}
