use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Opaque index into one of the backend's resource tables.
///
/// The type parameter only tags which table the index belongs to, so a
/// texture handle can never be bound where a vertex buffer is expected.
pub struct Handle<T> {
    index: u16,
    _marker: PhantomData<fn() -> T>,
}

// Manual impls so that `T` itself does not need to be Clone/Eq/Hash.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Handle({})", self.index)
        } else {
            f.write_str("Handle(INVALID)")
        }
    }
}

impl<T> Handle<T> {
    /// Sentinel returned when the backend could not create a resource.
    pub const INVALID: Self = Self {
        index: u16::MAX,
        _marker: PhantomData,
    };

    pub const fn new(index: u16) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    pub const fn index(&self) -> u16 {
        self.index
    }

    pub const fn is_valid(&self) -> bool {
        self.index != u16::MAX
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Resource kinds. These are never instantiated; they only tag handles.
#[derive(Debug)]
pub enum VertexBuffer {}
#[derive(Debug)]
pub enum IndexBuffer {}
#[derive(Debug)]
pub enum ShaderModule {}
#[derive(Debug)]
pub enum Program {}
#[derive(Debug)]
pub enum Texture {}
#[derive(Debug)]
pub enum FrameBuffer {}
#[derive(Debug)]
pub enum Uniform {}

/// Type-erased handle, used where resources of every kind travel together
/// (the release queue and `RenderBackend::destroy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceHandle {
    VertexBuffer(Handle<VertexBuffer>),
    IndexBuffer(Handle<IndexBuffer>),
    Shader(Handle<ShaderModule>),
    Program(Handle<Program>),
    Texture(Handle<Texture>),
    FrameBuffer(Handle<FrameBuffer>),
    Uniform(Handle<Uniform>),
}

impl ResourceHandle {
    pub fn is_valid(&self) -> bool {
        match self {
            Self::VertexBuffer(h) => h.is_valid(),
            Self::IndexBuffer(h) => h.is_valid(),
            Self::Shader(h) => h.is_valid(),
            Self::Program(h) => h.is_valid(),
            Self::Texture(h) => h.is_valid(),
            Self::FrameBuffer(h) => h.is_valid(),
            Self::Uniform(h) => h.is_valid(),
        }
    }
}

macro_rules! into_resource {
    ($($kind:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<Handle<$kind>> for ResourceHandle {
                fn from(handle: Handle<$kind>) -> Self {
                    ResourceHandle::$variant(handle)
                }
            }
        )*
    };
}

into_resource! {
    VertexBuffer => VertexBuffer,
    IndexBuffer => IndexBuffer,
    ShaderModule => Shader,
    Program => Program,
    Texture => Texture,
    FrameBuffer => FrameBuffer,
    Uniform => Uniform,
}
