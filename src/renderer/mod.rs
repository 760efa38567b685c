// renderer/mod.rs

pub mod backend;
pub mod batch;
pub mod buffers;
pub mod context;
pub mod debug_draw;
pub mod framebuffer;
pub mod handle;
pub mod material;
pub mod mesh;
pub mod primitives;
pub mod recording;
pub mod renderer;
pub mod shader;
pub mod state;
pub mod texture;
pub mod uniforms;
pub mod vertex;

pub use backend::{
    Caps, ClearParams, RenderBackend, TextureDesc, TextureFormat, UniformKind, ViewId, ViewRect,
};
pub use batch::{Batch, BatchParams};
pub use buffers::VertexArray;
pub use context::{GpuResource, GraphicsContext};
pub use debug_draw::DebugDraw;
pub use framebuffer::Framebuffer;
pub use handle::{Handle, ResourceHandle};
pub use material::{BaseColor, BlendType, Material, MaterialParams, MaterialType, ShadingType};
pub use mesh::Mesh;
pub use recording::{Command, CommandLog, RecordingBackend};
pub use renderer::{FrameStats, PassParams, Renderer, DEFAULT_VIEW};
pub use shader::{Shader, ShaderManager};
pub use state::{ClearFlags, ResetFlags, SamplerFlags, StateFlags};
pub use texture::{Texture2D, Texture2DParams};
pub use uniforms::StandardUniforms;
pub use vertex::{PrimitiveVertex, Vertex, VertexLayout};
