use std::rc::Rc;

use super::context::{GpuResource, GraphicsContext};
use super::handle::{FrameBuffer, Handle, Texture};
use super::texture::Texture2D;

/// Off-screen render target made of one or more textures.
///
/// Holds the attachments alive for as long as the framebuffer exists.
#[derive(Debug)]
pub struct Framebuffer {
    textures: Vec<Rc<Texture2D>>,
    frame_buffer: GpuResource<FrameBuffer>,
}

impl Framebuffer {
    pub fn new(ctx: &mut GraphicsContext, textures: Vec<Rc<Texture2D>>) -> Self {
        let handle = if textures.is_empty() {
            log::error!("Failed to create framebuffer: no textures given");
            Handle::INVALID
        } else {
            let attachments: Vec<Handle<Texture>> = textures.iter().map(|t| t.handle()).collect();
            let handle = ctx.backend_mut().create_frame_buffer(&attachments);
            if handle.is_valid() {
                log::info!("Created framebuffer with {} render targets", attachments.len());
            } else {
                log::error!("Backend rejected framebuffer attachments");
            }
            handle
        };

        Self {
            textures,
            frame_buffer: ctx.track(handle),
        }
    }

    pub fn handle(&self) -> Handle<FrameBuffer> {
        self.frame_buffer.handle()
    }

    pub fn textures(&self) -> &[Rc<Texture2D>] {
        &self.textures
    }

    pub fn is_valid(&self) -> bool {
        self.frame_buffer.is_valid()
    }
}
