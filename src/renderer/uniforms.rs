// renderer/uniforms.rs
use super::backend::UniformKind;
use super::context::{GpuResource, GraphicsContext};
use super::handle::{Handle, Uniform};

pub const BASE_COLOR_MAP: &str = "u_BaseColorMap";
pub const BASE_COLOR_FACTOR: &str = "u_BaseColorFactor";
pub const COLOR: &str = "u_color";

/// Uniforms shared by every material and by the debug shapes.
///
/// Created once per renderer rather than once per material; the backend
/// keys uniforms by name anyway.
#[derive(Debug)]
pub struct StandardUniforms {
    base_color_map: GpuResource<Uniform>,
    base_color_factor: GpuResource<Uniform>,
    color: GpuResource<Uniform>,
}

impl StandardUniforms {
    pub fn new(ctx: &mut GraphicsContext) -> Self {
        let backend = ctx.backend_mut();
        let base_color_map = backend.create_uniform(BASE_COLOR_MAP, UniformKind::Sampler, 2);
        let base_color_factor = backend.create_uniform(BASE_COLOR_FACTOR, UniformKind::Vec4, 1);
        let color = backend.create_uniform(COLOR, UniformKind::Vec4, 1);

        Self {
            base_color_map: ctx.track(base_color_map),
            base_color_factor: ctx.track(base_color_factor),
            color: ctx.track(color),
        }
    }

    pub fn base_color_map(&self) -> Handle<Uniform> {
        self.base_color_map.handle()
    }

    pub fn base_color_factor(&self) -> Handle<Uniform> {
        self.base_color_factor.handle()
    }

    pub fn color(&self) -> Handle<Uniform> {
        self.color.handle()
    }
}
