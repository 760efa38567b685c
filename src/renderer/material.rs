// renderer/material.rs
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec4;

use crate::error::{RenderError, Result};

use super::backend::RenderBackend;
use super::shader::{Shader, ShaderManager};
use super::state::StateFlags;
use super::texture::Texture2D;
use super::uniforms::StandardUniforms;

/// Shader every material draws with unless built with `with_shader`.
pub const UBER_SHADER: &str = "uber";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaterialType {
    #[default]
    Default,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlendType {
    #[default]
    Opaque,
    Translucent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShadingType {
    #[default]
    Lit,
    Unlit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialParams {
    pub material_type: MaterialType,
    pub blend_type: BlendType,
    pub shading_type: ShadingType,
    pub cast_shadow: bool,
    pub two_sided: bool,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            material_type: MaterialType::Default,
            blend_type: BlendType::Opaque,
            shading_type: ShadingType::Lit,
            cast_shadow: true,
            two_sided: false,
        }
    }
}

/// Where the base color comes from. Exactly one source is bound per draw.
#[derive(Debug, Clone)]
pub enum BaseColor {
    Factor(Vec4),
    Texture {
        name: String,
        texture: Rc<Texture2D>,
        stage: u8,
    },
}

#[derive(Debug)]
pub struct Material {
    params: MaterialParams,
    shader: Rc<Shader>,
    textures: HashMap<String, Rc<Texture2D>>,
    base_color: BaseColor,
}

impl Material {
    /// Creates a material drawn with the registered `uber` shader.
    pub fn new(shaders: &ShaderManager, params: MaterialParams) -> Result<Self> {
        let shader = shaders
            .get(UBER_SHADER)
            .ok_or_else(|| RenderError::ShaderNotFound(UBER_SHADER.to_owned()))?;
        Ok(Self::with_shader(shader, params))
    }

    pub fn with_shader(shader: Rc<Shader>, params: MaterialParams) -> Self {
        Self {
            params,
            shader,
            textures: HashMap::new(),
            base_color: BaseColor::Factor(Vec4::ONE),
        }
    }

    pub fn add_texture(&mut self, name: impl Into<String>, texture: Rc<Texture2D>) {
        self.textures.insert(name.into(), texture);
    }

    pub fn texture(&self, name: &str) -> Option<&Rc<Texture2D>> {
        self.textures.get(name)
    }

    /// Samples the base color from a previously added texture.
    pub fn set_base_color_texture(&mut self, name: &str, stage: u8) -> Result<()> {
        let texture = self
            .textures
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::TextureNotFound(name.to_owned()))?;
        self.base_color = BaseColor::Texture {
            name: name.to_owned(),
            texture,
            stage,
        };
        Ok(())
    }

    pub fn set_base_color_factor(&mut self, color: Vec4) {
        self.base_color = BaseColor::Factor(color);
    }

    pub fn base_color(&self) -> &BaseColor {
        &self.base_color
    }

    pub fn params(&self) -> &MaterialParams {
        &self.params
    }

    pub fn shader(&self) -> &Rc<Shader> {
        &self.shader
    }

    pub fn state_mask(&self) -> StateFlags {
        let faces = if self.params.two_sided {
            StateFlags::WRITE_RGB
                | StateFlags::WRITE_A
                | StateFlags::WRITE_Z
                | StateFlags::DEPTH_TEST_LESS
                | StateFlags::MSAA
        } else {
            StateFlags::DEFAULT
        };
        let blend = match self.params.blend_type {
            BlendType::Translucent => StateFlags::BLEND_ALPHA,
            BlendType::Opaque => StateFlags::empty(),
        };
        faces | blend
    }

    /// Binds the base color source and the render state for the next draw.
    pub fn update_uniforms(&self, backend: &mut dyn RenderBackend, uniforms: &StandardUniforms) {
        match &self.base_color {
            BaseColor::Texture { texture, stage, .. } => {
                backend.set_texture(*stage, uniforms.base_color_map(), texture.handle());
            }
            BaseColor::Factor(color) => {
                backend.set_uniform(uniforms.base_color_factor(), *color);
            }
        }
        backend.set_state(self.state_mask());
    }
}
