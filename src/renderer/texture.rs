// renderer/texture.rs

use std::path::Path;

use crate::error::{RenderError, Result};

use super::backend::{TextureDesc, TextureFormat};
use super::context::{GpuResource, GraphicsContext};
use super::handle::{Handle, Texture};
use super::state::SamplerFlags;

const NO_TEXTURE_SIZE: u32 = 64;
const NO_TEXTURE_CHECKER: u32 = 8;
const MAGENTA: [u8; 4] = [255, 0, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture2DParams {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub has_mips: bool,
    /// Point filtering instead of anisotropic.
    pub nearest: bool,
}

impl Default for Texture2DParams {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            channels: 4,
            has_mips: false,
            nearest: false,
        }
    }
}

impl Texture2DParams {
    pub fn sampler_flags(&self) -> SamplerFlags {
        let filter = if self.nearest {
            SamplerFlags::MIN_POINT | SamplerFlags::MAG_POINT
        } else {
            SamplerFlags::MIN_ANISOTROPIC | SamplerFlags::MAG_ANISOTROPIC
        };
        filter | SamplerFlags::U_BORDER | SamplerFlags::V_BORDER
    }

    /// `None` when the size does not fit in memory at all.
    fn byte_len(&self) -> Option<usize> {
        usize::try_from(self.width)
            .ok()?
            .checked_mul(usize::try_from(self.height).ok()?)?
            .checked_mul(usize::try_from(self.channels).ok()?)
    }
}

/// RGBA8 texture living on the backend.
#[derive(Debug)]
pub struct Texture2D {
    params: Texture2DParams,
    texture: GpuResource<Texture>,
}

impl Texture2D {
    /// Uploads `data`. Bad dimensions or too little data log an error and
    /// produce a texture with an invalid handle.
    pub fn new(ctx: &mut GraphicsContext, data: &[u8], params: Texture2DParams) -> Self {
        let handle = match Self::describe(data, &params) {
            Some(desc) => ctx.backend_mut().create_texture_2d(&desc, data),
            None => Handle::INVALID,
        };
        if handle.is_valid() {
            log::info!(
                "Created texture {}x{} (mips: {})",
                params.width,
                params.height,
                params.has_mips
            );
        } else {
            log::error!(
                "Failed to create texture {}x{} with {} channels from {} bytes",
                params.width,
                params.height,
                params.channels,
                data.len()
            );
        }

        Self {
            params,
            texture: ctx.track(handle),
        }
    }

    fn describe(data: &[u8], params: &Texture2DParams) -> Option<TextureDesc> {
        if params.width == 0 || params.height == 0 {
            log::error!("Invalid texture width or height");
            return None;
        }
        if params.channels != 4 {
            log::error!("Only RGBA8 textures are supported, got {} channels", params.channels);
            return None;
        }
        let (Ok(width), Ok(height)) = (u16::try_from(params.width), u16::try_from(params.height))
        else {
            log::error!(
                "Texture size {}x{} exceeds the backend limit of {}",
                params.width,
                params.height,
                u16::MAX
            );
            return None;
        };
        let Some(expected) = params.byte_len() else {
            log::error!("Texture size {}x{} overflows", params.width, params.height);
            return None;
        };
        if data.len() < expected {
            log::error!(
                "Texture data too short: {} bytes, expected {}",
                data.len(),
                expected
            );
            return None;
        }
        Some(TextureDesc {
            width,
            height,
            has_mips: params.has_mips,
            format: TextureFormat::Rgba8,
            sampler: params.sampler_flags(),
        })
    }

    /// Loads an image file, falling back to the "no texture" checkerboard
    /// when the file cannot be read or decoded.
    pub fn from_path(ctx: &mut GraphicsContext, path: impl AsRef<Path>, nearest: bool) -> Self {
        let path = path.as_ref();
        log::info!("Loading texture: {:?}", path);
        match load_texture_2d(path) {
            Ok((pixels, mut params)) => {
                params.nearest = nearest;
                Self::new(ctx, &pixels, params)
            }
            Err(err) => {
                log::warn!("{}. Using the fallback texture.", err);
                Self::no_texture(ctx)
            }
        }
    }

    /// Magenta/black checkerboard used in place of missing textures.
    pub fn no_texture(ctx: &mut GraphicsContext) -> Self {
        let pixels = checkerboard(NO_TEXTURE_SIZE, NO_TEXTURE_CHECKER, MAGENTA, BLACK);
        Self::new(
            ctx,
            &pixels,
            Texture2DParams {
                width: NO_TEXTURE_SIZE,
                height: NO_TEXTURE_SIZE,
                nearest: true,
                ..Texture2DParams::default()
            },
        )
    }

    pub fn handle(&self) -> Handle<Texture> {
        self.texture.handle()
    }

    pub fn params(&self) -> &Texture2DParams {
        &self.params
    }

    pub fn is_valid(&self) -> bool {
        self.texture.is_valid()
    }
}

/// Decodes an image into bottom-up RGBA8 pixels.
pub fn load_texture_2d(path: impl AsRef<Path>) -> Result<(Vec<u8>, Texture2DParams)> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .flipv()
        .to_rgba8();
    let (width, height) = img.dimensions();
    let params = Texture2DParams {
        width,
        height,
        ..Texture2DParams::default()
    };
    Ok((img.into_raw(), params))
}

pub fn checkerboard(size: u32, checker_size: u32, color1: [u8; 4], color2: [u8; 4]) -> Vec<u8> {
    let checker_size = checker_size.max(1);
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    for y in 0..size {
        for x in 0..size {
            let checker_x = (x / checker_size) % 2;
            let checker_y = (y / checker_size) % 2;
            let color = if (checker_x + checker_y) % 2 == 0 {
                color1
            } else {
                color2
            };
            let idx = ((y * size + x) * 4) as usize;
            pixels[idx..idx + 4].copy_from_slice(&color);
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::RecordingBackend;

    fn context() -> GraphicsContext {
        GraphicsContext::new(Box::new(RecordingBackend::new()))
    }

    fn params(width: u32, height: u32) -> Texture2DParams {
        Texture2DParams {
            width,
            height,
            ..Texture2DParams::default()
        }
    }

    #[test]
    fn valid_texture_gets_a_handle() {
        let mut ctx = context();
        let texture = Texture2D::new(&mut ctx, &[255u8; 16], params(2, 2));
        assert!(texture.is_valid());
    }

    #[test]
    fn zero_size_and_short_data_yield_sentinels() {
        let mut ctx = context();
        assert!(!Texture2D::new(&mut ctx, &[0u8; 16], params(0, 2)).is_valid());
        assert!(!Texture2D::new(&mut ctx, &[0u8; 15], params(2, 2)).is_valid());
        assert_eq!(ctx.collect_garbage(), 0);
    }

    #[test]
    fn huge_dimensions_yield_invalid_sentinel() {
        let mut ctx = context();
        let texture = Texture2D::new(&mut ctx, &[0u8; 4], params(u32::MAX, u32::MAX));
        assert!(!texture.is_valid());
        assert!(!Texture2D::new(&mut ctx, &[0u8; 4], params(70_000, 1)).is_valid());
        assert_eq!(ctx.collect_garbage(), 0);
    }

    #[test]
    fn sampler_flags_follow_filtering_mode() {
        let mut p = params(1, 1);
        assert!(p.sampler_flags().contains(SamplerFlags::MIN_ANISOTROPIC));
        p.nearest = true;
        let flags = p.sampler_flags();
        assert!(flags.contains(SamplerFlags::MIN_POINT | SamplerFlags::MAG_POINT));
        assert!(flags.contains(SamplerFlags::U_BORDER | SamplerFlags::V_BORDER));
    }

    #[test]
    fn missing_file_falls_back_to_checkerboard() {
        let mut ctx = context();
        let texture = Texture2D::from_path(&mut ctx, "no/such/texture.png", false);
        assert!(texture.is_valid());
        assert_eq!(texture.params().width, NO_TEXTURE_SIZE);
    }

    #[test]
    fn checkerboard_alternates_colors() {
        let pixels = checkerboard(4, 2, MAGENTA, BLACK);
        assert_eq!(&pixels[0..4], &MAGENTA);
        assert_eq!(&pixels[8..12], &BLACK);
        // second row of checkers starts with the other color
        let row2 = (2 * 4) * 4;
        assert_eq!(&pixels[row2..row2 + 4], &BLACK);
    }
}
