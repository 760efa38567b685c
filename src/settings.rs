use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::renderer::{BatchParams, ResetFlags};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub renderer: RendererSettings,
    #[serde(default)]
    pub batch: BatchParams,
}

impl EngineSettings {
    pub fn load() -> Self {
        Self::load_from_path("settings.json")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<EngineSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded engine settings from {:?}", path);
                    settings.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default engine settings.",
                        path, err
                    );
                    EngineSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Engine settings file {:?} not found. Using default settings.",
                    path
                );
                EngineSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default engine settings.",
                    path, err
                );
                EngineSettings::default()
            }
        }
    }

    fn validate(mut self) -> Self {
        if self.window.width == 0 || self.window.height == 0 {
            warn!("Window size must be greater than zero. Using default size.");
            self.window.width = WindowSettings::default_width();
            self.window.height = WindowSettings::default_height();
        }

        if self.batch.max_data_count == 0 {
            warn!("Batch capacity must be greater than zero. Using default value.");
            self.batch = BatchParams::default();
        }

        if self.renderer.shader_dir.as_os_str().is_empty() {
            warn!("Shader directory is empty. Using default directory.");
            self.renderer.shader_dir = RendererSettings::default_shader_dir();
        }

        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "WindowSettings::default_title")]
    pub title: String,
    #[serde(default = "WindowSettings::default_width")]
    pub width: u32,
    #[serde(default = "WindowSettings::default_height")]
    pub height: u32,
    #[serde(default = "WindowSettings::default_vsync")]
    pub vsync: bool,
    #[serde(default)]
    pub msaa: MsaaSetting,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            width: Self::default_width(),
            height: Self::default_height(),
            vsync: Self::default_vsync(),
            msaa: MsaaSetting::default(),
        }
    }
}

impl WindowSettings {
    /// Backbuffer flags for `RenderBackend::reset`.
    pub fn reset_flags(&self) -> ResetFlags {
        let mut flags = ResetFlags::empty();
        if self.vsync {
            flags |= ResetFlags::VSYNC;
        }
        flags | self.msaa.reset_flags()
    }

    fn default_title() -> String {
        "render-core".to_owned()
    }

    const fn default_width() -> u32 {
        1280
    }

    const fn default_height() -> u32 {
        720
    }

    const fn default_vsync() -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsaaSetting {
    Off,
    #[default]
    X4,
    X16,
}

impl MsaaSetting {
    fn reset_flags(self) -> ResetFlags {
        match self {
            MsaaSetting::Off => ResetFlags::empty(),
            MsaaSetting::X4 => ResetFlags::MSAA_X4,
            MsaaSetting::X16 => ResetFlags::MSAA_X16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererSettings {
    /// Directory holding `<name>-vert.bin` / `<name>-frag.bin` pairs.
    #[serde(default = "RendererSettings::default_shader_dir")]
    pub shader_dir: PathBuf,
    #[serde(default = "RendererSettings::default_standard_shaders")]
    pub standard_shaders: Vec<String>,
    /// Also load the `debugdraw` shader.
    #[serde(default = "RendererSettings::default_debug_shaders")]
    pub debug_shaders: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            shader_dir: Self::default_shader_dir(),
            standard_shaders: Self::default_standard_shaders(),
            debug_shaders: Self::default_debug_shaders(),
        }
    }
}

impl RendererSettings {
    fn default_shader_dir() -> PathBuf {
        PathBuf::from("shaders/compiled")
    }

    fn default_standard_shaders() -> Vec<String> {
        vec!["uber".to_owned(), "simple".to_owned()]
    }

    const fn default_debug_shaders() -> bool {
        cfg!(debug_assertions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_settings() -> EngineSettings {
        EngineSettings {
            window: WindowSettings {
                width: 0,
                height: 0,
                ..WindowSettings::default()
            },
            renderer: RendererSettings {
                shader_dir: PathBuf::new(),
                ..RendererSettings::default()
            },
            batch: BatchParams { max_data_count: 0 },
        }
    }

    #[test]
    fn validate_replaces_invalid_values_with_defaults() {
        let validated = invalid_settings().validate();
        let defaults = EngineSettings::default();

        assert_eq!(validated.window.width, defaults.window.width);
        assert_eq!(validated.window.height, defaults.window.height);
        assert_eq!(validated.batch, defaults.batch);
        assert_eq!(validated.renderer.shader_dir, defaults.renderer.shader_dir);
    }

    #[test]
    fn validate_preserves_valid_values() {
        let valid = EngineSettings {
            window: WindowSettings {
                width: 1920,
                height: 1080,
                ..WindowSettings::default()
            },
            batch: BatchParams {
                max_data_count: 64,
            },
            ..EngineSettings::default()
        };

        assert_eq!(valid.clone().validate(), valid);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let parsed: EngineSettings =
            serde_json::from_str(r#"{ "window": { "msaa": "x16", "vsync": false } }"#).unwrap();
        assert_eq!(parsed.window.width, 1280);
        assert_eq!(parsed.batch.max_data_count, 1000);
        assert_eq!(parsed.window.reset_flags(), ResetFlags::MSAA_X16);
        assert_eq!(parsed.renderer.standard_shaders, vec!["uber", "simple"]);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = EngineSettings::load_from_path("definitely/not/here.json");
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn reset_flags_combine_vsync_and_msaa() {
        let window = WindowSettings::default();
        assert_eq!(window.reset_flags(), ResetFlags::VSYNC | ResetFlags::MSAA_X4);
    }
}
