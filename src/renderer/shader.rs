// renderer/shader.rs
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{RenderError, Result};

use super::context::{GpuResource, GraphicsContext};
use super::handle::{Handle, Program, ShaderModule};

/// A linked program built from a precompiled vertex and fragment blob.
#[derive(Debug)]
pub struct Shader {
    name: String,
    program: GpuResource<Program>,
    // Kept alive for as long as the program that links them.
    _modules: [GpuResource<ShaderModule>; 2],
}

impl Shader {
    /// Builds a program from in-memory blobs. Fails if the backend rejects
    /// either blob or the link.
    pub fn from_memory(
        ctx: &mut GraphicsContext,
        name: impl Into<String>,
        vertex_code: &[u8],
        fragment_code: &[u8],
    ) -> Result<Self> {
        let name = name.into();
        let backend = ctx.backend_mut();
        let vs = backend.create_shader(vertex_code);
        let fs = backend.create_shader(fragment_code);
        let program = backend.create_program(vs, fs);

        let modules = [ctx.track(vs), ctx.track(fs)];
        let program = ctx.track(program);
        if !program.is_valid() {
            return Err(RenderError::ShaderCreation(name));
        }

        log::info!("Loaded shader: {}", name);
        Ok(Self {
            name,
            program,
            _modules: modules,
        })
    }

    /// Reads both blobs from disk. The name comes from the vertex file.
    pub fn load(
        ctx: &mut GraphicsContext,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();
        let vertex_code = read_blob(vertex_path)?;
        let fragment_code = read_blob(fragment_path)?;
        Self::from_memory(
            ctx,
            shader_name_from_path(vertex_path),
            &vertex_code,
            &fragment_code,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> Handle<Program> {
        self.program.handle()
    }
}

fn read_blob(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `shaders/compiled/uber-vert.bin` -> `uber`.
pub fn shader_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    ["-vert", "-frag"]
        .iter()
        .find_map(|suffix| stem.strip_suffix(suffix))
        .map(str::to_owned)
        .unwrap_or(stem)
}

/// Paths of the blob pair for a named shader inside `dir`.
pub fn shader_paths(dir: &Path, name: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{name}-vert.bin")),
        dir.join(format!("{name}-frag.bin")),
    )
}

/// Name-keyed registry of loaded shaders.
#[derive(Debug, Default)]
pub struct ShaderManager {
    shaders: HashMap<String, Rc<Shader>>,
}

impl ShaderManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        ctx: &mut GraphicsContext,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Rc<Shader>> {
        Shader::load(ctx, vertex_path, fragment_path).map(Rc::new)
    }

    /// Loads a shader and registers it. A shader that fails to load is logged
    /// and skipped. Returns whether it was added.
    pub fn load_and_add(
        &mut self,
        ctx: &mut GraphicsContext,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> bool {
        match Self::load(ctx, vertex_path, fragment_path) {
            Ok(shader) => {
                self.add(shader);
                true
            }
            Err(err) => {
                log::error!("Failed to load shader: {}", err);
                false
            }
        }
    }

    /// Registers a shader under its own name, replacing any previous one.
    pub fn add(&mut self, shader: Rc<Shader>) {
        if self
            .shaders
            .insert(shader.name().to_owned(), shader)
            .is_some()
        {
            log::debug!("Replaced an already registered shader");
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<Shader>> {
        self.shaders.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shaders.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shaders.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.shaders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::RecordingBackend;

    fn context() -> GraphicsContext {
        GraphicsContext::new(Box::new(RecordingBackend::new()))
    }

    #[test]
    fn name_strips_directory_and_stage_suffix() {
        assert_eq!(
            shader_name_from_path(Path::new("../shaders/compiled/uber-vert.bin")),
            "uber"
        );
        assert_eq!(shader_name_from_path(Path::new("debugdraw-frag.bin")), "debugdraw");
        assert_eq!(shader_name_from_path(Path::new("plain.bin")), "plain");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut ctx = context();
        let err = Shader::load(&mut ctx, "does/not/exist-vert.bin", "does/not/exist-frag.bin")
            .unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }

    #[test]
    fn load_and_add_skips_failures() {
        let mut ctx = context();
        let mut manager = ShaderManager::new();
        assert!(!manager.load_and_add(&mut ctx, "nope-vert.bin", "nope-frag.bin"));
        assert!(manager.is_empty());
    }

    #[test]
    fn rejected_blob_releases_what_was_created() {
        let mut ctx = context();
        let err = Shader::from_memory(&mut ctx, "broken", b"vs", b"").unwrap_err();
        assert!(matches!(err, RenderError::ShaderCreation(name) if name == "broken"));
        assert_eq!(ctx.collect_garbage(), 1);
    }

    #[test]
    fn manager_replaces_shaders_by_name() {
        let mut ctx = context();
        let mut manager = ShaderManager::new();
        let first = Rc::new(Shader::from_memory(&mut ctx, "uber", b"a", b"b").unwrap());
        let second = Rc::new(Shader::from_memory(&mut ctx, "uber", b"c", b"d").unwrap());
        manager.add(first);
        manager.add(Rc::clone(&second));
        assert_eq!(manager.len(), 1);
        assert!(Rc::ptr_eq(&manager.get("uber").unwrap(), &second));
        assert!(manager.get("simple").is_none());
    }
}
