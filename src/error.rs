//! Error type shared by the loaders and the submission layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::renderer::ViewId;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Reading a shader blob or any other file failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An image file could not be decoded.
    #[error("failed to decode image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The backend rejected a shader blob or the program linking two of them.
    #[error("backend failed to create shader program '{0}'")]
    ShaderCreation(String),

    #[error("shader '{0}' is not registered")]
    ShaderNotFound(String),

    #[error("texture '{0}' has not been added to the material")]
    TextureNotFound(String),

    /// A single batch input is larger than the batch can ever hold.
    #[error("batch input of {requested} elements exceeds the batch capacity of {capacity}")]
    BatchInputTooLarge { requested: usize, capacity: usize },

    #[error("a render pass for view {view} is already active")]
    PassAlreadyActive { view: ViewId },
}

pub type Result<T> = std::result::Result<T, RenderError>;
