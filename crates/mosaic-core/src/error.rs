use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading the shape catalog or its textures.
///
/// All variants are fatal at startup; there is no retry policy.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The catalog document could not be read.
    #[error("failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog document is not valid catalog JSON.
    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// A shape descriptor is structurally unusable.
    #[error("shape '{id}' is invalid: {reason}")]
    InvalidShape { id: String, reason: String },

    /// Two shape descriptors share the same id.
    #[error("duplicate shape id '{0}'")]
    DuplicateId(String),

    /// A texture key is not part of the loaded texture set.
    #[error("texture '{key}' referenced by shape '{shape}' is not loaded")]
    MissingTexture { key: String, shape: String },

    /// A texture file could not be read.
    #[error("failed to read texture {path}: {source}")]
    TextureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A texture file could not be decoded.
    #[error("failed to decode texture '{key}': {source}")]
    TextureDecode {
        key: String,
        #[source]
        source: image::ImageError,
    },
}
