//! Graphics error types.

use marionette_vfs::FetchError;
use thiserror::Error;

/// Failure to produce a layer texture. Never fatal: the layer keeps drawing
/// its previous texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to fetch texture '{path}': {source}")]
    Fetch {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("Failed to decode texture '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

impl TextureError {
    /// Path of the texture that failed.
    pub fn path(&self) -> &str {
        match self {
            Self::Fetch { path, .. } | Self::Decode { path, .. } => path,
        }
    }
}
