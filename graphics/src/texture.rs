//! Layer textures and the loaders that fetch them.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use marionette_vfs::{AssetStore, path};
use parking_lot::Mutex;

use crate::error::TextureError;

/// Decoded RGBA8 image bound to a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerTexture {
    /// Image name the texture was requested as. Empty for the placeholder.
    pub path: String,
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub rgba: Vec<u8>,
}

impl LayerTexture {
    /// Decode encoded image bytes.
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Result<Self, TextureError> {
        let path = path.into();
        let decoded = match image::load_from_memory(bytes) {
            Ok(decoded) => decoded.to_rgba8(),
            Err(source) => return Err(TextureError::Decode { path, source }),
        };
        Ok(Self {
            path,
            width: decoded.width(),
            height: decoded.height(),
            rgba: decoded.into_raw(),
        })
    }

    /// 1x1 transparent placeholder shown until a real texture arrives.
    pub fn empty() -> Self {
        Self {
            path: String::new(),
            width: 1,
            height: 1,
            rgba: vec![0; 4],
        }
    }

    /// Whether this is the placeholder.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// A texture load in flight.
pub type TextureFuture =
    Pin<Box<dyn Future<Output = Result<Arc<LayerTexture>, TextureError>> + Send>>;

/// Source of layer textures.
pub trait TextureLoader {
    /// Start loading the texture named `path`.
    fn load(&self, path: &str) -> TextureFuture;
}

/// Loads textures from an [`AssetStore`], caching decoded images per name.
///
/// Image names are resolved under `root`, so with root `textures` the name
/// `shirt/sleeve.png` reads `textures/shirt/sleeve.png`.
#[derive(Clone)]
pub struct VfsTextureLoader {
    store: AssetStore,
    root: String,
    cache: Arc<Mutex<HashMap<String, Arc<LayerTexture>>>>,
}

impl VfsTextureLoader {
    pub fn new(store: AssetStore, root: impl Into<String>) -> Self {
        Self {
            store,
            root: root.into(),
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of decoded textures held by the cache.
    pub fn cached(&self) -> usize {
        self.cache.lock().len()
    }

    /// Drop every cached texture.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

impl TextureLoader for VfsTextureLoader {
    fn load(&self, name: &str) -> TextureFuture {
        if let Some(texture) = self.cache.lock().get(name).cloned() {
            return Box::pin(async move { Ok(texture) });
        }

        let name = name.to_owned();
        let fetch = match path::join(&self.root, &name) {
            Ok(full) => self.store.read(&full),
            Err(source) => {
                return Box::pin(async move { Err(TextureError::Fetch { path: name, source }) });
            }
        };
        let cache = self.cache.clone();
        Box::pin(async move {
            let bytes = match fetch.await {
                Ok(bytes) => bytes,
                Err(source) => return Err(TextureError::Fetch { path: name, source }),
            };
            let texture = Arc::new(LayerTexture::from_bytes(name.clone(), &bytes)?);
            log::debug!("Decoded texture '{}' ({}x{})", name, texture.width, texture.height);
            cache.lock().insert(name, texture.clone());
            Ok(texture)
        })
    }
}
