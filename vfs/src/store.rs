use std::collections::HashMap;
use std::sync::Arc;

use crate::error::FetchError;
use crate::path;
use crate::provider::{AssetProvider, FetchFuture};

/// Routes asset paths to mounted providers.
///
/// The first segment of a path names the mount (`textures/shirt/sleeve.png`
/// reads `shirt/sleeve.png` from the `textures` provider). A path whose first
/// segment is not a mount goes, whole, to the default mount if one is set.
///
/// Cloning is cheap; clones share the providers but not later mounts.
#[derive(Clone, Default)]
pub struct AssetStore {
    mounts: HashMap<String, Arc<dyn AssetProvider>>,
    default_mount: Option<String>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `provider` as `name`, replacing any previous mount of that name.
    pub fn mount(&mut self, name: impl Into<String>, provider: impl AssetProvider) {
        let name = name.into();
        log::debug!("Mounted {} as '{}'", provider.describe(), name);
        self.mounts.insert(name, Arc::new(provider));
    }

    /// Use `name` for paths that do not start with a mount name.
    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default_mount = Some(name.into());
    }

    /// Whether a provider is mounted as `name`.
    pub fn is_mounted(&self, name: &str) -> bool {
        self.mounts.contains_key(name)
    }

    pub fn read(&self, raw_path: &str) -> FetchFuture<Vec<u8>> {
        match self.route(raw_path) {
            Ok((provider, path)) => provider.read(&path),
            Err(err) => Box::pin(async move { Err(err) }),
        }
    }

    pub fn exists(&self, raw_path: &str) -> FetchFuture<bool> {
        match self.route(raw_path) {
            Ok((provider, path)) => provider.exists(&path),
            Err(err) => Box::pin(async move { Err(err) }),
        }
    }

    fn route(&self, raw_path: &str) -> Result<(&dyn AssetProvider, String), FetchError> {
        let normalized = path::normalize(raw_path)?;
        let (mount, rest) = path::split_mount(&normalized);

        if let Some(provider) = self.mounts.get(mount) {
            if rest.is_empty() {
                return Err(FetchError::InvalidPath(format!(
                    "'{raw_path}' names a mount, not a file"
                )));
            }
            return Ok((provider.as_ref(), rest.to_owned()));
        }

        match &self.default_mount {
            Some(default) => match self.mounts.get(default) {
                Some(provider) => Ok((provider.as_ref(), normalized)),
                None => Err(FetchError::NoSuchSource(default.clone())),
            },
            None => Err(FetchError::NoSuchSource(mount.to_owned())),
        }
    }
}
