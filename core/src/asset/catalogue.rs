//! The asset catalogue bundle and its reload handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::AssetId;
use super::graphics::{AssetGraphics, AssetGraphicsDefinition};
use super::validation::validate_asset;
use crate::bone::{BoneDeclaration, Skeleton};
use crate::canvas::CharacterCanvas;
use crate::error::LoadError;

/// On-disk JSON bundle: skeleton declarations plus every asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphicsDefinitionFile {
    #[serde(default)]
    pub canvas: CharacterCanvas,
    pub skeleton: BTreeMap<String, BoneDeclaration>,
    #[serde(default)]
    pub assets: BTreeMap<String, AssetGraphicsDefinition>,
}

/// A loaded catalogue.
#[derive(Debug, Clone)]
pub struct AssetCatalogue {
    hash: String,
    canvas: CharacterCanvas,
    skeleton: Arc<Skeleton>,
    assets: BTreeMap<AssetId, Arc<AssetGraphics>>,
}

impl AssetCatalogue {
    /// Parse and load a JSON bundle.
    pub fn from_json(hash: impl Into<String>, bytes: &[u8]) -> Result<Self, LoadError> {
        let file: GraphicsDefinitionFile = serde_json::from_slice(bytes)?;
        Self::from_definition(hash, file)
    }

    /// Load an already parsed bundle.
    ///
    /// Authoring issues found by [`validate_asset`] are logged, not returned.
    pub fn from_definition(
        hash: impl Into<String>,
        file: GraphicsDefinitionFile,
    ) -> Result<Self, LoadError> {
        let canvas = file.canvas;
        let skeleton = Arc::new(Skeleton::from_declarations(
            file.skeleton.iter().map(|(name, decl)| (name.as_str(), decl)),
            &canvas,
        )?);

        let mut assets = BTreeMap::new();
        for (name, definition) in file.assets {
            let id = AssetId::new(name);
            let asset = AssetGraphics::load(id.clone(), definition, canvas, skeleton.clone())?;
            for issue in validate_asset(&asset, &skeleton) {
                log::warn!("{issue}");
            }
            assets.insert(id, Arc::new(asset));
        }

        let catalogue = Self {
            hash: hash.into(),
            canvas,
            skeleton,
            assets,
        };
        log::info!(
            "Loaded catalogue {} ({} bones, {} assets)",
            catalogue.hash,
            catalogue.skeleton.len(),
            catalogue.assets.len()
        );
        Ok(catalogue)
    }

    /// Content hash this catalogue was loaded with.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn canvas(&self) -> &CharacterCanvas {
        &self.canvas
    }

    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    /// Look up an asset.
    pub fn asset(&self, id: &AssetId) -> Option<&Arc<AssetGraphics>> {
        self.assets.get(id)
    }

    /// Look up an asset, failing with [`LoadError::UnknownAsset`].
    pub fn require(&self, id: &AssetId) -> Result<&Arc<AssetGraphics>, LoadError> {
        self.asset(id)
            .ok_or_else(|| LoadError::UnknownAsset(id.to_string()))
    }

    /// Mutable access for editing; clones the asset if it is shared.
    pub fn asset_mut(&mut self, id: &AssetId) -> Result<&mut AssetGraphics, LoadError> {
        self.assets
            .get_mut(id)
            .map(Arc::make_mut)
            .ok_or_else(|| LoadError::UnknownAsset(id.to_string()))
    }

    /// All assets, ordered by id.
    pub fn assets(&self) -> impl Iterator<Item = (&AssetId, &Arc<AssetGraphics>)> {
        self.assets.iter()
    }

    /// Canonical bundle for serialization.
    pub fn export(&self) -> GraphicsDefinitionFile {
        GraphicsDefinitionFile {
            canvas: self.canvas,
            skeleton: self.skeleton.to_declarations(),
            assets: self
                .assets
                .iter()
                .map(|(id, asset)| (id.to_string(), asset.export()))
                .collect(),
        }
    }

    /// Serialize [`AssetCatalogue::export`] as pretty JSON.
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }
}

/// Holder of the current catalogue.
///
/// Consumers keep the `Arc` they were given; a reload swaps the handle's
/// catalogue without touching catalogues already handed out.
#[derive(Debug, Default)]
pub struct CatalogueHandle {
    current: Option<Arc<AssetCatalogue>>,
}

impl CatalogueHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current catalogue, if one has been loaded.
    pub fn current(&self) -> Option<Arc<AssetCatalogue>> {
        self.current.clone()
    }

    /// Reload from `bytes` unless `hash` matches the current catalogue.
    ///
    /// Returns `Ok(true)` if a new catalogue was installed. On error the
    /// previous catalogue stays current.
    pub fn update(&mut self, hash: &str, bytes: &[u8]) -> Result<bool, LoadError> {
        if self.current.as_ref().is_some_and(|c| c.hash() == hash) {
            log::debug!("Catalogue {hash} already loaded");
            return Ok(false);
        }
        let catalogue = AssetCatalogue::from_json(hash, bytes)?;
        if let Some(previous) = &self.current {
            log::info!("Catalogue reloaded: {} -> {}", previous.hash(), hash);
        }
        self.current = Some(Arc::new(catalogue));
        Ok(true)
    }

    /// Install an already loaded catalogue.
    pub fn replace(&mut self, catalogue: AssetCatalogue) -> Arc<AssetCatalogue> {
        let catalogue = Arc::new(catalogue);
        self.current = Some(catalogue.clone());
        catalogue
    }
}
