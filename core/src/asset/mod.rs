//! Wearable assets: layer definitions, resolved layers and the catalogue.

mod catalogue;
mod graphics;
mod layer;
mod validation;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use catalogue::{AssetCatalogue, CatalogueHandle, GraphicsDefinitionFile};
pub use graphics::{AssetGraphics, AssetGraphicsDefinition};
pub use layer::{
    AssetLayer, LayerDefinition, LayerImageOverride, LayerMirror, LayerPoints, LayerPriority,
    LayerSide,
};
pub use validation::{ValidationIssue, validate_asset};

/// Stable identifier of an asset within a catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Arc<str>);

impl AssetId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
