//! Scene output of a character composite.

use std::sync::Arc;

use marionette_core::asset::{AssetId, LayerPriority};

use crate::mesh::LayerMesh;
use crate::texture::LayerTexture;

/// Colour used when no tint override is set.
pub const DEFAULT_COLOR: u32 = 0xFF_FF_FF;

/// One drawable layer, borrowed from the character.
#[derive(Debug, Clone, Copy)]
pub struct LayerNode<'a> {
    pub asset: &'a AssetId,
    pub name: &'a str,
    pub priority: LayerPriority,
    /// Draw position, 0 is drawn first.
    pub z_index: usize,
    pub mesh: &'a LayerMesh,
    pub texture: &'a Arc<LayerTexture>,
    /// `0xRRGGBB` tint.
    pub color: u32,
    pub alpha: f32,
}

/// The composite of a character: its layers back to front.
#[derive(Debug, Clone, Default)]
pub struct CharacterNode<'a> {
    pub layers: Vec<LayerNode<'a>>,
}

impl<'a> CharacterNode<'a> {
    /// Number of layers drawn.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer names in draw order.
    pub fn names(&self) -> Vec<&'a str> {
        self.layers.iter().map(|l| l.name).collect()
    }

    /// Find a layer of `asset` by name. Twins of `Select` layers share names;
    /// this returns the first in draw order.
    pub fn find(&self, asset: &AssetId, name: &str) -> Option<&LayerNode<'a>> {
        self.layers.iter().find(|l| l.asset == asset && l.name == name)
    }

    /// Total triangles across all layers.
    pub fn triangle_count(&self) -> usize {
        self.layers.iter().map(|l| l.mesh.triangle_count()).sum()
    }
}
