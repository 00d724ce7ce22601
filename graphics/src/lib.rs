//! # Marionette Graphics
//!
//! Turns resolved asset layers into drawable meshes and keeps them in step
//! with a character pose.
//!
//! ## Overview
//!
//! - [`GraphicsCharacter`] - The composite of every equipped item's layers
//! - [`GraphicsLayer`] - One triangulated, textured layer with its bone dependencies
//! - [`VertexBuilder`] - Pluggable vertex computation ([`PosedVertices`], [`RestVertices`])
//! - [`TextureLoader`] - Async texture source, [`VfsTextureLoader`] reads an asset store
//! - [`CharacterNode`] - Borrowed scene output in draw order
//!
//! ## Example
//!
//! ```ignore
//! use marionette_graphics::{AppearanceItem, GraphicsCharacter, VfsTextureLoader};
//!
//! let mut character = GraphicsCharacter::new(catalogue, Arc::new(loader));
//! character.set_items(vec![AppearanceItem::new("shirt")], &pose)?;
//! let change = pose.set_rotation("arm_l", 30.0);
//! character.apply_pose_change(&change, &pose);
//! character.poll_textures();
//! draw(character.node());
//! ```

pub mod character;
pub mod error;
pub mod layer;
pub mod mesh;
pub mod order;
pub mod scene;
pub mod texture;
pub mod triangulation;
pub mod vertex;

pub use character::{AppearanceItem, GraphicsCharacter};
pub use error::TextureError;
pub use layer::{GraphicsLayer, LayerStateOverride};
pub use mesh::LayerMesh;
pub use scene::{CharacterNode, LayerNode};
pub use texture::{LayerTexture, TextureFuture, TextureLoader, VfsTextureLoader};
pub use vertex::{PosedVertices, RestVertices, VertexBuilder};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the crate version.
pub fn init() {
    log::info!("Marionette Graphics v{} initialized", VERSION);
}
