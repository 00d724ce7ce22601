//! A single rendered layer.

use std::collections::HashSet;
use std::sync::Arc;

use marionette_core::asset::{AssetId, AssetLayer, LayerPriority};
use marionette_core::bone::BoneLookup;
use marionette_vfs::poll_once;

use crate::mesh::LayerMesh;
use crate::texture::{LayerTexture, TextureFuture, TextureLoader};
use crate::triangulation::masked_indices;
use crate::vertex::VertexBuilder;

/// Tint and opacity applied to a layer without touching its mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerStateOverride {
    /// `0xRRGGBB` multiply colour.
    pub color: Option<u32>,
    /// Opacity in `0.0..=1.0`.
    pub alpha: Option<f32>,
}

impl LayerStateOverride {
    /// Fields set in `self` win over `fallback`.
    pub fn or(self, fallback: LayerStateOverride) -> LayerStateOverride {
        LayerStateOverride {
            color: self.color.or(fallback.color),
            alpha: self.alpha.or(fallback.alpha),
        }
    }

    /// Alpha clamped to `0.0..=1.0`. A NaN alpha is dropped.
    pub fn clamped(self) -> LayerStateOverride {
        LayerStateOverride {
            color: self.color,
            alpha: self
                .alpha
                .filter(|a| !a.is_nan())
                .map(|a| a.clamp(0.0, 1.0)),
        }
    }
}

struct PendingTexture {
    path: String,
    future: TextureFuture,
}

/// Rendered form of one resolved asset layer.
///
/// Dependency sets are fixed at construction: `bone_deps` holds every bone
/// read by the transforms of selected points, `image_bone_deps` every bone
/// read by image-override conditions.
pub struct GraphicsLayer {
    source: Arc<AssetLayer>,
    bone_deps: HashSet<String>,
    image_bone_deps: HashSet<String>,
    selected: Vec<usize>,
    mesh: LayerMesh,
    desired_image: String,
    texture: Arc<LayerTexture>,
    pending: Vec<PendingTexture>,
    item_state: LayerStateOverride,
    layer_state: LayerStateOverride,
    z_index: usize,
}

impl GraphicsLayer {
    /// Build the layer: triangulate, compute UVs, pose the vertices and start
    /// loading the image for the current pose.
    pub fn new(
        source: Arc<AssetLayer>,
        builder: &dyn VertexBuilder,
        lookup: &dyn BoneLookup,
        loader: &dyn TextureLoader,
    ) -> Self {
        let selection = source.selection();
        let selected: Vec<usize> = source
            .points
            .iter()
            .filter(|p| selection.matches(p))
            .map(|p| p.index)
            .collect();

        let bone_deps = selected
            .iter()
            .flat_map(|&i| source.points[i].transforms.iter())
            .flat_map(|t| t.bones())
            .map(str::to_owned)
            .collect();
        let image_bone_deps = source
            .definition
            .image_overrides
            .iter()
            .flat_map(|o| o.condition.bones())
            .map(str::to_owned)
            .collect();

        let mut mesh = LayerMesh::new();
        mesh.set_topology(
            source.points.iter().map(|p| source.uv(p.pos)).collect(),
            masked_indices(&source.points, &selection),
        );

        let mut layer = Self {
            source,
            bone_deps,
            image_bone_deps,
            selected,
            mesh,
            desired_image: String::new(),
            texture: Arc::new(LayerTexture::empty()),
            pending: Vec::new(),
            item_state: LayerStateOverride::default(),
            layer_state: LayerStateOverride::default(),
            z_index: 0,
        };
        layer.rebuild_vertices(builder, lookup);
        layer.update_image(lookup, loader);
        log::debug!(
            "Created layer '{}' of '{}' ({} points, {} triangles)",
            layer.name(),
            layer.asset(),
            layer.source.points.len(),
            layer.mesh.triangle_count()
        );
        layer
    }

    /// Recompute every vertex. Masked-out points are placed at rest.
    pub fn rebuild_vertices(&mut self, builder: &dyn VertexBuilder, lookup: &dyn BoneLookup) {
        let mut vertices: Vec<[f32; 2]> =
            self.source.points.iter().map(|p| [p.pos.x, p.pos.y]).collect();
        for &i in &self.selected {
            vertices[i] = builder.vertex(&self.source.points[i], lookup);
        }
        self.mesh.set_vertices(vertices);
    }

    /// Recompute the vertices of selected points after a pose change.
    pub fn update_vertices(&mut self, builder: &dyn VertexBuilder, lookup: &dyn BoneLookup) {
        let points = &self.source.points;
        self.mesh.update_vertices(
            self.selected
                .iter()
                .map(|&i| (i, builder.vertex(&points[i], lookup))),
        );
    }

    /// Re-resolve the image for the current pose and start a load if it changed.
    ///
    /// Returns whether the desired image changed.
    pub fn update_image(&mut self, lookup: &dyn BoneLookup, loader: &dyn TextureLoader) -> bool {
        let image = self.source.definition.resolve_image(lookup);
        if image == self.desired_image {
            return false;
        }
        self.desired_image = image.to_owned();

        let bound = self.texture.path == self.desired_image;
        let in_flight = self.pending.iter().any(|p| p.path == self.desired_image);
        if !bound && !in_flight {
            self.pending.push(PendingTexture {
                path: self.desired_image.clone(),
                future: loader.load(&self.desired_image),
            });
        }
        true
    }

    /// Poll in-flight loads once. Returns the number of textures swapped in.
    ///
    /// A finished load is applied only if it is still the desired image.
    /// Failures keep the current texture.
    pub fn poll_textures(&mut self) -> usize {
        let mut swapped = 0;
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut pending in std::mem::take(&mut self.pending) {
            match poll_once(&mut pending.future) {
                None => still_pending.push(pending),
                Some(Ok(texture)) if pending.path == self.desired_image => {
                    self.texture = texture;
                    swapped += 1;
                }
                Some(Ok(_)) => {
                    log::debug!(
                        "Discarded stale texture '{}' for layer '{}' (wants '{}')",
                        pending.path,
                        self.name(),
                        self.desired_image
                    );
                }
                Some(Err(err)) => {
                    log::warn!("Layer '{}' keeps its previous texture: {}", self.name(), err);
                }
            }
        }
        self.pending = still_pending;
        swapped
    }

    /// The resolved layer this renders.
    pub fn source(&self) -> &Arc<AssetLayer> {
        &self.source
    }

    pub fn asset(&self) -> &AssetId {
        &self.source.asset
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn priority(&self) -> LayerPriority {
        self.source.priority()
    }

    pub fn bone_deps(&self) -> &HashSet<String> {
        &self.bone_deps
    }

    pub fn image_bone_deps(&self) -> &HashSet<String> {
        &self.image_bone_deps
    }

    pub fn mesh(&self) -> &LayerMesh {
        &self.mesh
    }

    /// Image the current pose asks for.
    pub fn desired_image(&self) -> &str {
        &self.desired_image
    }

    /// Texture currently drawn.
    pub fn texture(&self) -> &Arc<LayerTexture> {
        &self.texture
    }

    /// Number of loads in flight.
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    pub fn set_item_state(&mut self, state: LayerStateOverride) {
        self.item_state = state.clamped();
    }

    pub fn set_layer_state(&mut self, state: LayerStateOverride) {
        self.layer_state = state.clamped();
    }

    /// Layer override merged over the item override.
    pub fn state(&self) -> LayerStateOverride {
        self.layer_state.or(self.item_state)
    }

    pub fn z_index(&self) -> usize {
        self.z_index
    }

    pub(crate) fn set_z_index(&mut self, z_index: usize) {
        self.z_index = z_index;
    }
}

impl Drop for GraphicsLayer {
    fn drop(&mut self) {
        log::debug!("Destroyed layer '{}' of '{}'", self.name(), self.asset());
    }
}
