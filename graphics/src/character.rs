//! The character composite: every rendered layer of the equipped items.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use marionette_core::LoadError;
use marionette_core::asset::{AssetCatalogue, AssetId};
use marionette_core::bone::{PoseChange, PoseSource};

use crate::layer::{GraphicsLayer, LayerStateOverride};
use crate::order::sort_by_priority;
use crate::scene::{CharacterNode, DEFAULT_COLOR, LayerNode};
use crate::texture::TextureLoader;
use crate::vertex::{PosedVertices, VertexBuilder};

/// One equipped asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AppearanceItem {
    pub asset: AssetId,
    /// Applied to every layer of the item.
    pub state: LayerStateOverride,
}

impl AppearanceItem {
    pub fn new(asset: impl Into<AssetId>) -> Self {
        Self {
            asset: asset.into(),
            state: LayerStateOverride::default(),
        }
    }

    pub fn with_state(mut self, state: LayerStateOverride) -> Self {
        self.state = state;
        self
    }
}

/// Rendered layers of one character, kept in step with its pose.
///
/// Layers are stored in active-list order (equip order, then resolved layer
/// order) and drawn in band order; see [`crate::order`].
pub struct GraphicsCharacter {
    catalogue: Arc<AssetCatalogue>,
    loader: Arc<dyn TextureLoader>,
    builder: Box<dyn VertexBuilder>,
    items: Vec<AppearanceItem>,
    layers: Vec<GraphicsLayer>,
    draw_order: Vec<usize>,
    arms_in_front: bool,
    rotations: HashMap<String, f32>,
}

impl GraphicsCharacter {
    /// An empty character posing its layers with [`PosedVertices`].
    pub fn new(catalogue: Arc<AssetCatalogue>, loader: Arc<dyn TextureLoader>) -> Self {
        Self {
            catalogue,
            loader,
            builder: Box::new(PosedVertices),
            items: Vec::new(),
            layers: Vec::new(),
            draw_order: Vec::new(),
            arms_in_front: true,
            rotations: HashMap::new(),
        }
    }

    /// Use `builder` for layers created from now on.
    pub fn with_vertex_builder(mut self, builder: impl VertexBuilder + 'static) -> Self {
        self.builder = Box::new(builder);
        self
    }

    /// Swap the vertex builder and recompute every vertex.
    pub fn set_vertex_builder<P: PoseSource>(
        &mut self,
        builder: impl VertexBuilder + 'static,
        pose: &P,
    ) {
        self.builder = Box::new(builder);
        for layer in &mut self.layers {
            layer.rebuild_vertices(self.builder.as_ref(), pose);
        }
    }

    pub fn catalogue(&self) -> &Arc<AssetCatalogue> {
        &self.catalogue
    }

    pub fn items(&self) -> &[AppearanceItem] {
        &self.items
    }

    /// Layers in draw order.
    pub fn layers(&self) -> impl Iterator<Item = &GraphicsLayer> {
        self.draw_order.iter().map(|&i| &self.layers[i])
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// First layer of `asset` named `name`, in draw order.
    pub fn layer(&self, asset: &AssetId, name: &str) -> Option<&GraphicsLayer> {
        self.layers().find(|l| l.asset() == asset && l.name() == name)
    }

    /// Replace the equipped items.
    ///
    /// Rendered layers whose resolved layer is still present are kept as they
    /// are; every other layer is dropped or built fresh. Fails without
    /// changing anything if an item names an asset the catalogue lacks.
    pub fn set_items<P: PoseSource>(
        &mut self,
        items: Vec<AppearanceItem>,
        pose: &P,
    ) -> Result<(), LoadError> {
        let catalogue = self.catalogue.clone();
        let assets = items
            .iter()
            .map(|item| catalogue.require(&item.asset))
            .collect::<Result<Vec<_>, _>>()?;

        let catch_up = self.pose_diff(pose);
        let mut previous: Vec<Option<GraphicsLayer>> =
            std::mem::take(&mut self.layers).into_iter().map(Some).collect();
        let mut reused = 0;

        for (item, asset) in items.iter().zip(assets) {
            for resolved in asset.layers() {
                let kept = previous
                    .iter_mut()
                    .find(|slot| {
                        slot.as_ref()
                            .is_some_and(|l| Arc::ptr_eq(l.source(), resolved))
                    })
                    .and_then(Option::take);
                let mut layer = match kept {
                    Some(mut layer) => {
                        reused += 1;
                        if catch_up.touches(layer.bone_deps()) {
                            layer.update_vertices(self.builder.as_ref(), pose);
                        }
                        if catch_up.touches(layer.image_bone_deps()) {
                            layer.update_image(pose, self.loader.as_ref());
                        }
                        layer
                    }
                    None => GraphicsLayer::new(
                        resolved.clone(),
                        self.builder.as_ref(),
                        pose,
                        self.loader.as_ref(),
                    ),
                };
                layer.set_item_state(item.state);
                self.layers.push(layer);
            }
        }
        let dropped = previous.iter().flatten().count();
        drop(previous);

        log::debug!(
            "Active layers: {} ({} kept, {} dropped)",
            self.layers.len(),
            reused,
            dropped
        );
        self.items = items;
        self.arms_in_front = pose.arms_in_front();
        self.snapshot(pose);
        self.sort();
        Ok(())
    }

    /// Switch to another catalogue and rebuild against it.
    ///
    /// Items whose asset is missing from the new catalogue are unequipped.
    pub fn set_catalogue<P: PoseSource>(&mut self, catalogue: Arc<AssetCatalogue>, pose: &P) {
        log::info!(
            "Character switching catalogue {} -> {}",
            self.catalogue.hash(),
            catalogue.hash()
        );
        let items: Vec<AppearanceItem> = std::mem::take(&mut self.items)
            .into_iter()
            .filter(|item| {
                let present = catalogue.asset(&item.asset).is_some();
                if !present {
                    log::warn!("Asset '{}' is not in catalogue {}", item.asset, catalogue.hash());
                }
                present
            })
            .collect();
        self.catalogue = catalogue;
        if let Err(err) = self.set_items(items, pose) {
            log::warn!("Rebuild after catalogue switch failed: {err}");
        }
    }

    /// React to a pose notification.
    ///
    /// Only layers whose dependency sets intersect the changed bones are
    /// touched; the draw order is recomputed only if the arms flag moved.
    /// Returns the number of layers whose vertices were recomputed.
    pub fn apply_pose_change<P: PoseSource>(&mut self, change: &PoseChange, pose: &P) -> usize {
        let builder = self.builder.as_ref();
        let loader = self.loader.as_ref();
        let mut revertexed = 0;
        let mut reimaged = 0;

        if !change.bones.is_empty() {
            for layer in &mut self.layers {
                if change.touches(layer.bone_deps()) {
                    layer.update_vertices(builder, pose);
                    revertexed += 1;
                }
                if change.touches(layer.image_bone_deps()) && layer.update_image(pose, loader) {
                    reimaged += 1;
                }
            }
            for bone in &change.bones {
                if let Some(rotation) = pose.rotation(bone) {
                    self.rotations.insert(bone.clone(), rotation);
                }
            }
        }

        if change.arms_changed || pose.arms_in_front() != self.arms_in_front {
            self.arms_in_front = pose.arms_in_front();
            self.sort();
        }

        log::trace!(
            "Pose change over {} bones: {} layers re-vertexed, {} images switched",
            change.bones.len(),
            revertexed,
            reimaged
        );
        revertexed
    }

    /// Compare `pose` with the last state this character saw and apply the
    /// difference.
    pub fn update_pose<P: PoseSource>(&mut self, pose: &P) -> usize {
        let change = self.pose_diff(pose);
        if change.is_empty() {
            return 0;
        }
        self.apply_pose_change(&change, pose)
    }

    /// Drive in-flight texture loads. Returns the number of textures swapped in.
    pub fn poll_textures(&mut self) -> usize {
        self.layers.iter_mut().map(GraphicsLayer::poll_textures).sum()
    }

    /// Number of texture loads in flight across all layers.
    pub fn pending_loads(&self) -> usize {
        self.layers.iter().map(GraphicsLayer::pending_loads).sum()
    }

    /// Set the tint/opacity of every layer of `asset`. Returns whether the
    /// asset is equipped.
    pub fn set_item_state(&mut self, asset: &AssetId, state: LayerStateOverride) -> bool {
        let mut found = false;
        for item in self.items.iter_mut().filter(|i| i.asset == *asset) {
            item.state = state;
            found = true;
        }
        for layer in self.layers.iter_mut().filter(|l| l.asset() == asset) {
            layer.set_item_state(state);
        }
        found
    }

    /// Set the tint/opacity of one resolved layer of `asset`, by its index in
    /// [`AssetGraphics::layers`](marionette_core::asset::AssetGraphics::layers).
    pub fn set_layer_state(
        &mut self,
        asset: &AssetId,
        layer_index: usize,
        state: LayerStateOverride,
    ) -> bool {
        let Some(resolved) = self
            .catalogue
            .asset(asset)
            .and_then(|a| a.layers().get(layer_index))
        else {
            return false;
        };
        let mut found = false;
        for layer in self.layers.iter_mut().filter(|l| Arc::ptr_eq(l.source(), resolved)) {
            layer.set_layer_state(state);
            found = true;
        }
        found
    }

    /// The composite in draw order.
    pub fn node(&self) -> CharacterNode<'_> {
        CharacterNode {
            layers: self
                .layers()
                .map(|layer| {
                    let state = layer.state();
                    LayerNode {
                        asset: layer.asset(),
                        name: layer.name(),
                        priority: layer.priority(),
                        z_index: layer.z_index(),
                        mesh: layer.mesh(),
                        texture: layer.texture(),
                        color: state.color.unwrap_or(DEFAULT_COLOR),
                        alpha: state.alpha.unwrap_or(1.0),
                    }
                })
                .collect(),
        }
    }

    fn dependency_bones(&self) -> HashSet<&str> {
        self.layers
            .iter()
            .flat_map(|l| l.bone_deps().iter().chain(l.image_bone_deps()))
            .map(String::as_str)
            .collect()
    }

    fn pose_diff<P: PoseSource>(&self, pose: &P) -> PoseChange {
        let bones = self
            .dependency_bones()
            .into_iter()
            .filter(|bone| pose.rotation(bone) != self.rotations.get(*bone).copied())
            .map(str::to_owned)
            .collect();
        PoseChange {
            bones,
            arms_changed: pose.arms_in_front() != self.arms_in_front,
        }
    }

    fn snapshot<P: PoseSource>(&mut self, pose: &P) {
        let rotations = self
            .dependency_bones()
            .into_iter()
            .filter_map(|bone| pose.rotation(bone).map(|r| (bone.to_owned(), r)))
            .collect();
        self.rotations = rotations;
    }

    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.layers.len()).collect();
        sort_by_priority(&mut order, self.arms_in_front, |&i| self.layers[i].priority());
        for (z_index, &i) in order.iter().enumerate() {
            self.layers[i].set_z_index(z_index);
        }
        self.draw_order = order;
    }
}
