//! Per-asset layer storage and twin derivation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::AssetId;
use super::layer::{AssetLayer, LayerDefinition, LayerMirror, LayerPoints, LayerSide};
use crate::bone::Skeleton;
use crate::canvas::CharacterCanvas;
use crate::error::LoadError;
use crate::mirror::mirror_layer;
use crate::point::{PointDefinition, calculate_points};

/// Serialized form of an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetGraphicsDefinition {
    /// Canonical layers only; twins are never stored.
    #[serde(default)]
    pub layers: Vec<LayerDefinition>,
}

/// The graphics of one wearable asset.
///
/// Only canonical layer data is owned. The resolved list
/// `[layer0, twin0?, layer1, twin1?, ...]` is derived from it after every
/// edit. A resolved layer whose content did not change keeps its `Arc`, so
/// consumers can detect unchanged layers with [`Arc::ptr_eq`].
#[derive(Debug, Clone)]
pub struct AssetGraphics {
    id: AssetId,
    canvas: CharacterCanvas,
    skeleton: Arc<Skeleton>,
    definitions: Vec<LayerDefinition>,
    resolved: Vec<Arc<AssetLayer>>,
    version: u64,
}

impl AssetGraphics {
    /// Validate and resolve an asset.
    pub fn load(
        id: AssetId,
        definition: AssetGraphicsDefinition,
        canvas: CharacterCanvas,
        skeleton: Arc<Skeleton>,
    ) -> Result<Self, LoadError> {
        let mut asset = Self {
            id,
            canvas,
            skeleton,
            definitions: Vec::new(),
            resolved: Vec::new(),
            version: 0,
        };
        asset.replace_definitions(definition.layers)?;
        Ok(asset)
    }

    /// Asset identifier.
    pub fn id(&self) -> &AssetId {
        &self.id
    }

    /// Canvas the asset was resolved against.
    pub fn canvas(&self) -> &CharacterCanvas {
        &self.canvas
    }

    /// Resolved layers, twins right after their source.
    pub fn layers(&self) -> &[Arc<AssetLayer>] {
        &self.resolved
    }

    /// Canonical layer definitions.
    pub fn definitions(&self) -> &[LayerDefinition] {
        &self.definitions
    }

    /// Bumped on every successful edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Edit one canonical layer.
    ///
    /// The edit runs on a copy; if the result fails validation the asset is
    /// left untouched and the error returned.
    pub fn update_layer<F>(&mut self, index: usize, edit: F) -> Result<(), LoadError>
    where
        F: FnOnce(&mut LayerDefinition),
    {
        let layer_count = self.definitions.len();
        let mut definitions = self.definitions.clone();
        let layer = definitions
            .get_mut(index)
            .ok_or_else(|| LoadError::LayerIndexOutOfRange {
                asset: self.id.to_string(),
                index,
                layer_count,
            })?;
        edit(layer);
        self.replace_definitions(definitions)
    }

    /// Append a canonical layer.
    pub fn push_layer(&mut self, layer: LayerDefinition) -> Result<(), LoadError> {
        let mut definitions = self.definitions.clone();
        definitions.push(layer);
        self.replace_definitions(definitions)
    }

    /// Canonical definition for serialization.
    pub fn export(&self) -> AssetGraphicsDefinition {
        AssetGraphicsDefinition {
            layers: self.definitions.clone(),
        }
    }

    fn replace_definitions(&mut self, definitions: Vec<LayerDefinition>) -> Result<(), LoadError> {
        self.validate(&definitions)?;
        self.resolved = self.resolve(&definitions);
        self.definitions = definitions;
        self.version += 1;
        Ok(())
    }

    fn validate(&self, definitions: &[LayerDefinition]) -> Result<(), LoadError> {
        let asset = self.id.to_string();
        for (index, layer) in definitions.iter().enumerate() {
            if !(layer.width.is_finite() && layer.width > 0.0)
                || !(layer.height.is_finite() && layer.height > 0.0)
            {
                return Err(LoadError::InvalidLayer {
                    asset,
                    layer: index,
                    reason: format!("non-positive size {}x{}", layer.width, layer.height),
                });
            }

            let template = match &layer.points {
                LayerPoints::Template(points) => points,
                LayerPoints::Reference(reference) => {
                    match definitions.get(*reference).map(|l| &l.points) {
                        Some(LayerPoints::Template(points)) => points,
                        Some(LayerPoints::Reference(_)) => {
                            return Err(LoadError::NestedPointReference {
                                asset,
                                layer: index,
                                reference: *reference,
                            });
                        }
                        None => {
                            return Err(LoadError::PointReferenceOutOfRange {
                                asset,
                                layer: index,
                                reference: *reference,
                                layer_count: definitions.len(),
                            });
                        }
                    }
                }
            };

            for (point_index, point) in template.iter().enumerate() {
                for transform in &point.transforms {
                    if !self.skeleton.contains(transform.bone()) {
                        return Err(LoadError::UnknownBone {
                            bone: transform.bone().to_owned(),
                            context: format!(
                                "transform of point {point_index} in layer {index} of asset '{asset}'"
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Derive the resolved list, reusing unchanged entries from the current one.
    fn resolve(&self, definitions: &[LayerDefinition]) -> Vec<Arc<AssetLayer>> {
        let mut resolved = Vec::with_capacity(definitions.len() * 2);
        for (index, layer) in definitions.iter().enumerate() {
            let materialized = LayerDefinition {
                points: LayerPoints::Template(template_of(definitions, layer).to_vec()),
                ..layer.clone()
            };

            match mirror_layer(&materialized, &self.canvas) {
                None => resolved.push(self.intern(index, false, materialized, None)),
                Some((twin, source_side, twin_side)) => {
                    resolved.push(self.intern(index, false, materialized, source_side));
                    resolved.push(self.intern(index, true, twin, twin_side));
                }
            }
        }
        resolved
    }

    fn intern(
        &self,
        source_index: usize,
        is_mirror: bool,
        definition: LayerDefinition,
        side: Option<LayerSide>,
    ) -> Arc<AssetLayer> {
        let existing = self
            .resolved
            .iter()
            .find(|l| l.source_index == source_index && l.is_mirror == is_mirror);
        if let Some(existing) = existing
            && *existing.definition == definition
            && existing.side == side
        {
            return existing.clone();
        }

        let template = match &definition.points {
            LayerPoints::Template(points) => points.as_slice(),
            LayerPoints::Reference(_) => &[],
        };
        let points = calculate_points(template, &self.canvas);
        log::debug!(
            "Resolved layer '{}' of asset '{}' ({} points{})",
            definition.name,
            self.id,
            points.len(),
            if is_mirror { ", twin" } else { "" }
        );
        Arc::new(AssetLayer {
            asset: self.id.clone(),
            source_index,
            is_mirror,
            uv_flipped: is_mirror && definition.mirror == LayerMirror::Full,
            definition: Arc::new(definition),
            side,
            points: points.into(),
        })
    }
}

fn template_of<'a>(
    definitions: &'a [LayerDefinition],
    layer: &'a LayerDefinition,
) -> &'a [PointDefinition] {
    match &layer.points {
        LayerPoints::Template(points) => points,
        LayerPoints::Reference(reference) => match definitions.get(*reference).map(|l| &l.points) {
            Some(LayerPoints::Template(points)) => points,
            _ => &[],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::LayerPriority;
    use crate::bone::BoneDeclaration;
    use crate::transform::TransformDefinition;

    fn skeleton() -> Arc<Skeleton> {
        let arm = BoneDeclaration {
            pos: [600.0, 400.0],
            parent: None,
            mirror: Some("arm_r".into()),
        };
        Arc::new(Skeleton::from_declarations([("arm_l", &arm)], &CharacterCanvas::default()).unwrap())
    }

    fn point(x: f32, bone: Option<&str>) -> PointDefinition {
        PointDefinition {
            pos: [x, 500.0],
            mirror: false,
            point_type: None,
            transforms: bone
                .map(|b| {
                    vec![TransformDefinition::Rotate {
                        bone: b.into(),
                        factor: 1.0,
                        condition: None,
                    }]
                })
                .unwrap_or_default(),
        }
    }

    fn layer(name: &str, mirror: LayerMirror, points: LayerPoints) -> LayerDefinition {
        LayerDefinition {
            name: name.into(),
            x: 550.0,
            y: 300.0,
            width: 200.0,
            height: 400.0,
            image: format!("{name}.png"),
            image_overrides: Vec::new(),
            points,
            point_type: None,
            priority: LayerPriority::Arms,
            mirror,
        }
    }

    fn load(layers: Vec<LayerDefinition>) -> Result<AssetGraphics, LoadError> {
        AssetGraphics::load(
            AssetId::from("shirt"),
            AssetGraphicsDefinition { layers },
            CharacterCanvas::default(),
            skeleton(),
        )
    }

    #[test]
    fn test_twins_follow_source() {
        let asset = load(vec![
            layer("sleeve_l", LayerMirror::Full, LayerPoints::Template(vec![point(600.0, Some("arm_l"))])),
            layer("body", LayerMirror::None, LayerPoints::Template(vec![point(500.0, None)])),
            layer("cuff", LayerMirror::Select, LayerPoints::Reference(1)),
        ])
        .unwrap();

        let names: Vec<_> = asset.layers().iter().map(|l| (l.name(), l.is_mirror)).collect();
        assert_eq!(
            names,
            vec![("sleeve_l", false), ("sleeve_r", true), ("body", false), ("cuff", false), ("cuff", true)]
        );

        let twin = &asset.layers()[1];
        assert!(twin.uv_flipped);
        assert_eq!(twin.definition.x, 250.0);
        assert_eq!(twin.points[0].pos.x, 400.0);
        assert_eq!(twin.points[0].transforms[0].bone(), "arm_r");

        assert_eq!(asset.layers()[3].side, Some(LayerSide::Left));
        assert_eq!(asset.layers()[4].side, Some(LayerSide::Right));
        assert_eq!(asset.layers()[4].points.len(), 1);
    }

    #[test]
    fn test_reference_errors() {
        let err = load(vec![layer("a", LayerMirror::None, LayerPoints::Reference(3))]).unwrap_err();
        assert!(matches!(err, LoadError::PointReferenceOutOfRange { reference: 3, .. }));

        let err = load(vec![
            layer("a", LayerMirror::None, LayerPoints::Template(Vec::new())),
            layer("b", LayerMirror::None, LayerPoints::Reference(0)),
            layer("c", LayerMirror::None, LayerPoints::Reference(1)),
        ])
        .unwrap_err();
        assert!(matches!(err, LoadError::NestedPointReference { layer: 2, .. }));
    }

    #[test]
    fn test_self_reference_rejected() {
        let err = load(vec![
            layer("a", LayerMirror::None, LayerPoints::Template(Vec::new())),
            layer("b", LayerMirror::None, LayerPoints::Reference(1)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            LoadError::NestedPointReference {
                asset: "shirt".to_string(),
                layer: 1,
                reference: 1,
            }
        );
    }

    #[test]
    fn test_unknown_transform_bone_rejected() {
        let err = load(vec![layer(
            "a",
            LayerMirror::None,
            LayerPoints::Template(vec![point(10.0, Some("tail"))]),
        )])
        .unwrap_err();
        assert!(matches!(err, LoadError::UnknownBone { bone, .. } if bone == "tail"));
    }

    #[test]
    fn test_invalid_size_rejected() {
        let mut bad = layer("a", LayerMirror::None, LayerPoints::default());
        bad.width = 0.0;
        assert!(matches!(load(vec![bad]).unwrap_err(), LoadError::InvalidLayer { .. }));
    }

    #[test]
    fn test_edit_rederives_twin_and_keeps_identity() {
        let mut asset = load(vec![
            layer("sleeve_l", LayerMirror::Full, LayerPoints::Template(vec![point(600.0, None)])),
            layer("body", LayerMirror::None, LayerPoints::Template(vec![point(500.0, None)])),
        ])
        .unwrap();
        let before: Vec<_> = asset.layers().to_vec();
        let version = asset.version();

        asset.update_layer(0, |l| l.x = 560.0).unwrap();

        assert!(asset.version() > version);
        assert_eq!(asset.layers()[1].definition.x, 240.0);
        assert!(!Arc::ptr_eq(&before[0], &asset.layers()[0]));
        assert!(!Arc::ptr_eq(&before[1], &asset.layers()[1]));
        assert!(Arc::ptr_eq(&before[2], &asset.layers()[2]));
    }

    #[test]
    fn test_rejected_edit_leaves_asset_unchanged() {
        let mut asset = load(vec![layer("body", LayerMirror::None, LayerPoints::default())]).unwrap();
        let version = asset.version();

        let err = asset.update_layer(0, |l| l.points = LayerPoints::Reference(7)).unwrap_err();
        assert!(matches!(err, LoadError::PointReferenceOutOfRange { .. }));
        assert_eq!(asset.version(), version);
        assert_eq!(asset.definitions()[0].points, LayerPoints::default());

        let err = asset.update_layer(5, |_| {}).unwrap_err();
        assert!(matches!(err, LoadError::LayerIndexOutOfRange { index: 5, .. }));
    }

    #[test]
    fn test_export_reload_reproduces_twins() {
        let asset = load(vec![
            layer("sleeve_l", LayerMirror::Full, LayerPoints::Template(vec![point(600.0, Some("arm_l"))])),
            layer("cuff", LayerMirror::Select, LayerPoints::Reference(0)),
        ])
        .unwrap();

        let exported = asset.export();
        assert_eq!(exported.layers.len(), 2);
        let json = serde_json::to_string(&exported).unwrap();
        let reloaded = AssetGraphics::load(
            AssetId::from("shirt"),
            serde_json::from_str(&json).unwrap(),
            CharacterCanvas::default(),
            skeleton(),
        )
        .unwrap();

        assert_eq!(reloaded.layers().len(), asset.layers().len());
        for (a, b) in asset.layers().iter().zip(reloaded.layers()) {
            assert_eq!(**a, **b);
        }
    }
}
