//! Layer definitions and resolved runtime layers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::AssetId;
use crate::condition::Condition;
use crate::math::Vec2;
use crate::point::{CalculatedPoint, PointDefinition, PointSelection};

/// Compositing band of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerPriority {
    Background,
    BelowBody,
    BelowArms,
    #[default]
    Body,
    Arms,
    AboveBody,
    AboveArms,
    Overlay,
}

/// How a canonical layer generates a twin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerMirror {
    /// No twin.
    #[default]
    None,
    /// Twin reflected across the canvas midline.
    Full,
    /// Twin shares geometry; each side keeps only its own suffixed points.
    Select,
}

/// Side restriction of a `Select` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerSide {
    Left,
    Right,
}

/// An alternative image shown while its condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerImageOverride {
    pub image: String,
    pub condition: Condition,
}

impl LayerImageOverride {
    /// The override with its condition mirrored.
    pub fn mirrored(&self) -> Self {
        Self {
            image: self.image.clone(),
            condition: self.condition.mirrored(),
        }
    }
}

/// Point source of a layer: its own template, or the template of another
/// canonical layer of the same asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerPoints {
    Template(Vec<PointDefinition>),
    Reference(usize),
}

impl Default for LayerPoints {
    fn default() -> Self {
        Self::Template(Vec::new())
    }
}

/// Authoring form of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDefinition {
    /// Display name.
    pub name: String,
    /// Left edge of the image rectangle in canvas space.
    pub x: f32,
    /// Top edge of the image rectangle in canvas space.
    pub y: f32,
    /// Width of the image rectangle.
    pub width: f32,
    /// Height of the image rectangle.
    pub height: f32,
    /// Base image path.
    pub image: String,
    /// Overrides checked top to bottom; the first match wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_overrides: Vec<LayerImageOverride>,
    /// Mesh points.
    #[serde(default)]
    pub points: LayerPoints,
    /// Point-type mask; `None` keeps every point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_type: Option<Vec<String>>,
    #[serde(default)]
    pub priority: LayerPriority,
    #[serde(default)]
    pub mirror: LayerMirror,
}

impl LayerDefinition {
    /// Image for the current pose: the first override whose condition holds,
    /// otherwise the base image.
    pub fn resolve_image<L: crate::bone::BoneLookup + ?Sized>(&self, lookup: &L) -> &str {
        self.image_overrides
            .iter()
            .find(|o| o.condition.evaluate(lookup))
            .map_or(self.image.as_str(), |o| o.image.as_str())
    }
}

/// A resolved layer of an asset: a canonical layer or its generated twin.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetLayer {
    /// Owning asset.
    pub asset: AssetId,
    /// Index of the canonical layer this was resolved from.
    pub source_index: usize,
    /// Whether this is the generated twin.
    pub is_mirror: bool,
    /// Definition with point references materialized and mirroring applied.
    pub definition: Arc<LayerDefinition>,
    /// Side restriction for `Select` pairs.
    pub side: Option<LayerSide>,
    /// Resolved points, mirrored pairs expanded.
    pub points: Arc<[CalculatedPoint]>,
    /// Whether the image is sampled horizontally reflected.
    pub uv_flipped: bool,
}

impl AssetLayer {
    /// Layer name.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Compositing band.
    pub fn priority(&self) -> LayerPriority {
        self.definition.priority
    }

    /// Point mask of this layer.
    pub fn selection(&self) -> PointSelection<'_> {
        PointSelection::new(self.definition.point_type.as_deref(), self.side)
    }

    /// Texture coordinate of a rest position inside the image rectangle.
    pub fn uv(&self, pos: Vec2) -> [f32; 2] {
        let d = &self.definition;
        let u = (pos.x - d.x) / d.width;
        let v = (pos.y - d.y) / d.height;
        if self.uv_flipped { [1.0 - u, v] } else { [u, v] }
    }
}
