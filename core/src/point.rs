//! Layer mesh points: authoring form, runtime form and type selection.

use serde::{Deserialize, Serialize};

use crate::asset::LayerSide;
use crate::canvas::CharacterCanvas;
use crate::math::{Vec2, vec2_from_array};
use crate::mirror::{has_side_suffix, mirror_point};
use crate::transform::TransformDefinition;

/// A point as authored in a layer template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDefinition {
    /// Rest position `[x, y]` in canvas space.
    pub pos: [f32; 2],
    /// Whether a reflected copy is generated right after this point.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mirror: bool,
    /// Region tag used by layer point-type filters.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub point_type: Option<String>,
    /// Transforms applied in order when posing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<TransformDefinition>,
}

/// A resolved point of a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedPoint {
    /// Rest position.
    pub pos: Vec2,
    /// Region tag, side-suffixed for generated pairs.
    pub point_type: Option<String>,
    /// Transforms applied when posing.
    pub transforms: Vec<TransformDefinition>,
    /// Whether this point is a generated reflection.
    pub is_mirror: bool,
    /// Position of the point in the owning layer's point array.
    pub index: usize,
}

/// Expand a point template into runtime points.
///
/// Mirrored points are pushed immediately after their source. A mirrored
/// point with an unsuffixed type is split into a `_l`/`_r` pair by the side
/// of the canvas midline it sits on.
pub fn calculate_points(
    template: &[PointDefinition],
    canvas: &CharacterCanvas,
) -> Vec<CalculatedPoint> {
    let mut points = Vec::with_capacity(template.len() * 2);
    for definition in template {
        if !definition.mirror {
            push_point(&mut points, definition, false);
            continue;
        }

        let source = match &definition.point_type {
            Some(t) if !has_side_suffix(t) => {
                let side = if definition.pos[0] < canvas.midline() { "_r" } else { "_l" };
                PointDefinition {
                    point_type: Some(format!("{t}{side}")),
                    ..definition.clone()
                }
            }
            _ => definition.clone(),
        };
        let reflected = mirror_point(&source, canvas);
        push_point(&mut points, &source, false);
        push_point(&mut points, &reflected, true);
    }
    points
}

fn push_point(points: &mut Vec<CalculatedPoint>, definition: &PointDefinition, is_mirror: bool) {
    points.push(CalculatedPoint {
        pos: vec2_from_array(definition.pos),
        point_type: definition.point_type.clone(),
        transforms: definition.transforms.clone(),
        is_mirror,
        index: points.len(),
    });
}

/// Point-type mask of a layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointSelection<'a> {
    /// Accepted type stems; `None` accepts everything.
    pub filter: Option<&'a [String]>,
    /// Side restriction of `Select` layers.
    pub side: Option<LayerSide>,
}

impl<'a> PointSelection<'a> {
    /// A selection from a layer's filter and side.
    pub fn new(filter: Option<&'a [String]>, side: Option<LayerSide>) -> Self {
        Self { filter, side }
    }

    /// Whether `point` passes the mask.
    pub fn matches(&self, point: &CalculatedPoint) -> bool {
        let Some(filter) = self.filter else {
            return true;
        };
        let Some(point_type) = point.point_type.as_deref() else {
            return false;
        };
        filter.iter().any(|entry| self.matches_entry(point_type, entry))
    }

    fn matches_entry(&self, point_type: &str, entry: &str) -> bool {
        if point_type == entry {
            return true;
        }
        match point_type.strip_prefix(entry) {
            Some("_l") => self.side != Some(LayerSide::Right),
            Some("_r") => self.side != Some(LayerSide::Left),
            _ => false,
        }
    }
}
