//! Vertex position strategies.

use marionette_core::bone::BoneLookup;
use marionette_core::math::vec2_to_array;
use marionette_core::point::CalculatedPoint;
use marionette_core::transform::apply_transforms;

/// Computes the drawn position of a layer point.
pub trait VertexBuilder: Send + Sync {
    fn vertex(&self, point: &CalculatedPoint, lookup: &dyn BoneLookup) -> [f32; 2];
}

/// Points posed through their transform chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosedVertices;

impl VertexBuilder for PosedVertices {
    fn vertex(&self, point: &CalculatedPoint, lookup: &dyn BoneLookup) -> [f32; 2] {
        vec2_to_array(apply_transforms(point.pos, &point.transforms, lookup))
    }
}

/// Points at their rest positions, for setup views.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestVertices;

impl VertexBuilder for RestVertices {
    fn vertex(&self, point: &CalculatedPoint, _lookup: &dyn BoneLookup) -> [f32; 2] {
        vec2_to_array(point.pos)
    }
}
