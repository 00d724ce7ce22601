//! Delaunay triangulation of layer point sets.

use marionette_core::point::{CalculatedPoint, PointSelection};

/// Triangulate the full point set of a layer.
///
/// Returns triangles as index triples into `points`. Fewer than three points,
/// or only collinear ones, produce no triangles.
pub fn triangulate(points: &[CalculatedPoint]) -> Vec<[u32; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }
    let coords: Vec<delaunator::Point> = points
        .iter()
        .map(|p| delaunator::Point {
            x: f64::from(p.pos.x),
            y: f64::from(p.pos.y),
        })
        .collect();
    delaunator::triangulate(&coords)
        .triangles
        .chunks_exact(3)
        .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
        .collect()
}

/// Index buffer of a layer: the full triangulation, keeping only triangles
/// whose three corners pass `selection`.
///
/// Triangulating before masking keeps the topology of a point set the same
/// whatever the mask is.
pub fn masked_indices(points: &[CalculatedPoint], selection: &PointSelection<'_>) -> Vec<u32> {
    triangulate(points)
        .into_iter()
        .filter(|tri| tri.iter().all(|&i| selection.matches(&points[i as usize])))
        .flatten()
        .collect()
}
