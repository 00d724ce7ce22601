//! # Marionette Demos
//!
//! Command-line tools exercising the Marionette pipeline.
//!
//! ## Available Demos
//!
//! - `pose_dump` - Load a catalogue from disk, equip items, pose the skeleton
//!   and print the resulting composite

use std::collections::hash_map::DefaultHasher;
use std::fmt::Write;
use std::hash::{Hash, Hasher};

use marionette_graphics::LayerNode;

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a `name=value` bone rotation argument.
pub fn parse_bone(arg: &str) -> Result<(String, f32), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing bone name in '{arg}'"));
    }
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|err| format!("invalid rotation in '{arg}': {err}"))?;
    Ok((name.to_owned(), value))
}

/// Hex content hash used to key catalogue reloads.
///
/// `DefaultHasher` output may change between Rust releases, so the hash is
/// only meaningful within one process and must not be persisted.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Axis-aligned bounds `[min_x, min_y, max_x, max_y]` of a vertex buffer.
pub fn bounds(vertices: &[[f32; 2]]) -> Option<[f32; 4]> {
    let (first, rest) = vertices.split_first()?;
    Some(rest.iter().fold(
        [first[0], first[1], first[0], first[1]],
        |[x0, y0, x1, y1], [x, y]| [x0.min(*x), y0.min(*y), x1.max(*x), y1.max(*y)],
    ))
}

/// One line of `pose_dump` output.
pub fn describe_layer(node: &LayerNode<'_>) -> String {
    let mut line = format!(
        "{:>3} {:<16} {:<16} {:<11} tris={:<4}",
        node.z_index,
        node.asset.as_str(),
        node.name,
        format!("{:?}", node.priority),
        node.mesh.triangle_count(),
    );
    if node.texture.is_empty() {
        line.push_str(" texture=<none>");
    } else {
        let _ = write!(
            line,
            " texture={} ({}x{})",
            node.texture.path, node.texture.width, node.texture.height
        );
    }
    let _ = write!(line, " color=#{:06X} alpha={:.2}", node.color, node.alpha);
    if let Some([x0, y0, x1, y1]) = bounds(node.mesh.vertices()) {
        let _ = write!(line, " bounds=[{x0:.1}, {y0:.1}, {x1:.1}, {y1:.1}]");
    }
    line
}
