//! Non-fatal authoring checks over a loaded asset.

use std::fmt;

use super::graphics::AssetGraphics;
use crate::bone::Skeleton;
use crate::condition::Condition;
use crate::point::PointSelection;

/// An authoring problem that does not prevent loading.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub asset: String,
    /// Name of the resolved layer (twins carry their own name).
    pub layer: String,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "asset '{}' layer '{}' field '{}': {}",
            self.asset, self.layer, self.field, self.message
        )
    }
}

/// Check every resolved layer of `asset` against `skeleton`.
///
/// Reports conditions that name unknown bones (they evaluate to false at
/// runtime), point-type filter entries that select nothing, and layers left
/// with fewer than three selected points.
pub fn validate_asset(asset: &AssetGraphics, skeleton: &Skeleton) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for layer in asset.layers() {
        let mut push = |field: &'static str, message: String| {
            issues.push(ValidationIssue {
                asset: asset.id().to_string(),
                layer: layer.name().to_owned(),
                field,
                message,
            });
        };

        let unknown = |condition: &Condition| -> Vec<String> {
            condition
                .bones()
                .filter(|b| !skeleton.contains(b))
                .map(str::to_owned)
                .collect()
        };

        for image_override in &layer.definition.image_overrides {
            for bone in unknown(&image_override.condition) {
                push(
                    "image_overrides",
                    format!("condition for '{}' names unknown bone '{bone}'", image_override.image),
                );
            }
        }

        for point in layer.points.iter() {
            for condition in point.transforms.iter().filter_map(|t| t.condition()) {
                for bone in unknown(condition) {
                    push(
                        "points",
                        format!("transform condition of point {} names unknown bone '{bone}'", point.index),
                    );
                }
            }
        }

        if let Some(filter) = &layer.definition.point_type {
            for entry in filter {
                let single = std::slice::from_ref(entry);
                let selection = PointSelection::new(Some(single), layer.side);
                if !layer.points.iter().any(|p| selection.matches(p)) {
                    push("point_type", format!("entry '{entry}' selects no points"));
                }
            }
        }

        let selection = layer.selection();
        let selected = layer.points.iter().filter(|p| selection.matches(p)).count();
        if selected < 3 {
            push("points", format!("only {selected} selected points, nothing can be drawn"));
        }
    }

    issues
}
