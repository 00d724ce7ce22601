//! Bilateral mirroring of bone names, conditions, transforms, points and layers.
//!
//! Every function here is pure. Applied twice, each one returns its input,
//! except [`mirror_layer`] in `Select` mode whose twin only differs by side.

use crate::asset::{LayerDefinition, LayerMirror, LayerPoints, LayerSide};
use crate::canvas::CharacterCanvas;
use crate::condition::Condition;
use crate::math::reflect_x;
use crate::point::PointDefinition;
use crate::transform::TransformDefinition;

const LEFT_SUFFIX: &str = "_l";
const RIGHT_SUFFIX: &str = "_r";

/// Whether `name` ends with `_l` or `_r`.
pub fn has_side_suffix(name: &str) -> bool {
    name.ends_with(LEFT_SUFFIX) || name.ends_with(RIGHT_SUFFIX)
}

/// Swap a trailing `_l` with `_r` and vice versa; any other name is returned as is.
pub fn mirror_bone_name(name: &str) -> String {
    if let Some(stem) = name.strip_suffix(LEFT_SUFFIX) {
        format!("{stem}{RIGHT_SUFFIX}")
    } else if let Some(stem) = name.strip_suffix(RIGHT_SUFFIX) {
        format!("{stem}{LEFT_SUFFIX}")
    } else {
        name.to_owned()
    }
}

/// Mirror every bone reference of a condition.
pub fn mirror_condition(condition: &Condition) -> Condition {
    condition.mirrored()
}

/// Mirror a transform. See [`TransformDefinition::mirrored`].
pub fn mirror_transform(transform: &TransformDefinition) -> TransformDefinition {
    transform.mirrored()
}

/// Reflect a point across the canvas midline.
///
/// The `mirror` flag is carried over unchanged.
pub fn mirror_point(point: &PointDefinition, canvas: &CharacterCanvas) -> PointDefinition {
    PointDefinition {
        pos: [reflect_x(point.pos[0], canvas.width), point.pos[1]],
        mirror: point.mirror,
        point_type: point.point_type.as_deref().map(mirror_bone_name),
        transforms: point.transforms.iter().map(mirror_transform).collect(),
    }
}

/// Produce the twin of a canonical layer.
///
/// Returns `None` for layers whose mirror mode is `None`. The result is the
/// twin's definition together with the sides of `(original, twin)`.
pub fn mirror_layer(
    layer: &LayerDefinition,
    canvas: &CharacterCanvas,
) -> Option<(LayerDefinition, Option<LayerSide>, Option<LayerSide>)> {
    let image_overrides = layer
        .image_overrides
        .iter()
        .map(|o| o.mirrored())
        .collect();

    match layer.mirror {
        LayerMirror::None => None,
        LayerMirror::Full => {
            let points = match &layer.points {
                LayerPoints::Template(points) => LayerPoints::Template(
                    points.iter().map(|p| mirror_point(p, canvas)).collect(),
                ),
                LayerPoints::Reference(index) => LayerPoints::Reference(*index),
            };
            let twin = LayerDefinition {
                name: mirror_bone_name(&layer.name),
                x: canvas.width - layer.x - layer.width,
                image_overrides,
                points,
                point_type: layer
                    .point_type
                    .as_ref()
                    .map(|types| types.iter().map(|t| mirror_bone_name(t)).collect()),
                ..layer.clone()
            };
            Some((twin, None, None))
        }
        LayerMirror::Select => {
            let twin = LayerDefinition {
                image_overrides,
                ..layer.clone()
            };
            Some((twin, Some(LayerSide::Left), Some(LayerSide::Right)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{LayerImageOverride, LayerPriority};
    use crate::condition::ConditionOperator;

    fn canvas() -> CharacterCanvas {
        CharacterCanvas::new(1000.0, 1500.0)
    }

    fn layer(mirror: LayerMirror) -> LayerDefinition {
        LayerDefinition {
            name: "glove_l".into(),
            x: 600.0,
            y: 300.0,
            width: 200.0,
            height: 100.0,
            image: "gloves/glove.png".into(),
            image_overrides: vec![LayerImageOverride {
                image: "gloves/fist.png".into(),
                condition: Condition::single("elbow_l", ConditionOperator::Gt, 30.0),
            }],
            points: LayerPoints::Template(vec![PointDefinition {
                pos: [650.0, 320.0],
                mirror: false,
                point_type: Some("hand_l".into()),
                transforms: vec![TransformDefinition::Rotate {
                    bone: "elbow_l".into(),
                    factor: 1.0,
                    condition: None,
                }],
            }]),
            point_type: Some(vec!["hand_l".into()]),
            priority: LayerPriority::Arms,
            mirror,
        }
    }

    #[test]
    fn test_bone_name_involution() {
        for name in ["arm_l", "arm_r", "breasts", "", "_l", "x_lr", "elbow_r_l"] {
            assert_eq!(mirror_bone_name(&mirror_bone_name(name)), name);
        }
        assert_eq!(mirror_bone_name("elbow_r_l"), "elbow_r_r");
        assert_eq!(mirror_bone_name("head"), "head");
    }

    #[test]
    fn test_point_mirror_reflects_and_renames() {
        let point = PointDefinition {
            pos: [100.0, 50.0],
            mirror: true,
            point_type: Some("hip_r".into()),
            transforms: Vec::new(),
        };
        let mirrored = mirror_point(&point, &canvas());
        assert_eq!(mirrored.pos, [900.0, 50.0]);
        assert_eq!(mirrored.point_type.as_deref(), Some("hip_l"));
        assert_eq!(mirror_point(&mirrored, &canvas()), point);
    }

    #[test]
    fn test_full_layer_twin() {
        let source = layer(LayerMirror::Full);
        let (twin, source_side, twin_side) = mirror_layer(&source, &canvas()).unwrap();

        assert_eq!(twin.name, "glove_r");
        assert_eq!(twin.x, 200.0);
        assert_eq!(twin.point_type, Some(vec!["hand_r".to_string()]));
        assert_eq!(twin.image_overrides[0].condition.clauses()[0][0].bone, "elbow_r");
        let LayerPoints::Template(points) = &twin.points else {
            panic!("expected template points");
        };
        assert_eq!(points[0].pos, [350.0, 320.0]);
        assert_eq!(points[0].transforms[0].bone(), "elbow_r");
        assert_eq!((source_side, twin_side), (None, None));

        let (back, _, _) = mirror_layer(&twin, &canvas()).unwrap();
        assert_eq!(back, source);
    }

    #[test]
    fn test_select_layer_twin() {
        let source = layer(LayerMirror::Select);
        let (twin, source_side, twin_side) = mirror_layer(&source, &canvas()).unwrap();

        assert_eq!(twin.x, source.x);
        assert_eq!(twin.points, source.points);
        assert_eq!(twin.name, source.name);
        assert_eq!(twin.image_overrides[0].condition.clauses()[0][0].bone, "elbow_r");
        assert_eq!(source_side, Some(LayerSide::Left));
        assert_eq!(twin_side, Some(LayerSide::Right));
    }

    #[test]
    fn test_unmirrored_layer_has_no_twin() {
        assert!(mirror_layer(&layer(LayerMirror::None), &canvas()).is_none());
    }
}
