//! Bone-driven point transforms.
//!
//! Two primitives exist and they scale differently with the bone value:
//!
//! - `Rotate` turns the point around the bone anchor by `rotation * factor`
//!   degrees, so the factor scales the angle itself.
//! - `Shift` translates the point by `(rotation / 180) * offset`, so a bone at
//!   180 applies the full offset and a bone at 0 applies none.
//!
//! Existing asset data depends on this asymmetry.

use serde::{Deserialize, Serialize};

use crate::bone::BoneLookup;
use crate::condition::{Condition, evaluate_condition};
use crate::math::{Vec2, rotate_around, vec2_from_array};
use crate::mirror::{has_side_suffix, mirror_bone_name};

/// A single conditional transform of a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformDefinition {
    /// Rotate around the bone anchor.
    Rotate {
        /// Driving bone.
        bone: String,
        /// Multiplier applied to the bone rotation.
        factor: f32,
        /// Optional gate.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    /// Translate by a rotation-scaled offset.
    Shift {
        /// Driving bone.
        bone: String,
        /// Offset `[dx, dy]` applied in full at bone value 180.
        offset: [f32; 2],
        /// Optional gate.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
}

impl TransformDefinition {
    /// Driving bone name.
    pub fn bone(&self) -> &str {
        match self {
            Self::Rotate { bone, .. } | Self::Shift { bone, .. } => bone,
        }
    }

    /// Gate condition, if any.
    pub fn condition(&self) -> Option<&Condition> {
        match self {
            Self::Rotate { condition, .. } | Self::Shift { condition, .. } => condition.as_ref(),
        }
    }

    /// Every bone this transform reads: the driver and the condition bones.
    pub fn bones(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.bone()).chain(self.condition().into_iter().flat_map(Condition::bones))
    }

    /// The bilateral counterpart.
    ///
    /// Bone references are mirrored and the rotate factor is negated. A shift
    /// always negates `dx`; it negates `dy` only when the driving bone itself
    /// carries an `_l`/`_r` suffix.
    pub fn mirrored(&self) -> Self {
        match self {
            Self::Rotate {
                bone,
                factor,
                condition,
            } => Self::Rotate {
                bone: mirror_bone_name(bone),
                factor: -factor,
                condition: condition.as_ref().map(Condition::mirrored),
            },
            Self::Shift {
                bone,
                offset: [dx, dy],
                condition,
            } => Self::Shift {
                bone: mirror_bone_name(bone),
                offset: [-dx, if has_side_suffix(bone) { -dy } else { *dy }],
                condition: condition.as_ref().map(Condition::mirrored),
            },
        }
    }

    /// Apply to `pos`. Returns `pos` unchanged when gated off or the bone is unknown.
    pub fn apply<L: BoneLookup + ?Sized>(&self, pos: Vec2, lookup: &L) -> Vec2 {
        if !evaluate_condition(self.condition(), lookup) {
            return pos;
        }
        let Some(bone) = lookup.bone_state(self.bone()) else {
            return pos;
        };
        match self {
            Self::Rotate { factor, .. } => rotate_around(pos, bone.anchor, bone.rotation * factor),
            Self::Shift { offset, .. } => pos + vec2_from_array(*offset) * (bone.rotation / 180.0),
        }
    }
}

/// Fold `transforms` over `pos` in declared order.
pub fn apply_transforms<L: BoneLookup + ?Sized>(
    pos: Vec2,
    transforms: &[TransformDefinition],
    lookup: &L,
) -> Vec2 {
    transforms
        .iter()
        .fold(pos, |current, transform| transform.apply(current, lookup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bone::BoneState;
    use crate::condition::ConditionOperator;
    use std::collections::HashMap;

    const EPS: f32 = 1e-3;

    struct Bones(HashMap<&'static str, BoneState>);

    impl BoneLookup for Bones {
        fn bone_state(&self, name: &str) -> Option<BoneState> {
            self.0.get(name).copied()
        }
    }

    fn bones(entries: &[(&'static str, [f32; 2], f32)]) -> Bones {
        Bones(
            entries
                .iter()
                .map(|&(name, anchor, rotation)| {
                    (
                        name,
                        BoneState {
                            anchor: vec2_from_array(anchor),
                            rotation,
                        },
                    )
                })
                .collect(),
        )
    }

    fn rotate(bone: &str, factor: f32) -> TransformDefinition {
        TransformDefinition::Rotate {
            bone: bone.to_string(),
            factor,
            condition: None,
        }
    }

    fn shift(bone: &str, dx: f32, dy: f32) -> TransformDefinition {
        TransformDefinition::Shift {
            bone: bone.to_string(),
            offset: [dx, dy],
            condition: None,
        }
    }

    #[test]
    fn test_rotate_preserves_distance_and_angle() {
        let anchor = Vec2::new(300.0, 400.0);
        let lookup = bones(&[("elbow_r", [300.0, 400.0], 37.0)]);
        let start = Vec2::new(360.0, 480.0);

        let end = rotate("elbow_r", 1.0).apply(start, &lookup);

        let before = start - anchor;
        let after = end - anchor;
        assert!((before.norm() - after.norm()).abs() < EPS);
        let angle = after.y.atan2(after.x) - before.y.atan2(before.x);
        assert!((angle.to_degrees() - 37.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_factor_scales_angle() {
        let lookup = bones(&[("arm_l", [0.0, 0.0], 90.0)]);
        let end = rotate("arm_l", 0.5).apply(Vec2::new(10.0, 0.0), &lookup);
        let expected = Vec2::new(10.0 * 45f32.to_radians().cos(), 10.0 * 45f32.to_radians().sin());
        assert!((end - expected).norm() < EPS);
    }

    #[test]
    fn test_shift_is_linear_in_half_turns() {
        let pos = Vec2::new(5.0, 5.0);
        let t = shift("breasts", 20.0, -10.0);

        let at = |rotation: f32| t.apply(pos, &bones(&[("breasts", [0.0, 0.0], rotation)]));
        assert_eq!(at(0.0), pos);
        assert!((at(180.0) - Vec2::new(25.0, -5.0)).norm() < EPS);
        assert!((at(90.0) - Vec2::new(15.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_condition_gates_transform() {
        let t = TransformDefinition::Rotate {
            bone: "arm_l".into(),
            factor: 1.0,
            condition: Some(Condition::single("elbow_l", ConditionOperator::Gt, 0.0)),
        };
        let pos = Vec2::new(10.0, 0.0);
        let off = bones(&[("arm_l", [0.0, 0.0], 90.0), ("elbow_l", [0.0, 0.0], 0.0)]);
        assert_eq!(t.apply(pos, &off), pos);

        let on = bones(&[("arm_l", [0.0, 0.0], 90.0), ("elbow_l", [0.0, 0.0], 1.0)]);
        assert!((t.apply(pos, &on) - Vec2::new(0.0, 10.0)).norm() < EPS);
    }

    #[test]
    fn test_unknown_bone_leaves_point() {
        let pos = Vec2::new(1.0, 2.0);
        assert_eq!(rotate("tail", 1.0).apply(pos, &bones(&[])), pos);
    }

    #[test]
    fn test_transforms_apply_in_order() {
        let lookup = bones(&[("a", [0.0, 0.0], 90.0), ("s", [0.0, 0.0], 180.0)]);
        let pos = Vec2::new(10.0, 0.0);

        let rotate_then_shift = apply_transforms(pos, &[rotate("a", 1.0), shift("s", 10.0, 0.0)], &lookup);
        let shift_then_rotate = apply_transforms(pos, &[shift("s", 10.0, 0.0), rotate("a", 1.0)], &lookup);

        assert!((rotate_then_shift - Vec2::new(10.0, 10.0)).norm() < EPS);
        assert!((shift_then_rotate - Vec2::new(0.0, 20.0)).norm() < EPS);
    }

    #[test]
    fn test_mirror_shift_axes() {
        assert_eq!(shift("elbow_l", 3.0, 4.0).mirrored(), shift("elbow_r", -3.0, -4.0));
        assert_eq!(shift("breasts", 3.0, 4.0).mirrored(), shift("breasts", -3.0, 4.0));
    }

    #[test]
    fn test_mirror_is_involution() {
        let transforms = [
            rotate("arm_l", 0.7),
            rotate("breasts", -1.0),
            shift("elbow_r", 1.0, 2.0),
            shift("belly", 1.0, 2.0),
            TransformDefinition::Rotate {
                bone: "elbow_l".into(),
                factor: 1.0,
                condition: Some(Condition::single("arm_l", ConditionOperator::Lt, 5.0)),
            },
        ];
        for t in &transforms {
            assert_eq!(&t.mirrored().mirrored(), t);
        }
        assert_eq!(rotate("arm_l", 0.7).mirrored(), rotate("arm_r", -0.7));
    }

    #[test]
    fn test_bones_include_condition() {
        let t = TransformDefinition::Shift {
            bone: "breasts".into(),
            offset: [0.0, 1.0],
            condition: Some(Condition::single("arm_l", ConditionOperator::Lt, 5.0)),
        };
        assert_eq!(t.bones().collect::<Vec<_>>(), vec!["breasts", "arm_l"]);
    }

    #[test]
    fn test_serde_format() {
        let json = r#"{"type":"shift","bone":"breasts","offset":[0.0,12.0]}"#;
        let t: TransformDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(t, shift("breasts", 0.0, 12.0));
        assert_eq!(serde_json::to_string(&t).unwrap(), json);
    }
}
