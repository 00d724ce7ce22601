//! Bone definitions and skeleton validation.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::canvas::CharacterCanvas;
use crate::error::LoadError;
use crate::math::{Vec2, reflect_x, vec2_from_array};
use crate::mirror::{has_side_suffix, mirror_bone_name};

/// Tolerance when checking that mirrored anchors are reflections.
const ANCHOR_EPSILON: f32 = 1e-3;

/// Authoring form of a bone, as stored in the catalogue bundle.
///
/// A declaration with `mirror` set also generates its counterpart: the
/// generated bone sits at the reflected anchor and hangs off the mirrored
/// parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneDeclaration {
    /// Anchor position `[x, y]` in canvas space.
    pub pos: [f32; 2],
    /// Name of the parent bone, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Name of the generated mirror bone, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<String>,
}

/// A resolved bone.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneDefinition {
    /// Unique bone name.
    pub name: String,
    /// Anchor position `[x, y]` in canvas space.
    pub anchor: [f32; 2],
    /// Parent bone name.
    pub parent: Option<String>,
    /// Mirror counterpart name. Always reciprocal.
    pub mirror: Option<String>,
    generated: bool,
}

impl BoneDefinition {
    /// Anchor as a vector.
    pub fn anchor_vec(&self) -> Vec2 {
        vec2_from_array(self.anchor)
    }

    /// Whether this bone was generated as the mirror of a declared bone.
    pub fn is_generated(&self) -> bool {
        self.generated
    }
}

/// The full, validated set of bones of a character.
///
/// Bones are kept in declaration order with generated mirrors placed right
/// after their source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    bones: Vec<BoneDefinition>,
    index: HashMap<String, usize>,
}

impl Skeleton {
    /// Build a skeleton from named declarations.
    ///
    /// Fails on duplicate names, broken mirror naming, mirror pairs whose
    /// anchors are not reflected, unknown parents and circular parent chains.
    pub fn from_declarations<'a, I>(
        declarations: I,
        canvas: &CharacterCanvas,
    ) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (&'a str, &'a BoneDeclaration)>,
    {
        let mut skeleton = Self::default();

        for (name, decl) in declarations {
            skeleton.push(BoneDefinition {
                name: name.to_owned(),
                anchor: decl.pos,
                parent: decl.parent.clone(),
                mirror: decl.mirror.clone(),
                generated: false,
            })?;

            if let Some(mirror) = &decl.mirror {
                if !has_side_suffix(name) || mirror_bone_name(name) != *mirror {
                    return Err(LoadError::MirrorNaming {
                        bone: name.to_owned(),
                        mirror: Some(mirror.clone()),
                    });
                }
                skeleton.push(BoneDefinition {
                    name: mirror.clone(),
                    anchor: [reflect_x(decl.pos[0], canvas.width), decl.pos[1]],
                    parent: decl.parent.as_deref().map(mirror_bone_name),
                    mirror: Some(name.to_owned()),
                    generated: true,
                })?;
            }
        }

        skeleton.link_mirrors(canvas)?;
        skeleton.validate_parents()?;
        Ok(skeleton)
    }

    fn push(&mut self, bone: BoneDefinition) -> Result<(), LoadError> {
        if self.index.contains_key(&bone.name) {
            return Err(LoadError::DuplicateBone(bone.name));
        }
        self.index.insert(bone.name.clone(), self.bones.len());
        self.bones.push(bone);
        Ok(())
    }

    /// Pair up separately declared `_l`/`_r` bones and reject unpaired ones.
    ///
    /// A pair's anchors must be reflections across the canvas midline.
    fn link_mirrors(&mut self, canvas: &CharacterCanvas) -> Result<(), LoadError> {
        for i in 0..self.bones.len() {
            let name = &self.bones[i].name;
            if !has_side_suffix(name) {
                continue;
            }
            let counterpart = mirror_bone_name(name);
            let Some(&j) = self.index.get(&counterpart) else {
                return Err(LoadError::MirrorNaming {
                    bone: name.clone(),
                    mirror: None,
                });
            };
            match &self.bones[j].mirror {
                Some(m) if *m != self.bones[i].name => {
                    return Err(LoadError::MirrorNaming {
                        bone: self.bones[j].name.clone(),
                        mirror: Some(m.clone()),
                    });
                }
                _ => {}
            }
            let [ax, ay] = self.bones[i].anchor;
            let [bx, by] = self.bones[j].anchor;
            if (reflect_x(ax, canvas.width) - bx).abs() > ANCHOR_EPSILON
                || (ay - by).abs() > ANCHOR_EPSILON
            {
                return Err(LoadError::MirrorAnchor {
                    bone: self.bones[i].name.clone(),
                    mirror: counterpart,
                });
            }
            self.bones[i].mirror = Some(counterpart);
        }
        Ok(())
    }

    fn validate_parents(&self) -> Result<(), LoadError> {
        for bone in &self.bones {
            if let Some(parent) = &bone.parent
                && !self.index.contains_key(parent)
            {
                return Err(LoadError::UnknownBone {
                    bone: parent.clone(),
                    context: format!("parent of bone '{}'", bone.name),
                });
            }
        }

        for bone in &self.bones {
            let mut current = bone;
            let mut steps = 0;
            while let Some(parent) = self.parent(current) {
                steps += 1;
                if steps > self.bones.len() {
                    return Err(LoadError::CircularBoneParent(bone.name.clone()));
                }
                current = parent;
            }
        }
        Ok(())
    }

    /// Look up a bone by name.
    pub fn get(&self, name: &str) -> Option<&BoneDefinition> {
        self.index.get(name).map(|&i| &self.bones[i])
    }

    /// Position of a bone in [`Skeleton::bones`].
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether the skeleton defines a bone with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All bones, in declaration order.
    pub fn bones(&self) -> &[BoneDefinition] {
        &self.bones
    }

    /// Number of bones.
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Whether the skeleton has no bones.
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Parent of a bone.
    pub fn parent(&self, bone: &BoneDefinition) -> Option<&BoneDefinition> {
        bone.parent.as_deref().and_then(|p| self.get(p))
    }

    /// Mirror counterpart of a bone.
    pub fn mirror(&self, bone: &BoneDefinition) -> Option<&BoneDefinition> {
        bone.mirror.as_deref().and_then(|m| self.get(m))
    }

    /// Export the declared (non-generated) bones.
    pub fn to_declarations(&self) -> BTreeMap<String, BoneDeclaration> {
        self.bones
            .iter()
            .filter(|b| !b.generated)
            .map(|b| {
                let mirror = b
                    .mirror
                    .as_ref()
                    .filter(|m| self.get(m).is_some_and(|mb| mb.generated))
                    .cloned();
                (
                    b.name.clone(),
                    BoneDeclaration {
                        pos: b.anchor,
                        parent: b.parent.clone(),
                        mirror,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(x: f32, y: f32, parent: Option<&str>, mirror: Option<&str>) -> BoneDeclaration {
        BoneDeclaration {
            pos: [x, y],
            parent: parent.map(str::to_owned),
            mirror: mirror.map(str::to_owned),
        }
    }

    fn build(decls: &[(&str, BoneDeclaration)]) -> Result<Skeleton, LoadError> {
        Skeleton::from_declarations(
            decls.iter().map(|(n, d)| (*n, d)),
            &CharacterCanvas::default(),
        )
    }

    #[test]
    fn test_generated_mirror_is_reflected_and_reciprocal() {
        let skeleton = build(&[
            ("arm_l", decl(600.0, 400.0, None, Some("arm_r"))),
            ("elbow_l", decl(700.0, 500.0, Some("arm_l"), Some("elbow_r"))),
        ])
        .unwrap();

        let elbow_r = skeleton.get("elbow_r").unwrap();
        assert_eq!(elbow_r.anchor, [300.0, 500.0]);
        assert_eq!(elbow_r.parent.as_deref(), Some("arm_r"));
        assert!(elbow_r.is_generated());

        let elbow_l = skeleton.get("elbow_l").unwrap();
        assert_eq!(skeleton.mirror(elbow_l).unwrap().name, "elbow_r");
        assert_eq!(skeleton.mirror(elbow_r).unwrap().name, "elbow_l");
        assert_eq!(skeleton.len(), 4);
    }

    #[test]
    fn test_unsuffixed_bone_has_no_mirror() {
        let skeleton = build(&[("breasts", decl(500.0, 400.0, None, None))]).unwrap();
        assert!(skeleton.get("breasts").unwrap().mirror.is_none());
    }

    #[test]
    fn test_mirror_on_unsuffixed_bone_rejected() {
        let err = build(&[("hip", decl(500.0, 800.0, None, Some("hip_r")))]).unwrap_err();
        assert!(matches!(err, LoadError::MirrorNaming { .. }));
    }

    #[test]
    fn test_mirror_with_wrong_name_rejected() {
        let err = build(&[("arm_l", decl(600.0, 400.0, None, Some("leg_r")))]).unwrap_err();
        assert!(matches!(err, LoadError::MirrorNaming { .. }));
    }

    #[test]
    fn test_unpaired_suffixed_bone_rejected() {
        let err = build(&[("arm_l", decl(600.0, 400.0, None, None))]).unwrap_err();
        assert_eq!(
            err,
            LoadError::MirrorNaming {
                bone: "arm_l".to_string(),
                mirror: None
            }
        );
    }

    #[test]
    fn test_separately_declared_pair_is_linked() {
        let skeleton = build(&[
            ("leg_l", decl(550.0, 900.0, None, None)),
            ("leg_r", decl(450.0, 900.0, None, None)),
        ])
        .unwrap();
        assert_eq!(skeleton.get("leg_l").unwrap().mirror.as_deref(), Some("leg_r"));
        assert_eq!(skeleton.get("leg_r").unwrap().mirror.as_deref(), Some("leg_l"));
    }

    #[test]
    fn test_separately_declared_pair_must_be_reflected() {
        let err = build(&[
            ("leg_l", decl(700.0, 900.0, None, None)),
            ("leg_r", decl(650.0, 100.0, None, None)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            LoadError::MirrorAnchor {
                bone: "leg_l".to_string(),
                mirror: "leg_r".to_string(),
            }
        );

        // Reflected x but a different height.
        let err = build(&[
            ("leg_l", decl(700.0, 900.0, None, None)),
            ("leg_r", decl(300.0, 910.0, None, None)),
        ])
        .unwrap_err();
        assert!(matches!(err, LoadError::MirrorAnchor { .. }));
    }

    #[test]
    fn test_pair_reflected_on_custom_canvas() {
        let canvas = CharacterCanvas::new(800.0, 1200.0);
        let decls = [
            ("leg_l", decl(500.0, 900.0, None, None)),
            ("leg_r", decl(300.0, 900.0, None, None)),
        ];
        let skeleton =
            Skeleton::from_declarations(decls.iter().map(|(n, d)| (*n, d)), &canvas).unwrap();
        assert_eq!(skeleton.get("leg_l").unwrap().mirror.as_deref(), Some("leg_r"));
        assert!(build(&decls).is_err());
    }

    #[test]
    fn test_duplicate_generated_bone_rejected() {
        let err = build(&[
            ("arm_l", decl(600.0, 400.0, None, Some("arm_r"))),
            ("arm_r", decl(400.0, 400.0, None, None)),
        ])
        .unwrap_err();
        assert_eq!(err, LoadError::DuplicateBone("arm_r".to_string()));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let err = build(&[("head", decl(500.0, 200.0, Some("neck"), None))]).unwrap_err();
        assert!(matches!(err, LoadError::UnknownBone { bone, .. } if bone == "neck"));
    }

    #[test]
    fn test_circular_parent_rejected() {
        let err = build(&[
            ("a", decl(0.0, 0.0, Some("b"), None)),
            ("b", decl(0.0, 0.0, Some("a"), None)),
        ])
        .unwrap_err();
        assert!(matches!(err, LoadError::CircularBoneParent(_)));
    }

    #[test]
    fn test_export_skips_generated_bones() {
        let decls = [
            ("arm_l", decl(600.0, 400.0, None, Some("arm_r"))),
            ("head", decl(500.0, 200.0, None, None)),
        ];
        let skeleton = build(&decls).unwrap();
        let exported = skeleton.to_declarations();
        assert_eq!(exported.len(), 2);
        assert_eq!(exported["arm_l"], decls[0].1);
        assert_eq!(exported["head"], decls[1].1);
    }
}
