//! Live pose state and the lookup traits evaluators read it through.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::skeleton::Skeleton;
use crate::math::{Vec2, rotate_around};

/// Live state of one bone as seen by condition and transform evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneState {
    /// Rest anchor of the bone.
    pub anchor: Vec2,
    /// Current rotation value (degrees, or a linear driver for shift bones).
    pub rotation: f32,
}

/// Read access to bone states by name.
pub trait BoneLookup {
    /// State of the named bone, `None` if the bone is unknown.
    fn bone_state(&self, name: &str) -> Option<BoneState>;

    /// Current rotation of the named bone.
    fn rotation(&self, name: &str) -> Option<f32> {
        self.bone_state(name).map(|b| b.rotation)
    }
}

/// A live pose source: bone lookup plus the derived arms flag.
pub trait PoseSource: BoneLookup {
    /// Whether arm layers are composited in front of the body.
    fn arms_in_front(&self) -> bool;
}

/// Whether the arms are posed in front of or behind the torso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmsPose {
    /// Arms drawn over the body.
    #[default]
    Front,
    /// Arms drawn under the body.
    Back,
}

/// Notification describing what actually changed in a pose update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoseChange {
    /// Bones whose rotation value changed.
    pub bones: HashSet<String>,
    /// Whether the arms flag changed.
    pub arms_changed: bool,
}

impl PoseChange {
    /// A change set naming the given bones.
    pub fn bones<I, S>(bones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bones: bones.into_iter().map(Into::into).collect(),
            arms_changed: false,
        }
    }

    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty() && !self.arms_changed
    }

    /// Whether any changed bone is in `deps`.
    pub fn touches(&self, deps: &HashSet<String>) -> bool {
        if deps.len() < self.bones.len() {
            deps.iter().any(|b| self.bones.contains(b))
        } else {
            self.bones.iter().any(|b| deps.contains(b))
        }
    }

    /// Fold another change into this one.
    pub fn merge(&mut self, other: PoseChange) {
        self.bones.extend(other.bones);
        self.arms_changed |= other.arms_changed;
    }
}

/// Per-character pose: one rotation value per skeleton bone plus the arms flag.
#[derive(Debug, Clone)]
pub struct CharacterPose {
    skeleton: Arc<Skeleton>,
    rotations: Vec<f32>,
    arms: ArmsPose,
}

impl CharacterPose {
    /// A rest pose (all rotations zero, arms in front).
    pub fn new(skeleton: Arc<Skeleton>) -> Self {
        let rotations = vec![0.0; skeleton.len()];
        Self {
            skeleton,
            rotations,
            arms: ArmsPose::default(),
        }
    }

    /// The skeleton this pose drives.
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    /// Iterate `(bone name, rotation)` in skeleton order.
    pub fn rotations(&self) -> impl Iterator<Item = (&str, f32)> {
        self.skeleton
            .bones()
            .iter()
            .zip(self.rotations.iter())
            .map(|(b, &r)| (b.name.as_str(), r))
    }

    /// Set a single bone rotation.
    pub fn set_rotation(&mut self, bone: &str, value: f32) -> PoseChange {
        self.apply([(bone, value)])
    }

    /// Apply a batch of rotation updates.
    ///
    /// Only bones whose value actually changed appear in the returned change
    /// set. Unknown bones are logged and skipped.
    pub fn apply<'a, I>(&mut self, updates: I) -> PoseChange
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        let mut change = PoseChange::default();
        for (name, value) in updates {
            let Some(index) = self.skeleton.index_of(name) else {
                log::warn!("Pose update for unknown bone '{}' ignored", name);
                continue;
            };
            if self.rotations[index] != value {
                self.rotations[index] = value;
                change.bones.insert(name.to_owned());
            }
        }
        change
    }

    /// Current arms pose.
    pub fn arms(&self) -> ArmsPose {
        self.arms
    }

    /// Set the arms pose.
    pub fn set_arms(&mut self, arms: ArmsPose) -> PoseChange {
        let arms_changed = self.arms != arms;
        self.arms = arms;
        PoseChange {
            bones: HashSet::new(),
            arms_changed,
        }
    }

    /// Return every bone to rotation zero.
    pub fn reset(&mut self) -> PoseChange {
        let mut change = PoseChange::default();
        for (bone, rotation) in self.skeleton.bones().iter().zip(self.rotations.iter_mut()) {
            if *rotation != 0.0 {
                *rotation = 0.0;
                change.bones.insert(bone.name.clone());
            }
        }
        change
    }

    /// Anchor of a bone after applying the rotations of its parent chain.
    ///
    /// The nearest parent rotates first, the root last, each about its rest
    /// anchor. This is the same composition order as a point transform chain.
    pub fn world_anchor(&self, bone: &str) -> Option<Vec2> {
        let definition = self.skeleton.get(bone)?;
        let mut position = definition.anchor_vec();
        let mut current = self.skeleton.parent(definition);
        while let Some(parent) = current {
            let rotation = self.rotation(&parent.name).unwrap_or(0.0);
            position = rotate_around(position, parent.anchor_vec(), rotation);
            current = self.skeleton.parent(parent);
        }
        Some(position)
    }
}

impl BoneLookup for CharacterPose {
    fn bone_state(&self, name: &str) -> Option<BoneState> {
        let index = self.skeleton.index_of(name)?;
        Some(BoneState {
            anchor: self.skeleton.bones()[index].anchor_vec(),
            rotation: self.rotations[index],
        })
    }
}

impl PoseSource for CharacterPose {
    fn arms_in_front(&self) -> bool {
        self.arms == ArmsPose::Front
    }
}

/// Lookup that reports every bone at rotation zero.
#[derive(Debug, Clone, Copy)]
pub struct RestPose<'a> {
    skeleton: &'a Skeleton,
}

impl<'a> RestPose<'a> {
    /// Rest view of a skeleton.
    pub fn new(skeleton: &'a Skeleton) -> Self {
        Self { skeleton }
    }
}

impl BoneLookup for RestPose<'_> {
    fn bone_state(&self, name: &str) -> Option<BoneState> {
        self.skeleton.get(name).map(|b| BoneState {
            anchor: b.anchor_vec(),
            rotation: 0.0,
        })
    }
}

impl PoseSource for RestPose<'_> {
    fn arms_in_front(&self) -> bool {
        true
    }
}
