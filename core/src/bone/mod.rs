//! Bones, skeletons and live poses.
//!
//! - [`Skeleton`] - validated bone graph with reciprocal mirror links
//! - [`CharacterPose`] - per-bone rotation values plus the arms flag
//! - [`BoneLookup`] / [`PoseSource`] - read interfaces used by evaluators

mod pose;
mod skeleton;

pub use pose::{ArmsPose, BoneLookup, BoneState, CharacterPose, PoseChange, PoseSource, RestPose};
pub use skeleton::{BoneDeclaration, BoneDefinition, Skeleton};
