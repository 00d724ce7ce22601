//! Boolean conditions over bone rotations.
//!
//! A [`Condition`] is a disjunction of clauses, each clause a conjunction of
//! [`AtomicCondition`]s. Conditions gate point transforms and select image
//! overrides.

use serde::{Deserialize, Serialize};

use crate::bone::BoneLookup;
use crate::mirror::mirror_bone_name;

/// Comparison operator of an atomic condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    /// `=`
    #[serde(rename = "=")]
    Eq,
    /// `!=`
    #[serde(rename = "!=")]
    Ne,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
}

impl ConditionOperator {
    /// Compare `lhs` against `rhs`.
    pub fn compare(self, lhs: f32, rhs: f32) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Lt => lhs < rhs,
            Self::Gt => lhs > rhs,
            Self::Le => lhs <= rhs,
            Self::Ge => lhs >= rhs,
        }
    }
}

/// A single `bone <op> value` comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicCondition {
    /// Bone whose rotation is compared.
    pub bone: String,
    /// Comparison operator.
    pub operator: ConditionOperator,
    /// Right-hand side of the comparison.
    pub value: f32,
}

impl AtomicCondition {
    /// Create an atomic condition.
    pub fn new(bone: impl Into<String>, operator: ConditionOperator, value: f32) -> Self {
        Self {
            bone: bone.into(),
            operator,
            value,
        }
    }

    /// Evaluate against the current rotation. Unknown bones evaluate to `false`.
    pub fn evaluate<L: BoneLookup + ?Sized>(&self, lookup: &L) -> bool {
        match lookup.rotation(&self.bone) {
            Some(rotation) => self.operator.compare(rotation, self.value),
            None => {
                log::trace!("Condition on unknown bone '{}' evaluates to false", self.bone);
                false
            }
        }
    }
}

/// OR-of-ANDs condition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(pub Vec<Vec<AtomicCondition>>);

impl Condition {
    /// A condition with a single clause.
    pub fn all(clause: Vec<AtomicCondition>) -> Self {
        Self(vec![clause])
    }

    /// A condition consisting of one atomic comparison.
    pub fn single(bone: impl Into<String>, operator: ConditionOperator, value: f32) -> Self {
        Self::all(vec![AtomicCondition::new(bone, operator, value)])
    }

    /// Clauses of this condition.
    pub fn clauses(&self) -> &[Vec<AtomicCondition>] {
        &self.0
    }

    /// Evaluate: true if any clause has all of its atoms true.
    pub fn evaluate<L: BoneLookup + ?Sized>(&self, lookup: &L) -> bool {
        self.0
            .iter()
            .any(|clause| clause.iter().all(|atom| atom.evaluate(lookup)))
    }

    /// Every bone name referenced by the condition.
    pub fn bones(&self) -> impl Iterator<Item = &str> {
        self.0.iter().flatten().map(|atom| atom.bone.as_str())
    }

    /// The bilateral counterpart: every bone reference mirrored.
    pub fn mirrored(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|clause| {
                    clause
                        .iter()
                        .map(|atom| AtomicCondition {
                            bone: mirror_bone_name(&atom.bone),
                            ..atom.clone()
                        })
                        .collect()
                })
                .collect(),
        )
    }
}

/// Evaluate an optional condition. A missing condition is always true.
pub fn evaluate_condition<L: BoneLookup + ?Sized>(
    condition: Option<&Condition>,
    lookup: &L,
) -> bool {
    condition.is_none_or(|c| c.evaluate(lookup))
}
