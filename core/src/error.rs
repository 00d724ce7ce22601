//! Error types for skeleton and asset loading.

use std::fmt;

/// Errors that can occur while loading a skeleton, an asset or a catalogue.
///
/// Every variant is fatal for the definition it refers to: the loader refuses
/// the definition instead of producing degraded geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The catalogue bundle could not be parsed.
    Parse(String),
    /// Two bones share a name (declared twice or generated as a mirror of another).
    DuplicateBone(String),
    /// A bone name was referenced that the skeleton does not define.
    UnknownBone {
        /// The missing bone name.
        bone: String,
        /// Where the reference was found.
        context: String,
    },
    /// A mirrored bone breaks the `_l`/`_r` suffix convention.
    MirrorNaming {
        /// The bone carrying the mirror declaration (or lacking a counterpart).
        bone: String,
        /// The declared mirror name, if any.
        mirror: Option<String>,
    },
    /// A separately declared `_l`/`_r` pair whose anchors are not reflections
    /// of each other across the canvas midline.
    MirrorAnchor {
        /// The bone whose anchor was checked.
        bone: String,
        /// Its counterpart.
        mirror: String,
    },
    /// A bone's parent chain loops back onto itself.
    CircularBoneParent(String),
    /// A layer's point reference names a layer index that does not exist.
    PointReferenceOutOfRange {
        /// Asset identifier.
        asset: String,
        /// Index of the referencing layer.
        layer: usize,
        /// The referenced layer index.
        reference: usize,
        /// Number of layers in the asset.
        layer_count: usize,
    },
    /// A layer's point reference points at a layer that is itself a reference.
    NestedPointReference {
        /// Asset identifier.
        asset: String,
        /// Index of the referencing layer.
        layer: usize,
        /// The referenced layer index.
        reference: usize,
    },
    /// A layer definition is structurally invalid.
    InvalidLayer {
        /// Asset identifier.
        asset: String,
        /// Index of the layer.
        layer: usize,
        /// Human-readable reason.
        reason: String,
    },
    /// An asset identifier is not present in the catalogue.
    UnknownAsset(String),
    /// A layer index passed to an editing operation is out of range.
    LayerIndexOutOfRange {
        /// Asset identifier.
        asset: String,
        /// The requested index.
        index: usize,
        /// Number of layers in the asset.
        layer_count: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "catalogue parse error: {msg}"),
            Self::DuplicateBone(name) => write!(f, "duplicate bone '{name}'"),
            Self::UnknownBone { bone, context } => {
                write!(f, "unknown bone '{bone}' referenced by {context}")
            }
            Self::MirrorNaming { bone, mirror } => match mirror {
                Some(mirror) => write!(
                    f,
                    "bone '{bone}' declares mirror '{mirror}', expected an _l/_r counterpart"
                ),
                None => write!(f, "bone '{bone}' has a side suffix but no mirror counterpart"),
            },
            Self::MirrorAnchor { bone, mirror } => write!(
                f,
                "bones '{bone}' and '{mirror}' are mirrors but their anchors are not reflected"
            ),
            Self::CircularBoneParent(name) => {
                write!(f, "bone '{name}' has a circular parent chain")
            }
            Self::PointReferenceOutOfRange {
                asset,
                layer,
                reference,
                layer_count,
            } => write!(
                f,
                "asset '{asset}' layer {layer} references points of layer {reference}, \
                 but the asset has {layer_count} layers"
            ),
            Self::NestedPointReference {
                asset,
                layer,
                reference,
            } => write!(
                f,
                "asset '{asset}' layer {layer} references layer {reference}, \
                 which itself references another layer's points"
            ),
            Self::InvalidLayer {
                asset,
                layer,
                reason,
            } => write!(f, "asset '{asset}' layer {layer} is invalid: {reason}"),
            Self::UnknownAsset(id) => write!(f, "unknown asset '{id}'"),
            Self::LayerIndexOutOfRange {
                asset,
                index,
                layer_count,
            } => write!(
                f,
                "asset '{asset}' has {layer_count} layers, index {index} is out of range"
            ),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
