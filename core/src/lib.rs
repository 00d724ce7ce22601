//! # Marionette Core
//!
//! Data model of the Marionette character appearance engine: skeletons and
//! poses, bone conditions and point transforms, bilateral mirroring, layered
//! assets and the catalogue they are loaded from.
//!
//! Nothing here touches textures or meshes; see `marionette-graphics`.

pub mod asset;
pub mod bone;
pub mod canvas;
pub mod condition;
pub mod error;
pub mod math;
pub mod mirror;
pub mod point;
pub mod transform;

pub use error::LoadError;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the crate version.
pub fn init() {
    log::info!("Marionette Core v{} initialized", VERSION);
}
