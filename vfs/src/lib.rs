//! Read-only asset fetch layer for the Marionette engine.
//!
//! Image bytes and catalogue bundles are fetched through the [`AssetProvider`]
//! trait and routed by mount name through an [`AssetStore`].
//!
//! Every fetch returns a boxed `Send` future. Nothing spawns or drives these
//! futures: the engine polls them cooperatively from its update loop with
//! [`poll_once`], and synchronous callers with [`poll_now`].
//!
//! # Providers
//!
//! - [`MemoryProvider`] - in-memory files, with held reads for latency tests
//! - [`DirectoryProvider`] - files under a directory on disk (native only)

#[cfg(all(feature = "directory", not(target_arch = "wasm32")))]
mod directory;
mod error;
mod memory;
pub mod path;
mod poll;
mod provider;
mod store;

#[cfg(all(feature = "directory", not(target_arch = "wasm32")))]
pub use directory::DirectoryProvider;
pub use error::FetchError;
pub use memory::MemoryProvider;
pub use poll::{poll_now, poll_once};
pub use provider::{AssetProvider, FetchFuture};
pub use store::AssetStore;
