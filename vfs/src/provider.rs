use std::future::Future;
use std::pin::Pin;

use crate::FetchError;

/// A boxed, `Send` fetch in flight.
///
/// Nothing drives these futures but the caller: the engine polls them once
/// per frame with [`poll_once`](crate::poll_once) until they resolve.
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send>>;

/// A read-only source of asset bytes.
///
/// Paths given to a provider are normalized and relative to the provider's
/// root; the [`AssetStore`](crate::AssetStore) has already stripped the
/// mount name.
pub trait AssetProvider: Send + Sync + 'static {
    /// Fetch the whole file at `path`.
    fn read(&self, path: &str) -> FetchFuture<Vec<u8>>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> FetchFuture<bool>;

    /// Short human-readable description used in log lines.
    fn describe(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("provider")
            .to_owned()
    }
}
