use std::path::PathBuf;

use crate::provider::{AssetProvider, FetchFuture};

/// Provider reading assets from a directory on disk.
///
/// Reads use blocking `std::fs` inside the returned future, so they resolve
/// on the first poll.
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    /// A provider rooted at `root`. The directory is only checked on read.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl AssetProvider for DirectoryProvider {
    fn read(&self, path: &str) -> FetchFuture<Vec<u8>> {
        let full_path = self.full_path(path);
        Box::pin(async move { Ok(std::fs::read(full_path)?) })
    }

    fn exists(&self, path: &str) -> FetchFuture<bool> {
        let full_path = self.full_path(path);
        Box::pin(async move { Ok(full_path.is_file()) })
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}
