use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use crate::error::FetchError;
use crate::provider::{AssetProvider, FetchFuture};

/// In-memory provider for tests and embedded assets.
///
/// Cloning shares the same storage, so files can still be inserted after a
/// clone has been mounted in an [`AssetStore`](crate::AssetStore).
///
/// [`hold`](MemoryProvider::hold) makes reads of a path stay pending until
/// [`release`](MemoryProvider::release) is called. Held reads resolve to the
/// bytes stored at release time, which lets tests simulate slow fetches that
/// complete out of order.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    files: HashMap<String, Vec<u8>>,
    held: HashSet<String>,
    waiting: Vec<Waker>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` at `path`, replacing any previous file.
    pub fn insert(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.state.lock().files.insert(path.into(), data.into());
    }

    /// Remove the file at `path`, returning its bytes.
    pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().files.remove(path)
    }

    /// Keep reads of `path` pending.
    pub fn hold(&self, path: impl Into<String>) {
        self.state.lock().held.insert(path.into());
    }

    /// Let held reads of `path` complete.
    pub fn release(&self, path: &str) {
        let wakers = {
            let mut state = self.state.lock();
            state.held.remove(path);
            std::mem::take(&mut state.waiting)
        };
        wakers.into_iter().for_each(Waker::wake);
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.state.lock().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct MemoryRead {
    state: Arc<Mutex<MemoryState>>,
    path: String,
}

impl Future for MemoryRead {
    type Output = Result<Vec<u8>, FetchError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.lock();
        if state.held.contains(&self.path) {
            if !state.waiting.iter().any(|w| w.will_wake(cx.waker())) {
                state.waiting.push(cx.waker().clone());
            }
            return Poll::Pending;
        }
        Poll::Ready(
            state
                .files
                .get(&self.path)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(self.path.clone())),
        )
    }
}

impl AssetProvider for MemoryProvider {
    fn read(&self, path: &str) -> FetchFuture<Vec<u8>> {
        Box::pin(MemoryRead {
            state: self.state.clone(),
            path: path.to_owned(),
        })
    }

    fn exists(&self, path: &str) -> FetchFuture<bool> {
        let found = self.state.lock().files.contains_key(path);
        Box::pin(async move { Ok(found) })
    }
}
