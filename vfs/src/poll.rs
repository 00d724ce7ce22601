use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use crate::error::FetchError;
use crate::provider::FetchFuture;

/// Poll a future once with a no-op waker.
///
/// Returns `None` while the future is pending. Callers re-poll on their own
/// schedule instead of waiting for a wake-up.
pub fn poll_once<F: Future + Unpin>(fut: &mut F) -> Option<F::Output> {
    let mut cx = Context::from_waker(Waker::noop());
    match Pin::new(fut).poll(&mut cx) {
        Poll::Ready(output) => Some(output),
        Poll::Pending => None,
    }
}

/// Resolve a fetch that is expected to be ready immediately.
///
/// Returns [`FetchError::WouldBlock`] if the fetch is still in flight, which
/// drops it.
pub fn poll_now<T>(mut fut: FetchFuture<T>) -> Result<T, FetchError> {
    poll_once(&mut fut).unwrap_or(Err(FetchError::WouldBlock))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_future_resolves() {
        let fut: FetchFuture<u32> = Box::pin(async { Ok(7) });
        assert_eq!(poll_now(fut).unwrap(), 7);
    }

    #[test]
    fn pending_future_would_block() {
        let fut: FetchFuture<u32> = Box::pin(std::future::pending());
        assert!(matches!(poll_now(fut), Err(FetchError::WouldBlock)));

        let mut fut = std::future::pending::<()>();
        assert!(poll_once(&mut fut).is_none());
    }
}
