//! Pending Fetch Module
//!
//! A fetch that may not have resolved yet, shared by every caller that
//! receives it from the cache.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::error::FetchError;

/// Outcome every waiter on a [`PendingFetch`] observes.
pub type FetchResult<T> = std::result::Result<Arc<T>, FetchError>;

/// A shareable, possibly unresolved fetch.
///
/// Cloning yields a handle to the same computation: the inner future runs at
/// most once and all clones see the same result.
pub type PendingFetch<T> = Shared<BoxFuture<'static, FetchResult<T>>>;

// == Constructor ==
/// Wraps a fetch future so it can be cached and awaited by many callers.
pub fn pending<T, F>(fetch: F) -> PendingFetch<T>
where
    T: Send + Sync + 'static,
    F: Future<Output = std::result::Result<T, FetchError>> + Send + 'static,
{
    fetch.map(|result| result.map(Arc::new)).boxed().shared()
}

/// Returns true once the fetch has resolved, successfully or not.
pub fn is_settled<T>(fetch: &PendingFetch<T>) -> bool {
    fetch.peek().is_some()
}

/// Returns true if the fetch has resolved with an error.
///
/// A fetch that is still running is not considered failed.
pub fn has_failed<T>(fetch: &PendingFetch<T>) -> bool {
    matches!(fetch.peek(), Some(Err(_)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_clones_share_one_resolution() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let fetch = pending(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, FetchError>("record".to_string())
        });
        let other = fetch.clone();

        let first = tokio_test::block_on(fetch).unwrap();
        let second = tokio_test::block_on(other).unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_settled_and_failed() {
        let ok = pending(async { Ok::<_, FetchError>(1u32) });
        assert!(!is_settled(&ok));
        tokio_test::block_on(ok.clone()).unwrap();
        assert!(is_settled(&ok));
        assert!(!has_failed(&ok));

        let failed = pending(async { Err::<u32, _>(FetchError::Failed("boom".to_string())) });
        assert!(!has_failed(&failed));
        let err = tokio_test::block_on(failed.clone()).unwrap_err();
        assert_eq!(err, FetchError::Failed("boom".to_string()));
        assert!(has_failed(&failed));
    }
}
