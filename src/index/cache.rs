//! Single-flight, replaceable cache for built indexes.
//!
//! ```text
//! IndexCache<T>
//!   └── ArcSwap<OnceCell<Arc<T>>>
//!         │
//!         ├── get_or_try_build()  concurrent cold callers await one build
//!         ├── get()               lock-free read of a finished build
//!         └── invalidate()        swap in a fresh, empty cell
//! ```
//!
//! A failed build leaves the cell empty, so the next call builds again.
//! Readers holding an `Arc<T>` from before `invalidate()` keep their copy.

use std::{future::Future, sync::Arc};

use arc_swap::ArcSwap;
use tokio::sync::OnceCell;

pub struct IndexCache<T> {
    cell: ArcSwap<OnceCell<Arc<T>>>,
}

impl<T> Default for IndexCache<T> {
    fn default() -> Self {
        Self {
            cell: ArcSwap::from_pointee(OnceCell::new()),
        }
    }
}

impl<T> std::fmt::Debug for IndexCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("initialized", &self.cell.load().initialized())
            .finish()
    }
}

impl<T> IndexCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value, running `build` if the cache is empty.
    pub async fn get_or_try_build<F, Fut, E>(&self, build: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = self.cell.load_full();
        cell.get_or_try_init(|| async { build().await.map(Arc::new) })
            .await
            .cloned()
    }

    /// The cached value, if a build has completed.
    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.load().get().cloned()
    }

    /// Drop the cached value; the next access rebuilds from scratch.
    pub fn invalidate(&self) {
        self.cell.store(Arc::new(OnceCell::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_builds_once() {
        let cache = IndexCache::new();
        let counter = AtomicUsize::new(0);
        let builds = &counter;
        let build = move || async move {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(42)
        };

        assert_eq!(*cache.get_or_try_build(build).await.unwrap(), 42);
        assert_eq!(*cache.get_or_try_build(build).await.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_cold_calls_share_one_build() {
        let cache = IndexCache::new();
        let counter = AtomicUsize::new(0);
        let builds = &counter;
        let build = move || async move {
            builds.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, String>("index")
        };

        let (a, b) = tokio::join!(cache.get_or_try_build(build), cache.get_or_try_build(build));
        assert_eq!(*a.unwrap(), "index");
        assert_eq!(*b.unwrap(), "index");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_build_is_not_cached() {
        let cache = IndexCache::<u32>::new();

        let err = cache
            .get_or_try_build(|| async { Err::<u32, _>("store offline") })
            .await
            .unwrap_err();
        assert_eq!(err, "store offline");
        assert!(cache.get().is_none());

        let value = cache.get_or_try_build(|| async { Ok::<_, &str>(7) }).await.unwrap();
        assert_eq!(*value, 7);
    }

    #[tokio::test]
    async fn test_invalidate_rebuilds_and_keeps_old_readers() {
        let cache = IndexCache::new();
        let first = cache.get_or_try_build(|| async { Ok::<_, ()>(1) }).await.unwrap();

        cache.invalidate();
        assert!(cache.get().is_none());

        let second = cache.get_or_try_build(|| async { Ok::<_, ()>(2) }).await.unwrap();
        assert_eq!(*first, 1);
        assert_eq!(*second, 2);
        assert_eq!(cache.get().map(|v| *v), Some(2));
    }
}
