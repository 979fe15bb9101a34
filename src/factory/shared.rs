//! Shared Factory Module
//!
//! Thread-safe handle to a [`GenericFactory`] for multi-threaded runtimes.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{CacheStats, Request};
use crate::factory::{
    Construct, Create, Created, Fetch, GenericFactory, ItemValue, ListValue,
};

/// Cloneable handle serializing access to one factory.
///
/// The lock is held across the whole lookup, construct, fetch-start and store
/// sequence, so two tasks asking for the same key on different threads still
/// trigger a single fetch. Returned values (e.g. pending fetches) are awaited
/// by the caller after the lock is released.
pub struct SharedFactory<I, L>
where
    I: Construct,
    L: Construct,
    I::Instance: Fetch,
    L::Instance: Fetch,
{
    inner: Arc<Mutex<GenericFactory<I, L>>>,
}

impl<I, L> Clone for SharedFactory<I, L>
where
    I: Construct,
    L: Construct,
    I::Instance: Fetch,
    L::Instance: Fetch,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I, L> SharedFactory<I, L>
where
    I: Construct,
    L: Construct,
    I::Instance: Fetch,
    L::Instance: Fetch,
{
    pub fn new(factory: GenericFactory<I, L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(factory)),
        }
    }

    pub async fn get(&self, request: &Request) -> ItemValue<I> {
        self.inner.lock().await.get(request)
    }

    pub async fn list(&self, request: &Request) -> ListValue<L> {
        self.inner.lock().await.list(request)
    }

    /// Statistics of the item and list caches, in that order.
    pub async fn stats(&self) -> (CacheStats, CacheStats) {
        let factory = self.inner.lock().await;
        (factory.item_cache().stats(), factory.list_cache().stats())
    }
}

impl<I, L> SharedFactory<I, L>
where
    I: Construct,
    L: Construct,
    I::Instance: Fetch + Create,
    L::Instance: Fetch,
{
    pub async fn create(&self, request: &Request) -> Created<I> {
        self.inner.lock().await.create(request)
    }
}
