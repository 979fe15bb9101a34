//! Capability Traits
//!
//! What an item or list type must provide for a factory to serve it.

use crate::cache::Request;
use crate::fetch::{has_failed, PendingFetch};

/// Builds an instance from a request.
///
/// Implemented for any `Fn(&Request) -> T`, so a closure capturing an API
/// handle works as a constructor.
pub trait Construct {
    type Instance;

    fn construct(&self, request: &Request) -> Self::Instance;
}

impl<F, T> Construct for F
where
    F: Fn(&Request) -> T,
{
    type Instance = T;

    fn construct(&self, request: &Request) -> T {
        self(request)
    }
}

/// Retrieves the value an instance stands for.
pub trait Fetch {
    /// What the cache stores and callers receive.
    ///
    /// Clones must share identity (an `Arc`, a shared future) for cache hits
    /// to hand out the same object.
    type Value: Clone;

    /// Starts the fetch. May return before the data has arrived.
    fn fetch(self) -> Self::Value;

    /// Whether a cached value may still be served.
    ///
    /// Returning false makes the factory fetch again and overwrite it.
    fn is_reusable(_value: &Self::Value) -> bool {
        true
    }
}

/// Creates a new record from an instance. Never cached.
pub trait Create {
    type Created;

    fn create(self) -> Self::Created;
}

/// Reusable unless the pending fetch has already failed.
pub fn reusable_unless_failed<T>(value: &PendingFetch<T>) -> bool {
    !has_failed(value)
}
