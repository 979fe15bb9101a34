//! Hub Cache - bounded, attribute-keyed caching for data factories
//!
//! Provides a cache keyed by request attributes with FIFO-with-promotion
//! eviction, and a generic factory serving cache-coherent get/list/create.

pub mod cache;
pub mod config;
pub mod error;
pub mod factory;
pub mod fetch;

pub use cache::{KeyedCache, Request};
pub use config::{CacheConfig, Config};
pub use error::{CacheError, FetchError};
pub use factory::{FactoryParts, GenericFactory, SharedFactory};
pub use fetch::{pending, PendingFetch};
