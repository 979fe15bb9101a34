//! Cache Module
//!
//! Provides a bounded cache keyed by request attributes, with
//! FIFO-with-promotion eviction.

mod key;
mod order;
mod stats;
mod store;


// Re-export public types
pub use key::{derive_key, Request};
pub use order::RecencyOrder;
pub use stats::CacheStats;
pub use store::KeyedCache;
