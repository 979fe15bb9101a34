//! Factory Module
//!
//! Generic get/list/create over cached item and list types.
//!
//! # Known gaps
//! - A cached list is not invalidated when an item it contains changes.

mod capability;
mod generic;
mod shared;

pub use capability::{reusable_unless_failed, Construct, Create, Fetch};
pub use generic::{Created, FactoryParts, GenericFactory, ItemValue, ListValue};
pub use shared::SharedFactory;
