//! Generic Factory Module
//!
//! Cache-coherent get/list/create over any pair of item and list types.

use tracing::debug;

use crate::cache::{KeyedCache, Request};
use crate::factory::{Construct, Create, Fetch};

/// Value stored for item lookups by a factory built on `I`.
pub type ItemValue<I> = <<I as Construct>::Instance as Fetch>::Value;
/// Value stored for list lookups by a factory built on `L`.
pub type ListValue<L> = <<L as Construct>::Instance as Fetch>::Value;
/// Value returned by `create` on a factory built on `I`.
pub type Created<I> = <<I as Construct>::Instance as Create>::Created;

/// The four pieces a factory is assembled from.
pub struct FactoryParts<I, L>
where
    I: Construct,
    L: Construct,
    I::Instance: Fetch,
    L::Instance: Fetch,
{
    pub item_type: I,
    pub item_cache: KeyedCache<ItemValue<I>>,
    pub list_type: L,
    pub list_cache: KeyedCache<ListValue<L>>,
}

// == Generic Factory ==
/// Serves `get`, `list` and `create` with per-request caching.
///
/// On a miss the instance is constructed, its fetch is started and the
/// returned value is stored before this call returns. Any later call for the
/// same key receives a clone of that same value, so a pending fetch is shared
/// rather than repeated. `create` never touches either cache.
///
/// Needs `&mut self`; wrap it in [`SharedFactory`](crate::factory::SharedFactory)
/// when several tasks use one factory.
pub struct GenericFactory<I, L>
where
    I: Construct,
    L: Construct,
    I::Instance: Fetch,
    L::Instance: Fetch,
{
    item_type: I,
    item_cache: KeyedCache<ItemValue<I>>,
    list_type: L,
    list_cache: KeyedCache<ListValue<L>>,
}

impl<I, L> GenericFactory<I, L>
where
    I: Construct,
    L: Construct,
    I::Instance: Fetch,
    L::Instance: Fetch,
{
    pub fn new(parts: FactoryParts<I, L>) -> Self {
        Self {
            item_type: parts.item_type,
            item_cache: parts.item_cache,
            list_type: parts.list_type,
            list_cache: parts.list_cache,
        }
    }

    // == List ==
    /// Returns the list for `request`, fetching it on a miss.
    pub fn list(&mut self, request: &Request) -> ListValue<L> {
        cached_fetch(&self.list_type, &mut self.list_cache, request, "list")
    }

    // == Get ==
    /// Returns the item for `request`, fetching it on a miss.
    pub fn get(&mut self, request: &Request) -> ItemValue<I> {
        cached_fetch(&self.item_type, &mut self.item_cache, request, "item")
    }

    pub fn item_cache(&self) -> &KeyedCache<ItemValue<I>> {
        &self.item_cache
    }

    pub fn list_cache(&self) -> &KeyedCache<ListValue<L>> {
        &self.list_cache
    }
}

impl<I, L> GenericFactory<I, L>
where
    I: Construct,
    L: Construct,
    I::Instance: Fetch + Create,
    L::Instance: Fetch,
{
    // == Create ==
    /// Creates a new item. Always reaches the item type; never cached.
    pub fn create(&self, request: &Request) -> Created<I> {
        debug!("factory create");
        self.item_type.construct(request).create()
    }
}

fn cached_fetch<C>(
    constructor: &C,
    cache: &mut KeyedCache<<C::Instance as Fetch>::Value>,
    request: &Request,
    kind: &'static str,
) -> <C::Instance as Fetch>::Value
where
    C: Construct,
    C::Instance: Fetch,
{
    if let Some(value) = cache.lookup(request) {
        if <C::Instance as Fetch>::is_reusable(value) {
            return value.clone();
        }
        debug!(kind, key = %cache.key_for(request), "discarding unusable cached value");
    }

    debug!(kind, key = %cache.key_for(request), "cache miss, fetching");
    let value = constructor.construct(request).fetch();
    cache.put(request, value.clone());
    value
}
