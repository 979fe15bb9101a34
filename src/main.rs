//! Hub Cache - demonstration binary
//!
//! Drives a factory over an in-process record service and reports how many
//! requests actually reached the service.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hub_cache::factory::{reusable_unless_failed, Create, Fetch};
use hub_cache::{
    pending, Config, FactoryParts, FetchError, GenericFactory, KeyedCache, PendingFetch, Request,
    SharedFactory,
};

// == Record Service ==
/// Stand-in for a remote API: a keyed record store with artificial latency.
struct RecordService {
    records: RwLock<BTreeMap<String, Value>>,
    calls: AtomicUsize,
    latency: Duration,
}

impl RecordService {
    fn seeded(latency: Duration) -> Self {
        let records = [
            ("c1", json!({"id": "c1", "name": "Acme Corp"})),
            ("c2", json!({"id": "c2", "name": "Globex"})),
        ]
        .into_iter()
        .map(|(id, record)| (id.to_string(), record))
        .collect();

        Self {
            records: RwLock::new(records),
            calls: AtomicUsize::new(0),
            latency,
        }
    }

    async fn fetch_record(&self, id: String) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(FetchError::NotFound(id))
    }

    async fn list_records(&self) -> Result<Vec<Value>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn create_record(&self, fields: Request) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        let id = record_id(&fields)?;
        let record = serde_json::to_value(&fields).map_err(|e| FetchError::Failed(e.to_string()))?;

        let mut records = self.records.write().await;
        if records.contains_key(&id) {
            return Err(FetchError::Rejected(format!("record {} already exists", id)));
        }
        records.insert(id, record.clone());
        Ok(record)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn record_id(request: &Request) -> Result<String, FetchError> {
    request
        .get("id")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| FetchError::Rejected("request has no string id".to_string()))
}

// == Item And List Types ==
struct RecordLookup {
    service: Arc<RecordService>,
    request: Request,
}

impl Fetch for RecordLookup {
    type Value = PendingFetch<Value>;

    fn fetch(self) -> PendingFetch<Value> {
        let service = self.service;
        let request = self.request;
        pending(async move {
            let id = record_id(&request)?;
            service.fetch_record(id).await
        })
    }

    fn is_reusable(value: &PendingFetch<Value>) -> bool {
        reusable_unless_failed(value)
    }
}

impl Create for RecordLookup {
    type Created = PendingFetch<Value>;

    fn create(self) -> PendingFetch<Value> {
        let service = self.service;
        let request = self.request;
        pending(async move { service.create_record(request).await })
    }
}

struct RecordListing {
    service: Arc<RecordService>,
}

impl Fetch for RecordListing {
    type Value = PendingFetch<Vec<Value>>;

    fn fetch(self) -> PendingFetch<Vec<Value>> {
        let service = self.service;
        pending(async move { service.list_records().await })
    }

    fn is_reusable(value: &PendingFetch<Vec<Value>>) -> bool {
        reusable_unless_failed(value)
    }
}

/// Main entry point for the demonstration.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load cache configuration from environment variables
/// 3. Build a shared factory over the record service
/// 4. Issue concurrent gets for one record, a list, a create and a failing get
/// 5. Report service calls and cache statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hub_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("reading cache configuration")?;
    config.validate().context("invalid cache configuration")?;
    info!(
        "Configuration loaded: item_capacity={}, item_keys={:?}, list_capacity={}, list_keys={:?}",
        config.item_cache.capacity,
        config.item_cache.key_attributes,
        config.list_cache.capacity,
        config.list_cache.key_attributes
    );

    let service = Arc::new(RecordService::seeded(Duration::from_millis(50)));
    let item_service = service.clone();
    let list_service = service.clone();

    let factory = SharedFactory::new(GenericFactory::new(FactoryParts {
        item_type: move |request: &Request| RecordLookup {
            service: item_service.clone(),
            request: request.clone(),
        },
        item_cache: KeyedCache::from_config(&config.item_cache)?,
        list_type: move |_: &Request| RecordListing {
            service: list_service.clone(),
        },
        list_cache: KeyedCache::from_config(&config.list_cache)?,
    }));

    // Two lookups for the same record share one fetch
    let request = Request::new().with("id", "c1");
    let (first, second) = tokio::join!(factory.get(&request), factory.get(&request));
    let (first, second) = tokio::join!(first, second);
    let first = first.context("fetching c1")?;
    let second = second.context("fetching c1")?;
    info!(
        record = %first,
        shared = Arc::ptr_eq(&first, &second),
        "fetched record"
    );

    let all = factory.list(&Request::new()).await.await?;
    info!(count = all.len(), "listed records");

    let created = factory
        .create(&Request::new().with("id", "c3").with("name", "Initech"))
        .await
        .await?;
    info!(record = %created, "created record");

    if let Err(err) = factory.get(&Request::new().with("id", "missing")).await.await {
        warn!(error = %err, "lookup failed");
    }

    let (items, lists) = factory.stats().await;
    info!(
        service_calls = service.calls(),
        item_hits = items.hits,
        item_misses = items.misses,
        item_entries = items.total_entries,
        list_entries = lists.total_entries,
        "done"
    );

    Ok(())
}
