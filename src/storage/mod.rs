use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StorageConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;
pub mod table;

pub use backend::{FileStore, MemoryStore};
pub use models::{LinkDocument, LinkRecord, LinkState, LinkStats};

/// Scoped read-modify-write over the mutable fields of one record.
pub type LinkMutator = Box<dyn FnOnce(&mut LinkState) + Send>;

/// Durable mapping of code → record with a secondary index on active URLs.
///
/// Every mutation is serialized store-wide. `insert` is the sole arbiter of
/// uniqueness: it fails with `Conflict` when the code is taken or an active
/// record already holds the URL, and succeeds only once the write is
/// durable. Reads never observe a partially applied write.
#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn find_by_url(&self, long_url: &str) -> Result<Option<LinkRecord>>;

    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>>;

    async fn code_exists(&self, code: &str) -> Result<bool>;

    async fn insert(&self, record: LinkRecord) -> Result<()>;

    /// Fails with `NotFound` when `code` is absent.
    async fn update(&self, code: &str, mutator: LinkMutator) -> Result<LinkRecord>;

    /// All records in insertion order.
    async fn all(&self) -> Result<Vec<LinkRecord>>;

    async fn stats(&self) -> Result<LinkStats>;

    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn LinkStore>> {
        let store: Arc<dyn LinkStore> = match backend::normalize_backend_name(&config.backend)? {
            "memory" => Arc::new(MemoryStore::new()),
            _ => Arc::new(FileStore::open(config).await?),
        };

        tracing::info!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }
}
