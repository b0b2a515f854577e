use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::Result;
use crate::storage::table::LinkTable;
use crate::storage::{LinkMutator, LinkRecord, LinkStats, LinkStore};

/// Non-durable store. Writes take the table's write lock, so they are
/// serialized against each other and never observed half-applied.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<LinkTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<LinkRecord>) -> Result<Self> {
        Ok(Self {
            table: RwLock::new(LinkTable::from_records(records)?),
        })
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn find_by_url(&self, long_url: &str) -> Result<Option<LinkRecord>> {
        Ok(self.table.read().find_by_url(long_url).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>> {
        Ok(self.table.read().find_by_code(code).cloned())
    }

    async fn code_exists(&self, code: &str) -> Result<bool> {
        Ok(self.table.read().code_exists(code))
    }

    async fn insert(&self, record: LinkRecord) -> Result<()> {
        self.table.write().insert(record)
    }

    async fn update(&self, code: &str, mutator: LinkMutator) -> Result<LinkRecord> {
        self.table.write().update(code, mutator)
    }

    async fn all(&self) -> Result<Vec<LinkRecord>> {
        Ok(self.table.read().records().to_vec())
    }

    async fn stats(&self) -> Result<LinkStats> {
        Ok(self.table.read().stats())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
