//! In-memory indexed link table
//!
//! Shared by every backend: an ordered record list plus a code index and an
//! index of active records by URL. All uniqueness rules are enforced here.

use std::collections::HashMap;

use tracing::warn;

use super::models::{LinkRecord, LinkState, LinkStats};
use crate::errors::{Result, SharelinkError};

#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    records: Vec<LinkRecord>,
    by_code: HashMap<String, usize>,
    active_by_url: HashMap<String, usize>,
}

impl LinkTable {
    /// Build a table from persisted records, in document order.
    ///
    /// Duplicate codes make the data unusable and are rejected. Duplicate
    /// active URLs can exist in files written without a write lock; the
    /// first holder keeps the URL index entry.
    pub fn from_records(records: Vec<LinkRecord>) -> Result<Self> {
        let mut table = LinkTable {
            records: Vec::with_capacity(records.len()),
            by_code: HashMap::with_capacity(records.len()),
            active_by_url: HashMap::new(),
        };

        for record in records {
            if table.by_code.contains_key(&record.code) {
                return Err(SharelinkError::serialization(format!(
                    "Duplicate short code in link document: {}",
                    record.code
                )));
            }

            let idx = table.records.len();
            table.by_code.insert(record.code.clone(), idx);

            if record.is_active() {
                if let Some(&holder) = table.active_by_url.get(&record.long_url) {
                    warn!(
                        "URL {} already held by active code '{}'; '{}' left out of the URL index",
                        record.long_url, table.records[holder].code, record.code
                    );
                } else {
                    table.active_by_url.insert(record.long_url.clone(), idx);
                }
            }

            table.records.push(record);
        }

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    pub fn find_by_code(&self, code: &str) -> Option<&LinkRecord> {
        self.by_code.get(code).map(|&idx| &self.records[idx])
    }

    /// Exact-match lookup. Prefers the active holder of the URL; otherwise
    /// returns the most recent disabled record for it, if any.
    pub fn find_by_url(&self, long_url: &str) -> Option<&LinkRecord> {
        if let Some(&idx) = self.active_by_url.get(long_url) {
            return Some(&self.records[idx]);
        }
        self.records.iter().rev().find(|r| r.long_url == long_url)
    }

    pub fn code_exists(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    pub fn insert(&mut self, record: LinkRecord) -> Result<()> {
        if self.by_code.contains_key(&record.code) {
            return Err(SharelinkError::conflict(format!(
                "Short code already exists: {}",
                record.code
            )));
        }

        if record.is_active()
            && let Some(&holder) = self.active_by_url.get(&record.long_url)
        {
            return Err(SharelinkError::conflict(format!(
                "URL already registered under code: {}",
                self.records[holder].code
            )));
        }

        let idx = self.records.len();
        self.by_code.insert(record.code.clone(), idx);
        if record.is_active() {
            self.active_by_url.insert(record.long_url.clone(), idx);
        }
        self.records.push(record);
        Ok(())
    }

    /// Apply `mutator` to the mutable state of `code` and return the
    /// updated record.
    pub fn update<F>(&mut self, code: &str, mutator: F) -> Result<LinkRecord>
    where
        F: FnOnce(&mut LinkState),
    {
        let idx = *self
            .by_code
            .get(code)
            .ok_or_else(|| SharelinkError::not_found(format!("Short link not found: {}", code)))?;

        let record = &mut self.records[idx];
        let was_active = record.is_active();
        mutator(&mut record.state);
        let updated = record.clone();

        // 只处理自己持有的索引项；旧文件中的重复有效记录接替索引
        if was_active
            && !updated.is_active()
            && self.active_by_url.get(&updated.long_url) == Some(&idx)
        {
            self.active_by_url.remove(&updated.long_url);
            if let Some(next) = self
                .records
                .iter()
                .position(|r| r.is_active() && r.long_url == updated.long_url)
            {
                self.active_by_url.insert(updated.long_url.clone(), next);
            }
        }

        Ok(updated)
    }

    pub fn stats(&self) -> LinkStats {
        let mut stats = LinkStats {
            total: self.records.len(),
            ..LinkStats::default()
        };
        for record in &self.records {
            if record.is_active() {
                stats.active += 1;
            } else {
                stats.disabled += 1;
            }
            stats.total_access = stats.total_access.saturating_add(record.access_count());
        }
        stats
    }
}
