use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mutable part of a link record.
///
/// Fields are private so the only transitions available are recording an
/// access and disabling; a disabled record can never become active again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkState {
    #[serde(default)]
    access_count: u64,
    #[serde(default)]
    last_accessed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    disabled_reason: Option<String>,
}

impl LinkState {
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    pub fn last_accessed_at(&self) -> Option<DateTime<Utc>> {
        self.last_accessed_at
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn disabled_reason(&self) -> Option<&str> {
        self.disabled_reason.as_deref()
    }

    /// 记录一次访问
    pub fn record_access(&mut self, at: DateTime<Utc>) {
        self.access_count = self.access_count.saturating_add(1);
        // 时钟回拨时不让时间戳倒退
        self.last_accessed_at = Some(match self.last_accessed_at {
            Some(prev) if prev > at => prev,
            _ => at,
        });
    }

    /// Disable the record. Returns `false` when it was already disabled, in
    /// which case the original reason is kept.
    pub fn disable(&mut self, reason: Option<String>) -> bool {
        if self.disabled {
            return false;
        }
        self.disabled = true;
        self.disabled_reason = reason;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(flatten)]
    pub state: LinkState,
}

impl LinkRecord {
    /// A fresh active record with zero accesses.
    pub fn new(
        code: impl Into<String>,
        long_url: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            long_url: long_url.into(),
            created_at: Utc::now(),
            created_by: created_by.into(),
            state: LinkState::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_disabled()
    }

    pub fn access_count(&self) -> u64 {
        self.state.access_count()
    }
}

/// On-disk shape of the file backend: `{ "links": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkDocument {
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub total: usize,
    pub active: usize,
    pub disabled: usize,
    pub total_access: u64,
}
