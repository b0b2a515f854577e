use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, trace, warn};

use crate::errors::{Result, SharelinkError};
use crate::storage::{LinkRecord, LinkState, LinkStore};
use crate::utils::is_valid_short_code;

/// Same error for unknown and disabled codes, so callers cannot tell them
/// apart.
fn not_found(code: &str) -> SharelinkError {
    SharelinkError::not_found(format!("Short link not found: {}", code))
}

pub struct Resolver {
    store: Arc<dyn LinkStore>,
}

impl Resolver {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    /// Resolve `code` to its target URL and record the access.
    ///
    /// Access accounting is best-effort: if the update cannot be persisted
    /// the failure is logged and the target is still returned.
    pub async fn resolve(&self, code: &str) -> Result<String> {
        if !is_valid_short_code(code) {
            trace!("Invalid short code rejected: {}", code);
            return Err(not_found(code));
        }

        let record = match self.store.find_by_code(code).await? {
            Some(record) => record,
            None => {
                debug!("Short link not found: {}", code);
                return Err(not_found(code));
            }
        };

        if !record.is_active() {
            debug!(
                "Short link '{}' is disabled ({})",
                code,
                record.state.disabled_reason().unwrap_or("no reason")
            );
            return Err(not_found(code));
        }

        let now = Utc::now();
        let update = self
            .store
            .update(
                code,
                Box::new(move |state: &mut LinkState| {
                    // 与禁用操作并发时不再计数
                    if !state.is_disabled() {
                        state.record_access(now);
                    }
                }),
            )
            .await;

        if let Err(e) = update {
            warn!("Failed to record access for '{}': {}", code, e);
        }

        Ok(record.long_url)
    }

    /// Move `code` from Active to Disabled. Disabling an already disabled
    /// record is a no-op that keeps the first reason.
    pub async fn disable(&self, code: &str, reason: Option<String>) -> Result<LinkRecord> {
        let record = self
            .store
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        if !record.is_active() {
            debug!("Short link '{}' already disabled", code);
            return Ok(record);
        }

        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        let updated = self
            .store
            .update(
                code,
                Box::new(move |state: &mut LinkState| {
                    state.disable(reason);
                }),
            )
            .await?;

        info!(
            "Resolver: disabled '{}' ({})",
            code,
            updated.state.disabled_reason().unwrap_or("no reason")
        );
        Ok(updated)
    }
}
