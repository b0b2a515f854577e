//! Link management service
//!
//! The two operations offered to outer layers (`create_short_link` and
//! `redirect_target`) plus the audit/admin helpers used by the CLI.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::registry::{RegistryService, RegistrySettings};
use super::resolver::Resolver;
use crate::config::{LinksConfig, StaticConfig, ValidationConfig};
use crate::errors::Result;
use crate::storage::{LinkRecord, LinkStats, LinkStore};
use crate::utils::{CodeGenerator, HostAllowList, HttpUrlPolicy, UrlPolicy};

// ============ Response DTOs ============

/// Result of `create_short_link`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLink {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub reused: bool,
}

/// `<base_url>/<path_prefix>/<code>` with exactly one slash at each join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrlBuilder {
    base_url: String,
    path_prefix: String,
}

impl ShortUrlBuilder {
    pub fn new(base_url: &str, path_prefix: &str) -> Self {
        let prefix = path_prefix.trim_matches('/');
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            path_prefix: if prefix.is_empty() {
                "/".to_string()
            } else {
                format!("/{}/", prefix)
            },
        }
    }

    pub fn build(&self, code: &str) -> String {
        format!("{}{}{}", self.base_url, self.path_prefix, code)
    }
}

impl From<&LinksConfig> for ShortUrlBuilder {
    fn from(config: &LinksConfig) -> Self {
        Self::new(&config.base_url, &config.path_prefix)
    }
}

/// Pick the URL policy for a deployment: an allow-list when hosts are
/// configured, otherwise any http(s) URL.
pub fn policy_from_config(config: &ValidationConfig) -> Arc<dyn UrlPolicy> {
    let allow_list = HostAllowList::new(&config.allowed_hosts);
    if allow_list.is_empty() {
        Arc::new(HttpUrlPolicy)
    } else {
        Arc::new(allow_list)
    }
}

// ============ LinkService Implementation ============

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    registry: RegistryService,
    resolver: Resolver,
    short_urls: ShortUrlBuilder,
}

impl LinkService {
    pub fn new(
        store: Arc<dyn LinkStore>,
        registry: RegistryService,
        resolver: Resolver,
        short_urls: ShortUrlBuilder,
    ) -> Self {
        Self {
            store,
            registry,
            resolver,
            short_urls,
        }
    }

    /// Wire the default generator and the configured URL policy.
    pub fn from_config(store: Arc<dyn LinkStore>, config: &StaticConfig) -> Self {
        let policy = policy_from_config(&config.validation);
        info!("URL policy: {}", policy.name());

        let registry = RegistryService::new(
            Arc::clone(&store),
            CodeGenerator::default(),
            policy,
            RegistrySettings::from(&config.links),
        );
        let resolver = Resolver::new(Arc::clone(&store));

        Self::new(
            store,
            registry,
            resolver,
            ShortUrlBuilder::from(&config.links),
        )
    }

    pub fn short_url_for(&self, code: &str) -> String {
        self.short_urls.build(code)
    }

    /// Get-or-create a short link for `long_url`.
    pub async fn create_short_link(&self, long_url: &str, attribution: &str) -> Result<CreatedLink> {
        let outcome = self.registry.get_or_create(long_url, attribution).await?;
        Ok(CreatedLink {
            short_url: self.short_url_for(&outcome.record.code),
            code: outcome.record.code,
            long_url: outcome.record.long_url,
            reused: outcome.reused,
        })
    }

    /// Target URL for a redirect; `NotFound` for unknown or disabled codes.
    pub async fn redirect_target(&self, code: &str) -> Result<String> {
        self.resolver.resolve(code).await
    }

    pub async fn disable_link(&self, code: &str, reason: Option<String>) -> Result<LinkRecord> {
        self.resolver.disable(code, reason).await
    }

    /// Raw record lookup, disabled records included.
    pub async fn get_link(&self, code: &str) -> Result<Option<LinkRecord>> {
        self.store.find_by_code(code).await
    }

    pub async fn list_links(&self, include_disabled: bool) -> Result<Vec<LinkRecord>> {
        let mut links = self.store.all().await?;
        if !include_disabled {
            links.retain(LinkRecord::is_active);
        }
        Ok(links)
    }

    pub async fn get_stats(&self) -> Result<LinkStats> {
        self.store.stats().await
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
