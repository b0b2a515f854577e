//! Resolver 集成测试
//!
//! 覆盖访问计数、禁用后的不可见性、禁用的幂等性以及计数失败时仍然跳转。

use std::sync::Arc;

use async_trait::async_trait;
use sharelink::errors::{Result, SharelinkError};
use sharelink::services::Resolver;
use sharelink::storage::{LinkMutator, LinkRecord, LinkState, LinkStats, LinkStore, MemoryStore};

fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStore::with_records(vec![
            LinkRecord::new("Kx9Q", "https://mapzamurai.com/?id=1", "tester"),
            LinkRecord::new("Ab3d", "https://mapzamurai.com/?id=2", "tester"),
        ])
        .unwrap(),
    )
}

/// Store whose updates always time out; reads work normally.
struct StuckWriteStore {
    inner: MemoryStore,
}

#[async_trait]
impl LinkStore for StuckWriteStore {
    async fn find_by_url(&self, long_url: &str) -> Result<Option<LinkRecord>> {
        self.inner.find_by_url(long_url).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>> {
        self.inner.find_by_code(code).await
    }

    async fn code_exists(&self, code: &str) -> Result<bool> {
        self.inner.code_exists(code).await
    }

    async fn insert(&self, record: LinkRecord) -> Result<()> {
        self.inner.insert(record).await
    }

    async fn update(&self, code: &str, _mutator: LinkMutator) -> Result<LinkRecord> {
        Err(SharelinkError::storage_timeout(format!("update({})", code)))
    }

    async fn all(&self) -> Result<Vec<LinkRecord>> {
        self.inner.all().await
    }

    async fn stats(&self) -> Result<LinkStats> {
        self.inner.stats().await
    }

    fn backend_name(&self) -> &'static str {
        "stuck"
    }
}

mod resolve_tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_returns_target_and_counts() {
        let store = seeded_store();
        let resolver = Resolver::new(store.clone());

        for _ in 0..3 {
            assert_eq!(
                resolver.resolve("Kx9Q").await.unwrap(),
                "https://mapzamurai.com/?id=1"
            );
        }

        let record = store.find_by_code("Kx9Q").await.unwrap().unwrap();
        assert_eq!(record.access_count(), 3);
        assert!(record.state.last_accessed_at().is_some());

        // 其他记录不受影响
        let other = store.find_by_code("Ab3d").await.unwrap().unwrap();
        assert_eq!(other.access_count(), 0);
        assert!(other.state.last_accessed_at().is_none());
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_codes_are_not_found() {
        let resolver = Resolver::new(seeded_store());

        for code in ["ZZZZ", "", "O0Il", "../etc/passwd", "Kx9Q?x=1"] {
            assert!(
                matches!(
                    resolver.resolve(code).await,
                    Err(SharelinkError::NotFound(_))
                ),
                "expected not found for {:?}",
                code
            );
        }
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let resolver = Resolver::new(seeded_store());
        assert!(resolver.resolve("kx9q").await.is_err());
    }

    #[tokio::test]
    async fn test_update_failure_still_redirects() {
        let store = Arc::new(StuckWriteStore {
            inner: MemoryStore::with_records(vec![LinkRecord::new(
                "Kx9Q",
                "https://mapzamurai.com/?id=1",
                "tester",
            )])
            .unwrap(),
        });
        let resolver = Resolver::new(store.clone());

        assert_eq!(
            resolver.resolve("Kx9Q").await.unwrap(),
            "https://mapzamurai.com/?id=1"
        );
        let record = store.find_by_code("Kx9Q").await.unwrap().unwrap();
        assert_eq!(record.access_count(), 0);
    }
}

mod disable_tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_code_is_indistinguishable_from_unknown() {
        let store = seeded_store();
        let resolver = Resolver::new(store.clone());

        resolver
            .disable("Kx9Q", Some("reported".to_string()))
            .await
            .unwrap();
        let disabled_err = resolver.resolve("Kx9Q").await.unwrap_err();

        let empty = Resolver::new(Arc::new(MemoryStore::new()));
        let unknown_err = empty.resolve("Kx9Q").await.unwrap_err();

        assert_eq!(disabled_err, unknown_err);
        assert_eq!(disabled_err.format_simple(), unknown_err.format_simple());
    }

    #[tokio::test]
    async fn test_disabled_code_is_not_counted() {
        let store = seeded_store();
        let resolver = Resolver::new(store.clone());

        resolver.resolve("Kx9Q").await.unwrap();
        resolver.disable("Kx9Q", None).await.unwrap();
        let _ = resolver.resolve("Kx9Q").await;

        let record = store.find_by_code("Kx9Q").await.unwrap().unwrap();
        assert!(!record.is_active());
        assert_eq!(record.access_count(), 1);
    }

    #[tokio::test]
    async fn test_disable_is_idempotent_and_keeps_first_reason() {
        let store = seeded_store();
        let resolver = Resolver::new(store.clone());

        let first = resolver
            .disable("Kx9Q", Some("spam".to_string()))
            .await
            .unwrap();
        let second = resolver
            .disable("Kx9Q", Some("other".to_string()))
            .await
            .unwrap();

        assert_eq!(first.state.disabled_reason(), Some("spam"));
        assert_eq!(second.state.disabled_reason(), Some("spam"));
        assert_eq!(store.stats().await.unwrap().disabled, 1);
    }

    #[tokio::test]
    async fn test_blank_reason_is_dropped() {
        let resolver = Resolver::new(seeded_store());
        let record = resolver
            .disable("Ab3d", Some("   ".to_string()))
            .await
            .unwrap();
        assert!(record.state.is_disabled());
        assert_eq!(record.state.disabled_reason(), None);
    }

    #[tokio::test]
    async fn test_disable_unknown_code() {
        let resolver = Resolver::new(seeded_store());
        assert!(matches!(
            resolver.disable("ZZZZ", None).await,
            Err(SharelinkError::NotFound(_))
        ));
    }

    #[test]
    fn test_disabled_state_cannot_be_reversed() {
        let mut state = LinkState::default();
        assert!(state.disable(Some("spam".to_string())));
        assert!(!state.disable(None));
        assert!(state.is_disabled());
        assert_eq!(state.disabled_reason(), Some("spam"));
    }
}
