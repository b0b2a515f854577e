//! JSON document backend
//!
//! The whole link table lives in one document that is rewritten on every
//! mutation. Writes go to a uniquely named temporary file in the same
//! directory, are fsynced, then atomically renamed over the document.
//!
//! Readers load an immutable snapshot of the table; a mutation builds the
//! next snapshot under the write lock and publishes it only after the
//! document has been flushed, so no reader ever sees an unacknowledged
//! write.
//!
//! The write timeout is enforced inside the blocking write, right before the
//! rename: a write that misses its deadline deletes its temp file and never
//! replaces the document.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::retry::{self, RetryConfig};
use crate::config::StorageConfig;
use crate::errors::{Result, SharelinkError};
use crate::storage::table::LinkTable;
use crate::storage::{LinkDocument, LinkMutator, LinkRecord, LinkStats, LinkStore};

pub struct FileStore {
    file_path: PathBuf,
    snapshot: ArcSwap<LinkTable>,
    write_lock: Mutex<()>,
    /// 阻塞线程中的文件写入互斥，调用方被取消时也不会有两个写入并发
    io_lock: Arc<parking_lot::Mutex<()>>,
    retry_config: RetryConfig,
    write_timeout_ms: u64,
}

impl FileStore {
    /// Open (or bootstrap) the document described by `config`.
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        let file_path = PathBuf::from(&config.file_path);
        if file_path.as_os_str().is_empty() {
            return Err(SharelinkError::storage_config(
                "storage.file_path 未设置".to_string(),
            ));
        }

        let path = file_path.clone();
        let table = tokio::task::spawn_blocking(move || load_or_init(&path)).await??;

        info!(
            "FileStore initialized with {} short links from {}",
            table.len(),
            file_path.display()
        );

        Ok(FileStore {
            file_path,
            snapshot: ArcSwap::from_pointee(table),
            write_lock: Mutex::new(()),
            io_lock: Arc::new(parking_lot::Mutex::new(())),
            retry_config: RetryConfig {
                max_retries: config.retry_count,
                base_delay_ms: config.retry_base_delay_ms,
                max_delay_ms: config.retry_max_delay_ms,
            },
            write_timeout_ms: config.write_timeout_ms,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Run one serialized read-modify-write cycle.
    async fn commit<T, F>(&self, operation_name: &str, apply: F) -> Result<T>
    where
        F: FnOnce(&mut LinkTable) -> Result<T>,
    {
        let _guard = self.write_lock.lock().await;

        let mut next = LinkTable::clone(&self.snapshot.load());
        let output = apply(&mut next)?;

        let document = LinkDocument {
            links: next.records().to_vec(),
        };
        let bytes = Arc::new(serde_json::to_vec_pretty(&document)?);

        let path = self.file_path.clone();
        let timeout_ms = self.write_timeout_ms;
        retry::with_retry_timeout(
            operation_name,
            self.retry_config,
            timeout_ms,
            |deadline| {
                let path = path.clone();
                let bytes = Arc::clone(&bytes);
                let io_lock = Arc::clone(&self.io_lock);
                async move {
                    tokio::task::spawn_blocking(move || {
                        let _io = io_lock.lock();
                        write_atomically(&path, &bytes, Some((deadline, timeout_ms)))
                    })
                    .await
                    .map_err(io::Error::other)?
                }
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to persist link document: {}", e);
            if e.kind() == io::ErrorKind::TimedOut {
                SharelinkError::storage_timeout(format!("{}: {}", operation_name, e))
            } else {
                SharelinkError::file_operation(format!("写入链接文件失败: {}", e))
            }
        })?;

        self.snapshot.store(Arc::new(next));
        Ok(output)
    }
}

fn load_or_init(path: &Path) -> Result<LinkTable> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(LinkTable::default()),
        Ok(content) => {
            let document: LinkDocument = serde_json::from_str(&content).map_err(|e| {
                error!("Failed to parse link file: {}", e);
                SharelinkError::serialization(format!(
                    "Failed to parse link file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            LinkTable::from_records(document.links)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Link file not found, creating empty document");
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            let empty = serde_json::to_vec_pretty(&LinkDocument::default())?;
            write_atomically(path, &empty, None)?;
            info!("Created empty link file: {}", path.display());
            Ok(LinkTable::default())
        }
        Err(e) => Err(SharelinkError::file_operation(format!(
            "Failed to read link file {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write `bytes` to a sibling temp file, fsync it, then rename it over
/// `path`. A crash leaves either the old or the new document.
///
/// With a deadline, a write that is not ready to rename in time fails with
/// `TimedOut` and leaves `path` untouched. Once the rename happened the
/// write counts as done.
fn write_atomically(path: &Path, bytes: &[u8], deadline: Option<(Instant, u64)>) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("shortlinks.json");
    let tmp_path = dir.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    let staged = (|| {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        if let Some((deadline, timeout_ms)) = deadline
            && Instant::now() >= deadline
        {
            return Err(retry::deadline_exceeded(
                &format!("write {}", path.display()),
                timeout_ms,
            ));
        }
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = staged {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    // 重命名已生效，目录 fsync 失败只影响掉电场景
    if let Err(e) = sync_dir(&dir) {
        warn!("Failed to fsync directory {}: {}", dir.display(), e);
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[async_trait]
impl LinkStore for FileStore {
    async fn find_by_url(&self, long_url: &str) -> Result<Option<LinkRecord>> {
        Ok(self.snapshot.load().find_by_url(long_url).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>> {
        Ok(self.snapshot.load().find_by_code(code).cloned())
    }

    async fn code_exists(&self, code: &str) -> Result<bool> {
        Ok(self.snapshot.load().code_exists(code))
    }

    async fn insert(&self, record: LinkRecord) -> Result<()> {
        let code = record.code.clone();
        self.commit(&format!("insert({})", code), move |table| table.insert(record))
            .await?;
        debug!("Persisted new short link: {}", code);
        Ok(())
    }

    async fn update(&self, code: &str, mutator: LinkMutator) -> Result<LinkRecord> {
        self.commit(&format!("update({})", code), move |table| {
            table.update(code, mutator)
        })
        .await
    }

    async fn all(&self) -> Result<Vec<LinkRecord>> {
        Ok(self.snapshot.load().records().to_vec())
    }

    async fn stats(&self) -> Result<LinkStats> {
        Ok(self.snapshot.load().stats())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomically_replaces_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.json");

        write_atomically(&path, b"{\"links\":[]}", None).unwrap();
        write_atomically(&path, b"{\"links\":[1]}", None).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"links\":[1]}");
        // 不留下临时文件
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_past_deadline_keeps_old_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.json");
        write_atomically(&path, b"{\"links\":[]}", None).unwrap();

        let err = write_atomically(&path, b"{\"links\":[1]}", Some((Instant::now(), 0)))
            .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"links\":[]}");
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_load_or_init_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("shortlinks.json");

        let table = load_or_init(&path).unwrap();
        assert!(table.is_empty());

        let doc: LinkDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(doc.links.is_empty());
    }

    #[test]
    fn test_load_or_init_rejects_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_or_init(&path),
            Err(SharelinkError::Serialization(_))
        ));
        // 损坏的文件保持原样，不被覆盖
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
