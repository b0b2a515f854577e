//! Storage backends
//!
//! - `file`: single JSON document, atomic rewrite-and-rename (durable)
//! - `memory`: process-local table (tests, ephemeral deployments)

mod file;
mod memory;
pub mod retry;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::errors::{Result, SharelinkError};

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> Result<&'static str> {
    match backend.trim().to_lowercase().as_str() {
        "file" | "json" => Ok("file"),
        "memory" | "mem" => Ok("memory"),
        other => Err(SharelinkError::storage_config(format!(
            "Unknown storage backend: '{}'. Supported: file, memory",
            other
        ))),
    }
}
