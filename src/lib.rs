//! Sharelink - short-link registry and resolution engine
//!
//! Maps long URLs to short, human-shareable codes and back.
//!
//! # Features
//! - **cli**: Command-line interface (default)
//!
//! # Architecture
//! - `utils`: code generation and URL canonicalization/policy
//! - `storage`: link records, the in-memory table and the store backends
//! - `services`: get-or-create registry, resolver, and the `LinkService` facade
//! - `config`: configuration loading (TOML + environment)
//! - `system`: logging setup
//! - `interfaces`: user interfaces (CLI)

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;

pub use errors::{Result, SharelinkError};
pub use services::{CreatedLink, LinkService};
