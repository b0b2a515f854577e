//! Link management commands
//!
//! This module provides CLI commands for creating, resolving and auditing
//! short links.

mod create;
mod disable;
mod helpers;
mod list;
mod resolve;
mod show;
mod stats;

pub use create::create_link;
pub use disable::disable_link;
pub use list::list_links;
pub use resolve::resolve_link;
pub use show::show_link;
pub use stats::show_stats;
