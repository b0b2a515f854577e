//! CLI interface module
//!
//! Dispatches parsed commands to the link service and prints the results.

pub mod commands;

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::SharelinkError;
use crate::services::LinkService;
use crate::storage::StorageFactory;
use commands::{
    config_generate, create_link, disable_link, list_links, resolve_link, show_link, show_stats,
};

#[derive(Debug)]
pub enum CliError {
    /// Error reported by the link services
    Service(SharelinkError),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::Service(err) => err.format_simple(),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::Service(err) => err.format_colored(),
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<SharelinkError> for CliError {
    fn from(err: SharelinkError) -> Self {
        CliError::Service(err)
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: Arc<StaticConfig>) -> Result<(), CliError> {
    // Generate doesn't need storage, handle it separately
    if let Commands::Config { action } = cmd {
        let ConfigCommands::Generate { output_path, force } = action;
        return config_generate(output_path, force).await;
    }

    let store = StorageFactory::create(&config.storage).await?;
    let service = LinkService::from_config(store, &config);

    match cmd {
        Commands::Create { url, created_by } => {
            let attribution = created_by.unwrap_or_else(|| config.links.default_created_by.clone());
            create_link(&service, &url, &attribution).await
        }
        Commands::Resolve { code } => resolve_link(&service, &code).await,
        Commands::Show { code } => show_link(&service, &code).await,
        Commands::List { all } => list_links(&service, all).await,
        Commands::Disable { code, reason } => disable_link(&service, &code, reason).await,
        Commands::Stats => show_stats(&service).await,
        Commands::Config { .. } => unreachable!("handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_keeps_message() {
        let err = CliError::from(SharelinkError::not_found("Short link not found: abcd"));
        assert_eq!(
            err.to_string(),
            "Resource Not Found: Short link not found: abcd"
        );
    }

    #[test]
    fn test_command_error_format() {
        let err = CliError::CommandError("boom".to_string());
        assert_eq!(err.format_simple(), "Command error: boom");
    }
}
