//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for sharelink using clap's derive macros.

use clap::{Parser, Subcommand};

/// Sharelink - short-link registry and resolver
#[derive(Parser, Debug)]
#[command(name = "sharelink")]
#[command(version)]
#[command(about = "Create, resolve and audit short links", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Get or create the short link for a URL
    Create {
        /// Long URL to shorten
        url: String,

        /// Attribution tag recorded on new links
        #[arg(long = "by")]
        created_by: Option<String>,
    },

    /// Resolve a short code to its target (counts as an access)
    Resolve {
        /// Short code to resolve
        code: String,
    },

    /// Show the stored record for a short code, disabled or not
    Show {
        /// Short code to inspect
        code: String,
    },

    /// List short links
    List {
        /// Include disabled links
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Disable a short link (irreversible)
    Disable {
        /// Short code to disable
        code: String,

        /// Reason kept on the record
        #[arg(long)]
        reason: Option<String>,
    },

    /// Show link statistics
    Stats,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate an example configuration file
    Generate {
        /// Output file path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite without asking
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_with_attribution() {
        let cli = Cli::try_parse_from([
            "sharelink",
            "create",
            "https://mapzamurai.com/?id=1",
            "--by",
            "bob",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Commands::Create {
                url: "https://mapzamurai.com/?id=1".to_string(),
                created_by: Some("bob".to_string()),
            }
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["sharelink", "list", "--all", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
        assert_eq!(cli.command, Commands::List { all: true });
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["sharelink"]).is_err());
    }
}
