use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use sharelink::cli::Cli;
use sharelink::config::{StaticConfig, init_config};
use sharelink::interfaces::cli::run_cli_command;
use sharelink::system::init_logging;

/// An explicit `--config` must exist and parse; the implicit default path
/// may be missing, in which case defaults apply.
fn load_config(path: Option<&str>) -> Result<Arc<StaticConfig>> {
    if let Some(path) = path {
        anyhow::ensure!(
            Path::new(path).exists(),
            "Configuration file not found: {}",
            path
        );
        StaticConfig::try_load(path)
            .with_context(|| format!("Invalid configuration file: {}", path))?;
    }
    Ok(init_config(path))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
            process::exit(1);
        }
    };

    // guard 必须存活到退出前，否则缓冲的日志会丢失
    let log_guard = init_logging(&config.logging);
    debug!("Running command: {:?}", cli.command);

    if let Err(e) = run_cli_command(cli.command, config).await {
        eprintln!("{}", e.format_colored());
        drop(log_guard);
        process::exit(1);
    }
}
