//! Create link command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn create_link(
    service: &LinkService,
    long_url: &str,
    created_by: &str,
) -> Result<(), CliError> {
    let created = service.create_short_link(long_url, created_by).await?;

    if created.reused {
        println!(
            "{} Existing short link reused: {}",
            "ℹ".bold().blue(),
            created.code.magenta()
        );
    } else {
        println!(
            "{} Created short link: {} -> {}",
            "✓".bold().green(),
            created.code.cyan(),
            created.long_url.blue().underline()
        );
    }
    println!("  {}", created.short_url.bold());

    Ok(())
}
