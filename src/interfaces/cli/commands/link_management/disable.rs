//! Disable link command

use colored::Colorize;

use super::helpers::format_link_details;
use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn disable_link(
    service: &LinkService,
    code: &str,
    reason: Option<String>,
) -> Result<(), CliError> {
    let record = service.disable_link(code, reason).await?;

    println!("{} Disabled short link: {}", "✓".bold().green(), code.cyan());
    println!("{}", format_link_details(&record, &service.short_url_for(&record.code)));
    Ok(())
}
