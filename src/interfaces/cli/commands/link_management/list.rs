//! List links command

use colored::Colorize;

use super::helpers::format_link_line;
use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn list_links(service: &LinkService, include_disabled: bool) -> Result<(), CliError> {
    let links = service.list_links(include_disabled).await?;

    if links.is_empty() {
        println!("{} No short links found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Short link list:".bold().green());
    println!();
    for record in &links {
        println!("  {}", format_link_line(record));
    }
    println!();
    println!(
        "{} Total {} short links",
        "ℹ".bold().blue(),
        links.len().to_string().green()
    );
    Ok(())
}
