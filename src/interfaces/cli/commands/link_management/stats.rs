//! Stats command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn show_stats(service: &LinkService) -> Result<(), CliError> {
    let stats = service.get_stats().await?;

    println!(
        "{} ({} backend)",
        "Link statistics:".bold().green(),
        service.backend_name()
    );
    println!("  {:<14}{}", "Total:", stats.total.to_string().cyan());
    println!("  {:<14}{}", "Active:", stats.active.to_string().green());
    println!("  {:<14}{}", "Disabled:", stats.disabled.to_string().red());
    println!("  {:<14}{}", "Accesses:", stats.total_access.to_string().cyan());
    Ok(())
}
