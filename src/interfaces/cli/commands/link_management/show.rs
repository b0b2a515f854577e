//! Show link command

use colored::Colorize;

use super::helpers::format_link_details;
use crate::errors::SharelinkError;
use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn show_link(service: &LinkService, code: &str) -> Result<(), CliError> {
    let record = service
        .get_link(code)
        .await?
        .ok_or_else(|| SharelinkError::not_found(format!("Short link not found: {}", code)))?;

    println!("{}", "Short link:".bold().green());
    println!("{}", format_link_details(&record, &service.short_url_for(&record.code)));
    Ok(())
}
