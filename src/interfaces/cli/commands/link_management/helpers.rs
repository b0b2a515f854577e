//! Helper functions for link management CLI commands

use colored::Colorize;

use crate::storage::LinkRecord;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// One-line summary used by `list`
pub fn format_link_line(record: &LinkRecord) -> String {
    let mut info_parts = vec![format!(
        "{} -> {}",
        record.code.cyan(),
        record.long_url.blue().underline()
    )];

    if record.access_count() > 0 {
        info_parts.push(
            format!("(accesses: {})", record.access_count())
                .dimmed()
                .cyan()
                .to_string(),
        );
    }

    if !record.is_active() {
        info_parts.push("[disabled]".dimmed().red().to_string());
    }

    info_parts.join(" ")
}

/// Multi-line detail block used by `show` and `disable`
pub fn format_link_details(record: &LinkRecord, short_url: &str) -> String {
    let status = if record.is_active() {
        "active".green()
    } else {
        "disabled".red()
    };

    let mut lines = vec![
        format!("  {:<14}{}", "Code:", record.code.cyan()),
        format!("  {:<14}{}", "Short URL:", short_url.bold()),
        format!("  {:<14}{}", "Target:", record.long_url.blue().underline()),
        format!("  {:<14}{}", "Status:", status),
        format!(
            "  {:<14}{}",
            "Created:",
            record.created_at.format(TIME_FORMAT)
        ),
        format!("  {:<14}{}", "Created by:", record.created_by),
        format!("  {:<14}{}", "Accesses:", record.access_count()),
    ];

    if let Some(last) = record.state.last_accessed_at() {
        lines.push(format!(
            "  {:<14}{}",
            "Last access:",
            last.format(TIME_FORMAT)
        ));
    }

    if let Some(reason) = record.state.disabled_reason() {
        lines.push(format!("  {:<14}{}", "Reason:", reason.yellow()));
    }

    lines.join("\n")
}
