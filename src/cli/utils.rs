//! Shared utilities for CLI commands

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::error::CliResult;
use crate::db::EpochMillis;
use crate::db::utils::format_millis;

/// Truncate a string with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional timestamp for display
pub fn format_optional_millis(ts: Option<EpochMillis>) -> String {
    ts.map(format_millis).unwrap_or_else(|| "-".to_string())
}

/// Check mark for true, blank for false
pub fn check(flag: bool) -> String {
    if flag { "✓".to_string() } else { String::new() }
}

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}

/// Render records as pretty JSON or as a table of their display rows.
pub fn render<'a, T, D>(items: &'a [T], format: &str, empty: &str) -> CliResult<String>
where
    T: Serialize,
    D: Tabled + From<&'a T>,
{
    if format == "json" {
        return Ok(serde_json::to_string_pretty(items)?);
    }
    if items.is_empty() {
        return Ok(empty.to_string());
    }

    let rows: Vec<D> = items.iter().map(D::from).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    Ok(table.to_string())
}
