//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use guardian_lib::{IssueKind, ResourceState};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a rounded table
pub fn print_table<I, T>(rows: I)
where
    I: IntoIterator<Item = T>,
    T: tabled::Tabled,
{
    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);
}

/// Print a section heading
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(50));
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format currency in USD
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Color a resource state
pub fn color_state(state: ResourceState) -> String {
    let text = state.to_string();
    match state {
        ResourceState::Running => text.green().to_string(),
        ResourceState::Stopped => text.yellow().to_string(),
        ResourceState::Terminated => text.red().to_string(),
    }
}

/// Color an optimization issue
pub fn color_issue(issue: IssueKind) -> String {
    let text = issue.to_string();
    match issue {
        IssueKind::OverProvisioned => text.red().to_string(),
        IssueKind::Idle => text.yellow().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(250.0), "$250.00");
        assert_eq!(format_currency(0.5), "$0.50");
    }

    #[test]
    fn test_color_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(color_state(ResourceState::Running), "running");
        assert_eq!(color_issue(IssueKind::Idle), "Ideally Idle");
    }
}
