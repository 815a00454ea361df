//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use optimizer_lib::{Action, AnomalySeverity, Confidence};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an error message
#[allow(dead_code)]
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Format a monthly dollar amount; negatives are cost increases
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

/// Format a unix timestamp as a date for display
pub fn format_timestamp(timestamp: i64) -> String {
    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => timestamp.to_string(),
    }
}

/// Color an action by its cost impact
pub fn color_action(action: Action) -> String {
    let text = action.to_string();
    match action {
        Action::RightsizeDown | Action::DeleteUnused => text.green().to_string(),
        Action::ScheduleOffHours => text.cyan().to_string(),
        Action::RightsizeUp => text.yellow().to_string(),
        Action::PurchaseCommitment => text.blue().to_string(),
        Action::NoAction => text.dimmed().to_string(),
    }
}

/// Color confidence based on level
pub fn color_confidence(confidence: Confidence) -> String {
    let text = confidence.to_string();
    match confidence {
        Confidence::High => text.green().to_string(),
        Confidence::Medium => text.yellow().to_string(),
        Confidence::Low => text.red().to_string(),
    }
}

/// Color anomaly severity
pub fn color_severity(severity: AnomalySeverity) -> String {
    match severity {
        AnomalySeverity::Warning => "warning".yellow().to_string(),
        AnomalySeverity::High => "high".red().to_string(),
        AnomalySeverity::Critical => "critical".red().bold().to_string(),
    }
}
