//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use circle_build_core::health::HealthStatus;
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.len()));
    }

    /// Print an indented key-value line
    pub fn key_value(key: &str, value: &str) {
        println!("  {} {}", format!("{}:", key).dimmed(), value);
    }
}

/// Render a health status as a colored glyph plus label
pub fn health_glyph(status: HealthStatus) -> String {
    match status {
        HealthStatus::Healthy => format!("{} healthy", "✓".green()),
        HealthStatus::Degraded => format!("{} degraded", "⚠".yellow()),
        HealthStatus::Unhealthy => format!("{} unhealthy", "✗".red()),
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
