//! Terminal and JSON output for the CLI.
//!
//! In `--json` mode only machine-readable payloads and errors are printed;
//! every decorative line is suppressed.

use console::{style, StyledObject};
use pharma_commerce::checkout::OrderStatus;
use serde::Serialize;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn stdout(&self, marker: StyledObject<&str>, msg: &str) {
        if !self.json {
            println!("{} {}", marker, msg);
        }
    }

    pub fn info(&self, msg: &str) {
        self.stdout(style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.stdout(style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        if !self.json {
            eprintln!("{} {}", style("⚠").yellow(), msg);
        }
    }

    /// Print an error. In JSON mode this is an `{"error": ...}` object on stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Print a detail line, only with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose && !self.json {
            eprintln!("{} {}", style("→").dim(), style(msg).dim());
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Print a payload as pretty JSON.
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::warn!(error = %e, "failed to serialize output"),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.json {
            println!("  {} {}", style("•").dim(), item);
        }
    }

    /// Print bold column titles padded to `widths`.
    pub fn table_header(&self, cols: &[&str], widths: &[usize]) {
        if !self.json {
            println!("  {}", style(pad_columns(cols, widths)).bold());
        }
    }

    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if !self.json {
            println!("  {}", pad_columns(cols, widths));
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn pad_columns(cols: &[&str], widths: &[usize]) -> String {
    cols.iter()
        .zip(widths)
        .map(|(col, width)| format!("{:width$}", col, width = width))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Colored badge for an order status.
pub fn status_badge(status: &OrderStatus) -> String {
    let label = status.display_name();
    match status {
        OrderStatus::Delivered => style(label).green().to_string(),
        OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Shipped => {
            style(label).yellow().to_string()
        }
        OrderStatus::Cancelled => style(label).red().to_string(),
        OrderStatus::Other(_) => label.to_string(),
    }
}

/// Marker shown next to hot products in listings.
pub fn hot_badge(is_hot: bool) -> String {
    if is_hot {
        style("HOT").red().bold().to_string()
    } else {
        String::new()
    }
}
