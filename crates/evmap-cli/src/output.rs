//! Output formatting for evmap (table, json, csv)

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a summary line below a table (table format, not quiet)
    pub fn summary(&self, msg: &str) {
        if !self.quiet && self.format == OutputFormat::Table {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print a warning message
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    let table = Table::new(data).to_string();
                    println!("{}", table);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
            OutputFormat::Csv => {
                for line in csv_lines(data) {
                    println!("{}", line);
                }
            }
        }
    }
}

/// Render rows as CSV, header first, columns in declaration order
fn csv_lines<T: Tabled>(data: &[T]) -> Vec<String> {
    if data.is_empty() {
        return Vec::new();
    }

    let header = T::headers()
        .iter()
        .map(|h| escape_csv(h))
        .collect::<Vec<_>>()
        .join(",");

    std::iter::once(header)
        .chain(data.iter().map(|row| {
            row.fields()
                .iter()
                .map(|v| escape_csv(v))
                .collect::<Vec<_>>()
                .join(",")
        }))
        .collect()
}

/// Escape a value for CSV output
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Chargepoint display for status command
#[derive(Debug, Tabled, Serialize)]
pub struct ChargepointRow {
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    pub plug_type: String,
    #[tabled(rename = "Power (kW)")]
    pub power: f64,
    #[tabled(rename = "Count")]
    pub count: u32,
    #[tabled(rename = "Available")]
    pub available: usize,
    #[tabled(rename = "Charging")]
    pub charging: usize,
    #[tabled(rename = "Occupied")]
    pub occupied: usize,
    #[tabled(rename = "Faulted")]
    pub faulted: usize,
    #[tabled(rename = "Unknown")]
    pub unknown: usize,
}

/// Connector assignment display for match command
#[derive(Debug, Tabled, Serialize)]
pub struct MatchRow {
    #[tabled(rename = "Chargepoint")]
    pub chargepoint: String,
    #[tabled(rename = "Connectors")]
    pub connectors: String,
}

/// Detector display for detectors command
#[derive(Debug, Tabled, Serialize)]
pub struct DetectorRow {
    #[tabled(rename = "Priority")]
    pub priority: usize,
    #[tabled(rename = "Name")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("Typ2"), "Typ2");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_lines_keep_column_order() {
        let rows = vec![
            DetectorRow {
                priority: 1,
                name: "newmotion".to_string(),
            },
            DetectorRow {
                priority: 2,
                name: "SW Kiel, Stadtwerke".to_string(),
            },
        ];

        assert_eq!(
            csv_lines(&rows),
            vec![
                "Priority,Name".to_string(),
                "1,newmotion".to_string(),
                "2,\"SW Kiel, Stadtwerke\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_csv_lines_empty() {
        assert!(csv_lines::<MatchRow>(&[]).is_empty());
    }
}
