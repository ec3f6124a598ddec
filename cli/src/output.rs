//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use event_forms::ErrorMap;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print `data` as JSON/YAML, or the rows built by `rows` as a table.
    pub fn print<T, R, F>(&self, data: &T, rows: F)
    where
        T: Serialize,
        R: Tabled,
        F: FnOnce() -> Vec<R>,
    {
        match self {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
            OutputFormat::Table => {
                let rows = rows();
                if rows.is_empty() {
                    println!("{}", "(none)".dimmed());
                } else {
                    println!("{}", Table::new(rows).with(Style::rounded()));
                }
            }
        }
    }
}

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".green().bold(), message.as_ref());
}

pub fn error_banner(error: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), error);
}

/// The consolidated validation list, one line per field.
pub fn field_errors(errors: &ErrorMap) {
    eprintln!("{}", "Some fields need your attention:".red().bold());
    for e in errors.iter() {
        eprintln!("  {} {}", format!("{}:", e.field).yellow(), e.message);
    }
}
