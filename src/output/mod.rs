//
//  octane-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Formats command results for the terminal:
//!
//! - **JSON format** (default): machine-readable output for scripting
//! - **Table format**: human-readable tables of entities
//!
//! ## Architecture
//!
//! - [`table`]: Table formatting utilities using `comfy_table`
//! - [`json`]: JSON serialization utilities using `serde_json`
//!
//! Status messages (errors, warnings, success lines) go through
//! [`OutputWriter`] so colors are applied consistently.

pub mod json;
pub mod table;

pub use json::*;
pub use table::*;

use serde::Serialize;

use crate::api::{BulkReport, ChunkOutcome, FieldSet, Normalized};

/// Output formats supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Single-line JSON
    Compact,
    /// Terminal table
    Table,
}

/// Writes command results in the selected format.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes any serializable value. Table format falls back to JSON.
    pub fn write<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Compact => write_json_compact(value),
            OutputFormat::Json | OutputFormat::Table => write_json(value),
        }
    }

    /// Writes read results, using `fields` as table columns.
    pub fn write_entities(&self, entities: &Normalized, fields: &FieldSet) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => {
                let rows = match entities {
                    Normalized::One(entity) => std::slice::from_ref(entity),
                    Normalized::Many(list) => list.as_slice(),
                };
                println!("{}", entity_table(rows, fields.iter(), self.color));
                Ok(())
            }
            _ => self.write(entities),
        }
    }

    /// Writes a bulk create report.
    pub fn write_report(&self, report: &BulkReport) -> anyhow::Result<()> {
        if self.format != OutputFormat::Table {
            return self.write(report);
        }

        let mut builder = TableBuilder::new()
            .color(self.color)
            .headers(["chunk", "status", "attempts", "detail"]);
        for outcome in report.outcomes() {
            let (status, detail) = match outcome {
                ChunkOutcome::Created { entities, .. } => {
                    ("created", format!("{} entities", entities.len()))
                }
                ChunkOutcome::Failed { error, .. } => ("failed", error.to_string()),
            };
            builder = builder.row([
                outcome.index().to_string(),
                status.to_string(),
                outcome.attempts().to_string(),
                detail,
            ]);
        }
        builder.print();
        Ok(())
    }

    /// Success lines go to stderr so stdout stays parseable.
    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("✓").green().bold(), msg);
        } else {
            eprintln!("✓ {}", msg);
        }
    }
}
