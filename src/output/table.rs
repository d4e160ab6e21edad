//
//  octane-cli
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Renders entities as terminal tables using the `comfy_table` crate. Each
//! requested field becomes a column; nested values are summarized so a
//! relationship shows as its name or id rather than raw JSON.
//!
//! ## Example
//!
//! ```rust,ignore
//! use octane_cli::output::table::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(["id", "name"])
//!     .row(["1001", "Login fails"])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde_json::Value;

use crate::api::Entity;

/// Creates a table with the CLI's standard styling.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Builder for simple header + rows tables.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let color = self.color;
        let cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| {
                let header: String = h.into();
                let cell = Cell::new(header);
                if color {
                    cell.fg(Color::Cyan)
                } else {
                    cell
                }
            })
            .collect();
        self.table.set_header(cells);
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    pub fn print(self) {
        println!("{}", self.table);
    }

    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a table of `entities` with one column per name in `columns`.
pub fn entity_table<'a>(
    entities: &[Entity],
    columns: impl IntoIterator<Item = &'a str>,
    color: bool,
) -> Table {
    let columns: Vec<&str> = columns.into_iter().collect();
    let mut builder = TableBuilder::new().color(color).headers(columns.iter().copied());
    for entity in entities {
        builder = builder.row(
            columns
                .iter()
                .map(|column| entity.get(*column).map(cell_text).unwrap_or_default()),
        );
    }
    builder.build()
}

/// Short text for a field value.
///
/// References print their `name` (or `id`), lists of references are joined
/// with `, `, and anything else falls back to compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Object(obj) => obj
            .get("name")
            .or_else(|| obj.get("id"))
            .map(cell_text)
            .unwrap_or_else(|| value.to_string()),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!("Open")), "Open");
        assert_eq!(cell_text(&json!(3)), "3");
        assert_eq!(cell_text(&json!({"type": "phase", "id": "phase.new"})), "phase.new");
        assert_eq!(cell_text(&json!({"id": "1", "name": "Team A"})), "Team A");
        assert_eq!(cell_text(&json!([{"name": "a"}, {"name": "b"}])), "a, b");
        assert_eq!(cell_text(&json!({"type": "x"})), "{\"type\":\"x\"}");
    }

    #[test]
    fn test_entity_table_fills_missing_cells() {
        let entities = vec![
            json!({"id": "1", "name": "first"}).as_object().cloned().unwrap(),
            json!({"id": "2"}).as_object().cloned().unwrap(),
        ];
        let rendered = entity_table(&entities, ["id", "name"], false).to_string();
        assert!(rendered.contains("first"));
        assert!(rendered.contains('2'));
    }
}
