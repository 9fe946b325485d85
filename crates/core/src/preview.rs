//! Tabular previews returned by the server.
//!
//! Two shapes arrive over the wire:
//! - `data`: an array of row objects. Columns are the first row's keys, in
//!   the order the server sent them.
//! - `excel_data`: sheet name → array of rows, each row an array of cells.

use serde::Serialize;
use serde_json::Value;

/// A header + rows table built from an array of JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One sheet of a processed workbook, as raw cell rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetPreview {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl PreviewTable {
    /// Build from row objects. Keys missing from a later row render empty;
    /// keys the first row lacks are dropped.
    pub fn from_records(records: &[Value]) -> Self {
        let columns: Vec<String> = records
            .first()
            .and_then(Value::as_object)
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|col| record.get(col).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as an HTML `<table>` with a header row.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<table>\n  <thead>\n    <tr>");
        for col in &self.columns {
            out.push_str("<th>");
            out.push_str(&escape_html(col));
            out.push_str("</th>");
        }
        out.push_str("</tr>\n  </thead>\n  <tbody>\n");
        for row in &self.rows {
            out.push_str("    <tr>");
            for cell in row {
                out.push_str("<td>");
                out.push_str(&escape_html(cell));
                out.push_str("</td>");
            }
            out.push_str("</tr>\n");
        }
        out.push_str("  </tbody>\n</table>\n");
        out
    }
}

impl SheetPreview {
    /// Build every sheet from an `excel_data` object. Non-array entries are skipped.
    pub fn from_excel_data(value: &Value) -> Vec<Self> {
        let Some(obj) = value.as_object() else {
            return Vec::new();
        };
        obj.iter()
            .filter_map(|(name, rows)| {
                let rows = rows
                    .as_array()?
                    .iter()
                    .map(|row| match row.as_array() {
                        Some(cells) => cells.iter().map(cell_text).collect(),
                        None => vec![cell_text(row)],
                    })
                    .collect();
                Some(SheetPreview { name: name.clone(), rows })
            })
            .collect()
    }
}

/// Display text for a JSON cell. Null renders empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
