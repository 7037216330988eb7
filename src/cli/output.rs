//! Terminal output: command results as tables or JSON, plus colored status lines
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::io::Write;

use clap::ValueEnum;
use colored::Colorize;
use itertools::Itertools;
use prettytable::{format, Cell, Row, Table};
use serde_json::{json, Value};

use crate::application::CommandOutput;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Render a single cell value.
///
/// Strings print bare, null is empty, lists print one element per line and
/// objects print as compact JSON.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(format_cell).join("\n"),
        Value::Object(_) => value.to_string(),
    }
}

/// Two-column `Field | Value` table of one record, keys sorted.
pub fn record_table(record: &Value) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![Cell::new("Field"), Cell::new("Value")]));
    if let Some(fields) = record.as_object() {
        for (key, value) in fields.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            table.add_row(Row::new(vec![
                Cell::new(key),
                Cell::new(&format_cell(value)),
            ]));
        }
    }
    table
}

/// Table of records under the given columns; missing fields render empty.
pub fn list_table(columns: &[String], rows: &[Value]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(columns.iter().map(|c| Cell::new(c)).collect()));
    for row in rows {
        table.add_row(Row::new(
            columns
                .iter()
                .map(|column| {
                    let cell = row.get(column).map(format_cell).unwrap_or_default();
                    Cell::new(&cell)
                })
                .collect(),
        ));
    }
    table
}

/// JSON document for a command result; lists keep every field of each record.
pub fn to_json(output: &CommandOutput) -> Value {
    match output {
        CommandOutput::Message(message) => json!({ "message": message }),
        CommandOutput::Record { record, .. } => record.clone(),
        CommandOutput::Table { rows, .. } => Value::Array(rows.clone()),
    }
}

/// Write a command result in the requested format.
pub fn render(
    out: &mut dyn Write,
    output: &CommandOutput,
    output_format: OutputFormat,
) -> std::io::Result<()> {
    if output_format == OutputFormat::Json {
        let text = serde_json::to_string_pretty(&to_json(output))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        return writeln!(out, "{}", text);
    }

    match output {
        CommandOutput::Message(message) => writeln!(out, "{}", message),
        CommandOutput::Record { title, record } => {
            if let Some(title) = title {
                writeln!(out, "{}", title)?;
            }
            record_table(record).print(out).map(|_| ())
        }
        CommandOutput::Table { columns, rows } => {
            list_table(columns, rows).print(out).map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(output: &CommandOutput, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        render(&mut buf, output, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn given_scalar_values_when_formatting_then_renders_plainly() {
        assert_eq!(format_cell(&json!(null)), "");
        assert_eq!(format_cell(&json!("abc")), "abc");
        assert_eq!(format_cell(&json!(true)), "True");
        assert_eq!(format_cell(&json!(65000)), "65000");
    }

    #[test]
    fn given_nested_values_when_formatting_then_lists_lines_and_objects_json() {
        assert_eq!(format_cell(&json!(["net-1", "net-2"])), "net-1\nnet-2");
        assert_eq!(format_cell(&json!({"hold_time": "90"})), r#"{"hold_time":"90"}"#);
    }

    #[test]
    fn given_message_when_rendering_table_then_prints_line() {
        let output = CommandOutput::Message("Deleted tunnelzone: tz-1".into());
        assert_eq!(
            rendered(&output, OutputFormat::Table),
            "Deleted tunnelzone: tz-1\n"
        );
    }

    #[test]
    fn given_record_when_rendering_table_then_title_and_sorted_fields() {
        let output = CommandOutput::Record {
            title: Some("Created a new tunnelzone:".into()),
            record: json!({"name": "tz", "id": "tz-1"}),
        };
        let text = rendered(&output, OutputFormat::Table);
        assert!(text.starts_with("Created a new tunnelzone:\n"));
        let id_pos = text.find("tz-1").unwrap();
        let name_pos = text.find("name").unwrap();
        assert!(id_pos < name_pos, "fields should be sorted:\n{text}");
    }

    #[test]
    fn given_rows_when_rendering_json_then_prints_full_records() {
        let output = CommandOutput::Table {
            columns: vec!["id".into(), "peer".into()],
            rows: vec![json!({"id": "p1", "peer": "10.0.0.1", "password": "x"})],
        };
        let value: Value =
            serde_json::from_str(&rendered(&output, OutputFormat::Json)).unwrap();
        assert_eq!(
            value,
            json!([{"id": "p1", "peer": "10.0.0.1", "password": "x"}])
        );
    }

    #[test]
    fn given_missing_column_when_rendering_table_then_cell_is_empty() {
        let table = list_table(&["id".into(), "nexthop".into()], &[json!({"id": "ri-1"})]);
        let text = table.to_string();
        assert!(text.contains("ri-1"));
        assert!(text.contains("nexthop"));
    }
}
