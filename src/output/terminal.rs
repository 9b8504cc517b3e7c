//! Terminal rendering of responses.
//!
//! `json` and `pretty` print the response body as is; `table` prints lists
//! of records as quoted, right-aligned CSV columns.

use crate::service::Response;
use serde_json::{Map, Value};
use std::fmt::Display;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Compact JSON body.
    #[default]
    Json,
    /// Indented JSON body.
    Pretty,
    /// CSV-style table of the data.
    Table,
}

/// Format a value as a quoted, right-aligned CSV field.
///
/// Embedded double quotes are doubled.
pub fn format_field<T: Display>(value: T, width: usize) -> String {
    let escaped = value.to_string().replace('"', "\"\"");
    let quoted = format!("\"{escaped}\"");
    format!("{quoted:>width$}")
}

/// Plain text of a JSON value: strings unquoted, everything else as JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn render_rows(rows: &[&Map<String, Value>]) -> String {
    let headers: Vec<&String> = rows.first().map(|r| r.keys().collect()).unwrap_or_default();
    let widths: Vec<usize> = headers
        .iter()
        .map(|h| {
            rows.iter()
                .map(|r| r.get(*h).map(cell).unwrap_or_default().len())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
                + 2
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format_field(h, *w))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        lines.push(
            headers
                .iter()
                .zip(&widths)
                .map(|(h, w)| format_field(row.get(*h).map(cell).unwrap_or_default(), *w))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

fn render_table(data: &Value) -> String {
    match data {
        Value::Array(items) => {
            let rows: Vec<&Map<String, Value>> =
                items.iter().filter_map(Value::as_object).collect();
            if !rows.is_empty() && rows.len() == items.len() {
                render_rows(&rows)
            } else {
                items.iter().map(cell).collect::<Vec<_>>().join("\n")
            }
        }
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}: {}", cell(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => cell(other),
    }
}

/// Render a response for the terminal.
pub fn render(response: &Response, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => response.body.to_string(),
        OutputFormat::Pretty => format!("{:#}", response.body),
        OutputFormat::Table => match response.body.get("error") {
            Some(error) => format!(
                "error [{}]: {}",
                response.body.get("kind").map(cell).unwrap_or_default(),
                cell(error)
            ),
            None => render_table(&response.body["data"]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: Value) -> Response {
        Response { status: 200, body }
    }

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("test", 10), "    \"test\"");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("long_value", 5), "\"long_value\"");
    }

    #[test]
    fn test_format_field_escapes_quotes() {
        assert_eq!(format_field("a\"b", 0), "\"a\"\"b\"");
        assert_eq!(format_field(42, 6), "  \"42\"");
    }

    #[test]
    fn test_render_json() {
        let r = response(json!({"data": ["10.0.0.1"]}));
        assert_eq!(render(&r, OutputFormat::Json), r#"{"data":["10.0.0.1"]}"#);
        assert!(render(&r, OutputFormat::Pretty).contains("\n"));
    }

    #[test]
    fn test_render_table_list() {
        let r = response(json!({"data": ["10.0.0.1-10.0.0.2", "10.0.0.4"]}));
        assert_eq!(render(&r, OutputFormat::Table), "10.0.0.1-10.0.0.2\n10.0.0.4");
    }

    #[test]
    fn test_render_table_rows() {
        let r = response(json!({"data": [
            {"subnet": "10.0.0.0/25", "usable_hosts": 126},
            {"subnet": "10.0.0.128/25", "usable_hosts": 126}
        ]}));
        let table = render(&r, OutputFormat::Table);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "       \"subnet\",\"usable_hosts\"");
        assert_eq!(lines[2], "\"10.0.0.128/25\",         \"126\"");
    }

    #[test]
    fn test_render_table_object_and_error() {
        let r = response(json!({"data": {"prefix_length": 24, "first_usable": null}}));
        assert_eq!(
            render(&r, OutputFormat::Table),
            "first_usable: \nprefix_length: 24"
        );
        let r = Response {
            status: 400,
            body: json!({"error": "range error: bad", "kind": "RangeError"}),
        };
        assert_eq!(
            render(&r, OutputFormat::Table),
            "error [RangeError]: range error: bad"
        );
    }
}
