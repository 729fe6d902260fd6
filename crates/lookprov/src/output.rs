//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables use `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serializable items in the chosen format.
///
/// - `table`: builds a table from `to_row`
/// - `json` / `json-compact` / `yaml`: serializes the original data
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single item. The table view is a two-column field listing of
/// the item's serialized form, nested objects flattened to dotted paths.
pub fn render_single<T: Serialize>(
    format: OutputFormat,
    data: &T,
    id_fn: impl Fn(&T) -> String,
) -> String {
    match format {
        OutputFormat::Table => render_detail(data),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn render_detail<T: Serialize + ?Sized>(data: &T) -> String {
    let value = match serde_json::to_value(data) {
        Ok(v) => v,
        Err(e) => return format!("<unrenderable: {e}>"),
    };
    let mut rows = Vec::new();
    flatten("", &value, &mut rows);
    render_table(&rows)
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<FieldRow>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, rows);
            }
        }
        other => rows.push(FieldRow {
            field: prefix.to_owned(),
            value: scalar(other),
        }),
    }
}

/// Display form of a leaf: strings unquoted, `null` blank.
pub(crate) fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn render_json_pretty<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("<unrenderable: {e}>"))
}

fn render_json_compact<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).unwrap_or_else(|e| format!("<unrenderable: {e}>"))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("<unrenderable: {e}>"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn detail_view_flattens_nested_objects() {
        let out = render_single(
            OutputFormat::Table,
            &json!({ "id": "looker_settings", "embed_config": { "domain_allowlist": ["a", "b"] } }),
            |_| String::new(),
        );
        assert!(out.contains("embed_config.domain_allowlist"));
        assert!(out.contains("a, b"));
    }

    #[test]
    fn plain_list_is_one_id_per_line() {
        let data = vec![json!({ "id": "1" }), json!({ "id": "2" })];
        let out = render_list(
            OutputFormat::Plain,
            &data,
            |v| FieldRow {
                field: "id".into(),
                value: scalar(&v["id"]),
            },
            |v| scalar(&v["id"]),
        );
        assert_eq!(out, "1\n2");
    }
}
