use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(data: &Value, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let rendered = if pretty {
                serde_json::to_string_pretty(data)?
            } else {
                serde_json::to_string(data)?
            };
            println!("{rendered}");
        }
        OutputFormat::Table => render_value(data, 0),
    }
    Ok(())
}

fn render_value(value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                match nested {
                    Value::Array(rows) if !rows.is_empty() && rows.iter().all(Value::is_object) => {
                        println!("{pad}{key}:");
                        render_rows(rows, indent + 1);
                    }
                    Value::Object(_) => {
                        println!("{pad}{key}:");
                        render_value(nested, indent + 1);
                    }
                    scalar => println!("{pad}{key}: {}", display_scalar(scalar)),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                render_value(item, indent);
            }
        }
        scalar => println!("{pad}{}", display_scalar(scalar)),
    }
}

fn render_rows(rows: &[Value], indent: usize) {
    let pad = "  ".repeat(indent);
    let columns: Vec<String> = match rows.first().and_then(Value::as_object) {
        Some(first) => first.keys().cloned().collect(),
        None => return,
    };

    let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
    let mut cells: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for row in rows {
        let rendered: Vec<String> = columns
            .iter()
            .map(|column| {
                row.get(column)
                    .map(display_scalar)
                    .unwrap_or_default()
            })
            .collect();
        for (width, cell) in widths.iter_mut().zip(&rendered) {
            *width = (*width).max(cell.len());
        }
        cells.push(rendered);
    }

    let header: Vec<String> = columns
        .iter()
        .zip(widths.iter().copied())
        .map(|(column, width)| format!("{column:<width$}"))
        .collect();
    println!("{pad}{}", header.join("  "));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        println!("{pad}{}", line.join("  ").trim_end());
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
