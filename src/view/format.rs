//! Turning console arguments into display text.
//!
//! Strings print raw, everything else prints as compact JSON. Tables are laid
//! out as aligned columns. Wrapping works in terminal columns, not bytes.

use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Column header for the row key of a table.
pub const INDEX_COLUMN: &str = "(index)";

/// Column header for rows that are plain values rather than objects.
pub const VALUES_COLUMN: &str = "Values";

/// Display form of one argument.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Arguments joined by single spaces.
pub fn format_args(args: &[Value]) -> String {
    args.iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lay out `data` as a table.
///
/// Arrays are keyed by index and objects by property name. Object rows
/// contribute their keys as columns in first-seen order; primitive rows fill
/// a trailing `Values` column. `columns`, when given as an array, restricts
/// and orders the property columns. Non-collection data falls back to
/// [`format_value`].
pub fn format_table(data: &Value, columns: Option<&Value>) -> Vec<String> {
    let rows: Vec<(String, &Value)> = match data {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        other => return vec![format_value(other)],
    };

    let mut keys: Vec<String> = match columns {
        Some(Value::Array(names)) => names.iter().map(format_value).collect(),
        _ => {
            let mut seen = Vec::new();
            for (_, row) in &rows {
                if let Value::Object(map) = row {
                    for key in map.keys() {
                        if !seen.contains(key) {
                            seen.push(key.clone());
                        }
                    }
                }
            }
            seen
        }
    };
    let has_values = rows.iter().any(|(_, row)| !row.is_object());
    if has_values {
        keys.push(VALUES_COLUMN.to_string());
    }

    let mut header = Vec::with_capacity(keys.len() + 1);
    header.push(INDEX_COLUMN.to_string());
    header.extend(keys.iter().cloned());

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|(index, row)| {
            let mut cells = Vec::with_capacity(header.len());
            cells.push(index.clone());
            for (i, key) in keys.iter().enumerate() {
                let is_values = has_values && i == keys.len() - 1;
                let cell = match row {
                    Value::Object(map) if !is_values => {
                        map.get(key).map(format_value).unwrap_or_default()
                    }
                    Value::Object(_) => String::new(),
                    primitive if is_values => format_value(primitive),
                    _ => String::new(),
                };
                cells.push(cell);
            }
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.width());
        }
    }

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(join_cells(&header, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    lines.extend(body.iter().map(|cells| join_cells(cells, &widths)));
    lines
}

fn join_cells(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| pad_to(cell, *w))
        .collect();
    padded.join(" │ ").trim_end().to_string()
}

fn pad_to(text: &str, width: usize) -> String {
    let mut out = String::from(text);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(text.width())));
    out
}

/// Wrap `text` to at most `width` columns per row.
///
/// Breaks at whitespace where possible and splits words wider than a row.
/// Explicit newlines always start a new row. Never returns an empty vec.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.split('\n') {
        wrap_line(line.trim_end_matches('\r'), width, &mut rows);
    }
    rows
}

fn wrap_line(line: &str, width: usize, rows: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_inclusive(' ') {
        let word_width = word.width();
        let trimmed_width = word.trim_end_matches(' ').width();

        if current_width + trimmed_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            rows.push(current.trim_end_matches(' ').to_string());
            current.clear();
            current_width = 0;
        }

        if trimmed_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        // Word wider than a row: hard break by character.
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    rows.push(current.trim_end_matches(' ').to_string());
}
