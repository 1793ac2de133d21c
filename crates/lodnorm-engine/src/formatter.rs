//! Result formatting: JSON, Table, and Markdown output.

use serde::Serialize;

use crate::result::{SearchResult, TermRecord};

/// Output format for engine results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Markdown,
}

/// Format ranked search results.
#[must_use]
pub fn format_search_results(results: &[SearchResult], format: OutputFormat) -> String {
    let with_context = results.iter().any(|r| r.context.is_some());
    let columns: &[&str] = if with_context {
        &["uri", "id", "label", "context"]
    } else {
        &["uri", "id", "label"]
    };
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            let mut row = vec![r.uri.clone(), r.id.clone(), r.label.clone()];
            if with_context {
                row.push(
                    r.context
                        .as_ref()
                        .and_then(|c| serde_json::to_string(c).ok())
                        .unwrap_or_default(),
                );
            }
            row
        })
        .collect();

    match format {
        OutputFormat::Json => format_json(results),
        OutputFormat::Table => format_table(columns, &rows),
        OutputFormat::Markdown => format_markdown(columns, &rows),
    }
}

/// Format a term record. Table and Markdown list one predicate value per row.
#[must_use]
pub fn format_term(term: &TermRecord, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format_json(term);
    }

    let mut rows = vec![
        vec!["uri".to_string(), term.uri.clone()],
        vec!["id".to_string(), term.id.clone()],
        vec!["label".to_string(), term.label.join(", ")],
        vec!["altlabel".to_string(), term.altlabel.join(", ")],
    ];
    if let Some(sameas) = &term.sameas {
        rows.push(vec!["sameas".to_string(), sameas.join(", ")]);
    }
    for (predicate, values) in &term.predicates {
        rows.extend(values.iter().map(|v| vec![predicate.clone(), v.clone()]));
    }

    let columns = ["field", "value"];
    match format {
        OutputFormat::Markdown => format_markdown(&columns, &rows),
        _ => format_table(&columns, &rows),
    }
}

fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

fn format_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "(no results)".to_string();
    }

    // Widths in chars so accented labels still line up
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut output = String::new();

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| pad(c, widths[i]))
        .collect();
    output.push_str(header.join(" | ").trim_end());
    output.push('\n');

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&sep.join("-+-"));
    output.push('\n');

    for row in rows {
        let vals: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i]))
            .collect();
        output.push_str(vals.join(" | ").trim_end());
        output.push('\n');
    }

    output
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}

fn format_markdown(columns: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "*No results*\n".to_string();
    }

    let mut output = String::new();

    output.push_str("| ");
    output.push_str(&columns.join(" | "));
    output.push_str(" |\n");

    output.push_str("| ");
    let seps: Vec<&str> = columns.iter().map(|_| "---").collect();
    output.push_str(&seps.join(" | "));
    output.push_str(" |\n");

    for row in rows {
        output.push_str("| ");
        let vals: Vec<String> = row.iter().map(|cell| cell.replace('|', "\\|")).collect();
        output.push_str(&vals.join(" | "));
        output.push_str(" |\n");
    }

    output
}
