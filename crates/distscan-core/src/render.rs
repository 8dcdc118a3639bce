//! Catalog renderers: a JSON document and a Markdown report.

use std::fmt::Write;

use crate::error::ScanResult;
use crate::types::{Catalog, ModuleReport};

/// Placeholder for metadata values that are missing.
const MISSING: &str = "?";

/// Pretty-printed JSON with top-level `meta` and `reports`.
pub fn to_json(catalog: &Catalog) -> ScanResult<String>
{
    Ok(serde_json::to_string_pretty(catalog)?)
}

/// Markdown document with one section per module.
///
/// A failed module shows its error, an empty one a short note, and any other a
/// table of its symbols. `|` inside table cells is escaped.
pub fn to_markdown(catalog: &Catalog) -> String
{
    let meta = &catalog.metadata;
    let mut out = String::new();
    let _ = writeln!(out, "# Distribution Catalog: `{}`", meta.name);
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Version**: {}  ", meta.version);
    let _ = writeln!(out, "- **Location**: {}", meta.install_location.as_deref().unwrap_or(MISSING));
    let _ = writeln!(out, "\n---\n");

    for report in &catalog.reports {
        write_module(&mut out, report);
    }
    // The last section keeps a single line break.
    out.truncate(out.trim_end_matches('\n').len());
    out.push('\n');
    out
}

fn write_module(out: &mut String, report: &ModuleReport)
{
    let _ = writeln!(out, "## Module: `{}`", report.module);
    if let Some(error) = &report.error {
        let _ = writeln!(out, "> ❗ Error: `{error}`\n");
        return;
    }
    if report.symbols.is_empty() {
        let _ = writeln!(out, "_No public functions/classes found._\n");
        return;
    }

    let _ = writeln!(out, "| Name | Kind | Signature | Doc (first line) | File | Line |");
    let _ = writeln!(out, "|------|------|-----------|------------------|------|------|");
    for symbol in &report.symbols {
        let line = symbol.line_no.map(|line| line.to_string()).unwrap_or_default();
        let _ = writeln!(
            out,
            "| `{}` | {} | `{}` | {} | {} | {} |",
            symbol.name,
            symbol.kind,
            escape_cell(&symbol.signature),
            escape_cell(&symbol.doc_head),
            escape_cell(symbol.defined_in.as_deref().unwrap_or_default()),
            line
        );
    }
    let _ = writeln!(out);
}

fn escape_cell(value: &str) -> String
{
    value.replace('|', "\\|")
}
