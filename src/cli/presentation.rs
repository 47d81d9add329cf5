//! Patch and entry presentation: text tables and JSON.

use crate::entry::Entry;
use crate::patch::{Operation, PatchOperation};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::Arc;

fn colored_operation(operation: Operation) -> String {
    let name = operation.as_str();
    match operation {
        Operation::Create | Operation::Mkdir => name.green().to_string(),
        Operation::Change => name.yellow().to_string(),
        Operation::Unlink | Operation::Rmdir => name.red().to_string(),
    }
}

pub fn format_patch_text(patch: &[PatchOperation], color: bool) -> String {
    if patch.is_empty() {
        return "No changes.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Operation", "Path", "Size"]);
    for step in patch {
        let operation = if color {
            colored_operation(step.operation)
        } else {
            step.operation.to_string()
        };
        let size = if step.entry.is_directory() {
            "-".to_string()
        } else {
            step.entry.size().to_string()
        };
        table.add_row(vec![operation, step.path.clone(), size]);
    }
    format!("{}\n\nTotal: {} operation(s)", table, patch.len())
}

pub fn format_patch_json(patch: &[PatchOperation]) -> String {
    let out = json!({ "operations": patch, "total": patch.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_entries_text(entries: &[Arc<Entry>]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(entry.relative_path());
        out.push('\n');
    }
    let noun = if entries.len() == 1 { "entry" } else { "entries" };
    out.push_str(&format!("\nTotal: {} {}", entries.len(), noun));
    out
}

pub fn format_entries_json(entries: &[Arc<Entry>]) -> String {
    let out = json!({ "entries": entries, "total": entries.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
