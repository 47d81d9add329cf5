//! CLI domain: parse, input loading, route and presentation.

mod input;
mod output;
mod parse;
mod presentation;
mod route;

pub use input::{load_entries, EntryRecord};
pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_entries_json, format_entries_text, format_patch_json, format_patch_text,
};
pub use route::RunContext;
