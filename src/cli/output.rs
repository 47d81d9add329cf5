//! CLI output: error mapping to the stable CLI surface.

/// Render an error and its causes on one line each.
pub fn map_error(e: &anyhow::Error) -> String {
    let mut rendered = format!("error: {}", e);
    for cause in e.chain().skip(1) {
        rendered.push_str(&format!("\n  caused by: {}", cause));
    }
    rendered
}
